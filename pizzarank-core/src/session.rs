/// Session controller: one item store plus its sort state.
///
/// Every mutation re-ranks before returning, so `ranked()` always reflects the
/// current store. Presentation code addresses rows of the ranked view; the
/// `*_ranked` methods translate those to storage positions by entry id.
#[cfg(feature = "share")]
use crate::codec;
#[cfg(feature = "share")]
use crate::error::ImportError;
use crate::error::{PizzaError, Result};
use crate::ranking::rank;
use crate::store::ItemStore;
use crate::types::{Entry, RankedEntry, SortDirection, SortKey, SortState};

#[derive(Debug, Clone, Default)]
pub struct Session {
    store: ItemStore,
    sort: SortState,
    ranked: Vec<RankedEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "share")]
    /// Start from a share link or payload. Anything unusable starts empty.
    pub fn from_shared(text: &str) -> Self {
        let mut session = Self::new();
        if let Err(e) = session.import_state(text) {
            tracing::info!(error = %e, "starting with an empty session");
        }
        session
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        quantity: u32,
        diameter: f64,
        unit_price: f64,
    ) -> Result<Entry> {
        let entry = self.store.add(name, quantity, diameter, unit_price)?;
        tracing::debug!(id = entry.id().get(), name = entry.name(), "added entry");
        self.refresh();
        Ok(entry)
    }

    /// Update by storage position.
    pub fn update_at(
        &mut self,
        position: usize,
        name: impl Into<String>,
        quantity: u32,
        diameter: f64,
        unit_price: f64,
    ) -> Result<Entry> {
        let entry = self.store.update_at(position, name, quantity, diameter, unit_price)?;
        tracing::debug!(id = entry.id().get(), position, "updated entry");
        self.refresh();
        Ok(entry)
    }

    /// Remove by storage position.
    pub fn remove_at(&mut self, position: usize) -> Result<Entry> {
        let entry = self.store.remove_at(position)?;
        tracing::debug!(id = entry.id().get(), position, "removed entry");
        self.refresh();
        Ok(entry)
    }

    /// Update the entry shown at `index` of the ranked view.
    pub fn update_ranked(
        &mut self,
        index: usize,
        name: impl Into<String>,
        quantity: u32,
        diameter: f64,
        unit_price: f64,
    ) -> Result<Entry> {
        let position = self.storage_position(index)?;
        self.update_at(position, name, quantity, diameter, unit_price)
    }

    /// Remove the entry shown at `index` of the ranked view.
    pub fn remove_ranked(&mut self, index: usize) -> Result<Entry> {
        let position = self.storage_position(index)?;
        self.remove_at(position)
    }

    fn storage_position(&self, index: usize) -> Result<usize> {
        self.ranked
            .get(index)
            .and_then(|r| self.store.position_of(r.entry.id()))
            .ok_or(PizzaError::InvalidPosition {
                position: index,
                len: self.ranked.len(),
            })
    }

    /// Sort by `key` in `direction`. Sorting by name is refused.
    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) -> Result<()> {
        if !key.is_sortable() {
            return Err(PizzaError::UnsortableKey(key));
        }
        self.sort = SortState { key, direction };
        self.refresh();
        Ok(())
    }

    /// Column-header behaviour: the active key flips direction, any other key
    /// becomes active in ascending order.
    pub fn toggle_sort(&mut self, key: SortKey) -> Result<SortState> {
        let direction = if self.sort.key == key {
            self.sort.direction.flipped()
        } else {
            SortDirection::Ascending
        };
        self.set_sort(key, direction)?;
        Ok(self.sort)
    }

    #[cfg(feature = "share")]
    /// Encoded payload of the current entries, `None` if there are none.
    pub fn export_state(&self) -> Option<String> {
        codec::encode(self.store.all())
    }

    #[cfg(feature = "share")]
    pub fn share_link(&self, base_url: &str) -> Result<Option<String>> {
        codec::share_link(base_url, self.store.all())
    }

    #[cfg(feature = "share")]
    /// Replace the store with the entries of a share link or payload.
    ///
    /// On failure, or when the payload holds no entries, the current entries
    /// are kept. Returns how many entries were imported.
    pub fn import_state(&mut self, text: &str) -> std::result::Result<usize, ImportError> {
        let entries = codec::decode_link(text)
            .filter(|entries| !entries.is_empty())
            .ok_or(ImportError::NoUsableData)?;

        let count = entries.len();
        self.store.replace_all(entries);
        tracing::debug!(count, "imported shared state");
        self.refresh();
        Ok(count)
    }

    pub fn ranked(&self) -> &[RankedEntry] {
        &self.ranked
    }

    /// Entries in storage order.
    pub fn entries(&self) -> &[Entry] {
        self.store.all()
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn refresh(&mut self) {
        self.ranked = rank(self.store.all(), self.sort.key, self.sort.direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn names(session: &Session) -> Vec<&str> {
        session.ranked().iter().map(|r| r.entry.name()).collect()
    }

    fn sample_session() -> Session {
        let mut session = Session::new();
        session.add("Large", 1, 32.0, 10.0).unwrap();
        session.add("Small", 1, 20.0, 6.0).unwrap();
        session.add("Party", 2, 40.0, 20.0).unwrap();
        session
    }

    #[test]
    fn test_default_sort_is_price_per_area_ascending() {
        let session = Session::new();
        assert_eq!(session.sort(), SortState::default());
        assert_eq!(session.sort().key, SortKey::PricePerArea);
        assert_eq!(session.sort().direction, SortDirection::Ascending);
    }

    #[test]
    fn test_mutations_rerank_immediately() {
        let mut session = sample_session();
        // Large ≈ 0.012434, Party ≈ 0.015915, Small ≈ 0.019099
        assert_eq!(names(&session), vec!["Large", "Party", "Small"]);

        session.update_at(1, "Small", 1, 20.0, 2.0).unwrap();
        assert_eq!(names(&session), vec!["Small", "Large", "Party"]);

        session.remove_at(0).unwrap();
        assert_eq!(names(&session), vec!["Small", "Party"]);
        assert_eq!(session.ranked()[0].rank, 1);
    }

    #[test]
    fn test_failed_mutation_keeps_state() {
        let mut session = sample_session();
        let before = session.ranked().to_vec();

        let err = session.add("", 1, 10.0, 5.0).unwrap_err();
        assert_eq!(err, PizzaError::Validation(ValidationError::EmptyName));
        assert!(session.remove_at(5).is_err());
        assert!(session.update_at(9, "X", 1, 30.0, 10.0).is_err());

        assert_eq!(session.ranked(), before.as_slice());
        assert_eq!(session.len(), 3);
    }

    #[test]
    fn test_overflowing_offer_is_rejected() {
        let mut session = sample_session();
        let before = session.ranked().to_vec();

        let err = session.add("Huge", 1, 1e200, 10.0).unwrap_err();
        assert_eq!(err, PizzaError::Validation(ValidationError::DerivedOutOfRange));
        assert!(session.update_at(0, "Huge", 1, 1e200, 10.0).is_err());
        assert_eq!(session.ranked(), before.as_slice());
    }

    #[test]
    fn test_edit_and_delete_by_ranked_row() {
        let mut session = sample_session();
        // Index 2 of the ranked view is "Small", stored at position 1
        let edited = session.update_ranked(2, "Small deal", 1, 20.0, 3.0).unwrap();
        assert_eq!(edited.name(), "Small deal");
        assert_eq!(session.entries()[1].name(), "Small deal");
        assert_eq!(names(&session), vec!["Small deal", "Large", "Party"]);

        let removed = session.remove_ranked(2).unwrap();
        assert_eq!(removed.name(), "Party");
        assert_eq!(names(&session), vec!["Small deal", "Large"]);

        let err = session.remove_ranked(2).unwrap_err();
        assert_eq!(err, PizzaError::InvalidPosition { position: 2, len: 2 });
    }

    #[test]
    fn test_toggle_sort() {
        let mut session = sample_session();

        let state = session.toggle_sort(SortKey::PricePerArea).unwrap();
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(names(&session), vec!["Small", "Party", "Large"]);

        let state = session.toggle_sort(SortKey::Diameter).unwrap();
        assert_eq!(state, SortState { key: SortKey::Diameter, direction: SortDirection::Ascending });
        assert_eq!(names(&session), vec!["Small", "Large", "Party"]);

        let state = session.toggle_sort(SortKey::Diameter).unwrap();
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(names(&session), vec!["Party", "Large", "Small"]);
    }

    #[test]
    fn test_sort_by_name_is_refused() {
        let mut session = sample_session();
        let before = session.sort();

        assert_eq!(
            session.set_sort(SortKey::Name, SortDirection::Ascending),
            Err(PizzaError::UnsortableKey(SortKey::Name))
        );
        assert!(session.toggle_sort(SortKey::Name).is_err());
        assert_eq!(session.sort(), before);
    }

    #[test]
    fn test_value_rank_independent_of_direction() {
        let mut session = sample_session();
        let best = |s: &Session| {
            s.ranked()
                .iter()
                .find(|r| r.value_rank == 1)
                .map(|r| r.entry.name().to_string())
        };

        let asc = best(&session);
        session.set_sort(SortKey::PricePerArea, SortDirection::Descending).unwrap();
        assert_eq!(best(&session), asc);
        assert_eq!(asc.as_deref(), Some("Large"));
    }

    #[cfg(feature = "share")]
    #[test]
    fn test_export_import_round_trip() {
        let session = sample_session();
        let exported = session.export_state().unwrap();

        let mut other = Session::new();
        other.add("Leftover", 1, 30.0, 10.0).unwrap();
        assert_eq!(other.import_state(&exported), Ok(3));

        let imported: Vec<&str> = other.entries().iter().map(|e| e.name()).collect();
        assert_eq!(imported, vec!["Large", "Small", "Party"]);
        assert_eq!(names(&other), names(&session));
    }

    #[cfg(feature = "share")]
    #[test]
    fn test_export_empty_session() {
        assert_eq!(Session::new().export_state(), None);
        assert_eq!(Session::new().share_link("https://pizza.example/"), Ok(None));
    }

    #[cfg(feature = "share")]
    #[test]
    fn test_failed_import_keeps_entries() {
        let mut session = sample_session();
        assert_eq!(session.import_state("%7Bbroken"), Err(ImportError::NoUsableData));
        assert_eq!(session.import_state("%5B%5D"), Err(ImportError::NoUsableData));
        assert_eq!(session.import_state("https://pizza.example/"), Err(ImportError::NoUsableData));
        assert_eq!(session.len(), 3);
    }

    #[cfg(feature = "share")]
    #[test]
    fn test_import_from_link_and_fresh_ids() {
        let source = sample_session();
        let link = source.share_link("https://pizza.example/").unwrap().unwrap();

        let mut session = Session::new();
        session.add("Old", 1, 30.0, 10.0).unwrap();
        let old_id = session.remove_at(0).unwrap().id();

        session.import_state(&link).unwrap();
        let added = session.add("New", 1, 30.0, 10.0).unwrap();

        let mut ids: Vec<u64> = session.entries().iter().map(|e| e.id().get()).collect();
        assert!(!ids.contains(&old_id.get()));
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert_eq!(session.entries().last().map(Entry::id), Some(added.id()));
    }

    #[cfg(feature = "share")]
    #[test]
    fn test_from_shared() {
        let exported = sample_session().export_state().unwrap();
        assert_eq!(Session::from_shared(&exported).len(), 3);
        assert!(Session::from_shared("garbage").is_empty());
        assert!(Session::from_shared("").is_empty());
    }
}
