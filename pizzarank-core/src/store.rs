/// Authoritative, ordered collection of offers.
///
/// Storage order is creation order, except where `update_at` / `remove_at`
/// change it. Every mutating call validates first and only then touches the
/// sequence, so a rejected call leaves the store exactly as it was.
use crate::error::{PizzaError, Result};
use crate::types::{Entry, EntryId, EntryInput};

#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    entries: Vec<Entry>,
    /// Next id to hand out. Only ever grows, so ids are never reused.
    next_id: u64,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding `entries`, each stamped with a fresh id.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut store = Self::new();
        store.replace_all(entries);
        store
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Validate and append a new offer. Returns the stored entry.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        quantity: u32,
        diameter: f64,
        unit_price: f64,
    ) -> Result<Entry> {
        let input = EntryInput::new(name, quantity, diameter, unit_price);
        input.validate()?;

        let entry = Entry::new(self.allocate_id(), input)?;
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Replace the entry at `position` with one rebuilt from new base fields.
    /// The replacement keeps the original entry's id.
    pub fn update_at(
        &mut self,
        position: usize,
        name: impl Into<String>,
        quantity: u32,
        diameter: f64,
        unit_price: f64,
    ) -> Result<Entry> {
        let id = self
            .get(position)
            .map(Entry::id)
            .ok_or_else(|| self.invalid_position(position))?;

        let entry = Entry::new(id, EntryInput::new(name, quantity, diameter, unit_price))?;
        self.entries[position] = entry.clone();
        Ok(entry)
    }

    /// Delete the entry at `position`, shifting later entries left.
    pub fn remove_at(&mut self, position: usize) -> Result<Entry> {
        if position >= self.entries.len() {
            return Err(self.invalid_position(position));
        }
        Ok(self.entries.remove(position))
    }

    /// Swap the whole contents for `entries`. Incoming ids are discarded and
    /// fresh ones allocated, in order.
    pub fn replace_all(&mut self, entries: Vec<Entry>) {
        let mut restamped = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = self.allocate_id();
            restamped.push(entry.with_id(id));
        }
        self.entries = restamped;
    }

    /// Read-only view in storage order.
    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&Entry> {
        self.entries.get(position)
    }

    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn invalid_position(&self, position: usize) -> PizzaError {
        PizzaError::InvalidPosition {
            position,
            len: self.entries.len(),
        }
    }
}
