/// pizzarank-core: Pure-computation ranking engine for pizza offers.
///
/// Offers (name, quantity, diameter, price) → price per area → ranked list
/// with dense ranks and a 1..=6 deal-quality bucket. No terminal, no network,
/// no filesystem. The whole list can be exported to a short URL-safe string
/// and rebuilt from it.
///
/// # Quick start
///
/// The share-link codec and `Session::export_state`/`import_state` need the
/// default `share` feature. Enable `serde` for `Serialize` on the data types.
///
/// ```rust
/// use pizzarank_core::{Session, SortDirection, SortKey};
///
/// let mut session = Session::new();
/// session.add("Margherita", 1, 30.0, 10.0)?;
/// session.add("Family", 1, 45.0, 19.9)?;
///
/// for r in session.ranked() {
///     println!("#{} {} {:.4}/cm² (value {})", r.rank, r.entry.name(), r.entry.price_per_area(), r.value_rank);
/// }
///
/// session.set_sort(SortKey::TotalArea, SortDirection::Descending)?;
/// assert_eq!(session.ranked()[0].entry.name(), "Family");
///
/// let shared = session.export_state().expect("two entries to share");
/// let restored = pizzarank_core::Session::from_shared(&shared);
/// assert_eq!(restored.len(), 2);
/// # Ok::<(), pizzarank_core::PizzaError>(())
/// ```

#[cfg(feature = "share")]
pub mod codec;
pub mod constants;
pub mod error;
pub mod ranking;
pub mod session;
pub mod store;
pub mod types;

// Re-export primary public API at crate root.
#[cfg(feature = "share")]
pub use codec::{decode, decode_link, encode, payload_from_link, share_link, try_decode};
#[cfg(feature = "share")]
pub use error::DecodeError;
pub use error::{ImportError, ParseSortKeyError, PizzaError, Result, ValidationError};
pub use ranking::rank;
pub use session::Session;
pub use store::ItemStore;
pub use types::{
    Entry, EntryId, EntryInput, RankedEntry, SortDirection, SortKey, SortState, SortValue,
};
