//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! Every container here uses [`FixedHashState`], so iteration order only
//! depends on the inserted data. Build them with `default()` or
//! `with_capacity_and_hasher`, `new()` is reserved for hashbrown's own state.
//!
//! ```
//! use refstr_utils::hash::HashMap;
//!
//! let mut map: HashMap<&str, i32> = HashMap::default();
//! map.insert("a", 1);
//! assert_eq!(map.get("a"), Some(&1));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

/// Re-export of hashbrown's map entry types.
pub mod hash_map {
    pub use hashbrown::hash_map::{Entry, OccupiedEntry, VacantEntry};
}

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
