//! Hash containers with a fixed hash state, plus the `hashbrown` and
//! `foldhash` crates they are built on.

mod hasher;

pub use hasher::{FixedHashState, FixedHasher, NoOpHashState, NoOpHasher};

/// [`hashbrown::HashMap`] with [`FixedHashState`] as the default state.
///
/// ```
/// use hw_utils::hash::HashMap;
///
/// let mut columns: HashMap<&str, usize> = HashMap::default();
/// columns.insert("id", 0);
/// assert_eq!(columns.get("id"), Some(&0));
/// ```
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

pub use foldhash;
pub use hashbrown;
