use core::any::TypeId;
use core::fmt;

use crate::hash::NoOpHashState;
use crate::hash::hashbrown::HashMap;

// -----------------------------------------------------------------------------
// TypeIdMap

/// Per-type storage, such as the hook tables of generic model types or the
/// subclass factories of one polymorphic base.
///
/// Keys are [`TypeId`]s, which are hashes already, so lookups go through
/// [`NoOpHashState`].
pub struct TypeIdMap<V> {
    entries: HashMap<TypeId, V, NoOpHashState>,
}

impl<V> TypeIdMap<V> {
    /// # Examples
    ///
    /// ```
    /// use hw_utils::TypeIdMap;
    ///
    /// let map = TypeIdMap::<&str>::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.get_type::<u8>(), None);
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(NoOpHashState),
        }
    }

    /// The value stored for `type_id`, created by `init` on first request.
    pub fn get_or_insert(&mut self, type_id: TypeId, init: impl FnOnce() -> V) -> &mut V {
        self.entries.entry(type_id).or_insert_with(init)
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.entries.get(type_id)
    }

    #[inline]
    pub fn get_mut(&mut self, type_id: &TypeId) -> Option<&mut V> {
        self.entries.get_mut(type_id)
    }

    /// The value stored for `T`.
    #[inline]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    /// Entries in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&TypeId, &V)> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn one_value_per_type() {
        let mut map = TypeIdMap::new();
        let mut built = 0;
        for _ in 0..3 {
            map.get_or_insert(TypeId::of::<i32>(), || {
                built += 1;
                "i32"
            });
        }
        map.get_or_insert(TypeId::of::<str>(), || "str");

        assert_eq!(built, 1);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_type::<i32>(), Some(&"i32"));
        assert_eq!(map.get(&TypeId::of::<str>()), Some(&"str"));
        assert_eq!(map.get_type::<u16>(), None);

        assert_eq!(map.iter().len(), 2);
        assert!(map.iter().any(|(id, v)| *id == TypeId::of::<str>() && *v == "str"));
    }
}
