//! Dictionaries exposed as pairs with `key` and `value` children.
//!
//! Reading yields one [`PairRef`] per live entry. Writing goes through a
//! [`DictionaryEntry`] that owns the pending key and value and inserts them
//! into the map only in [`Model::complete`], so a partially populated pair
//! never becomes visible.

use alloc::collections::BTreeMap;
use core::hash::{BuildHasher, Hash};
use core::mem;
use std::collections::HashMap as StdHashMap;
use std::sync::OnceLock;

use hw_utils::hash::hashbrown::HashMap as HashbrownMap;

use super::{ChildFn, ChildKey, ChildMutFn, Model, ModelPartType, ModelType, PartFn, PartMutFn};
use crate::hook::{HookIndex, HookInfo};
use crate::metadata::Metadata;
use crate::{Error, Result};

const KEY: HookInfo = HookInfo::new("key", "key", Metadata::EMPTY);
const VALUE: HookInfo = HookInfo::new("value", "value", Metadata::EMPTY);

fn pair_index() -> &'static HookIndex {
    static INDEX: OnceLock<HookIndex> = OnceLock::new();
    INDEX.get_or_init(|| HookIndex::new(alloc::vec![KEY, VALUE]))
}

#[cold]
fn bad_pair_member() -> Error {
    Error::invalid_operation("pair", "pairs only have `key` (0) and `value` (1)")
}

/// A map usable as a Dictionary node.
pub trait MapLike {
    type Key: ModelType + Default;
    type Value: ModelType + Default;

    fn entry_count(&self) -> usize;

    fn entries(&self) -> impl Iterator<Item = (&Self::Key, &Self::Value)>;

    fn insert_entry(&mut self, key: Self::Key, value: Self::Value);
}

// -----------------------------------------------------------------------------
// PairRef

/// A read-only view of one dictionary entry.
pub struct PairRef<'a, K, V> {
    key: &'a K,
    value: &'a V,
}

impl<'a, K: Model, V: Model> PairRef<'a, K, V> {
    #[inline]
    pub fn new(key: &'a K, value: &'a V) -> Self {
        Self { key, value }
    }
}

impl<K: Model, V: Model> Model for PairRef<'_, K, V> {
    fn part_type(&self) -> ModelPartType {
        ModelPartType::Complex
    }

    fn model_name(&self) -> &'static str {
        "pair"
    }

    fn hook_index(&self) -> Option<&'static HookIndex> {
        Some(pair_index())
    }

    fn child_count(&self) -> usize {
        2
    }

    fn for_each_child(&self, f: &mut ChildFn<'_>) -> Result<()> {
        f(ChildKey::Hook(&KEY), self.key)?;
        f(ChildKey::Hook(&VALUE), self.value)
    }

    fn child_at(&self, index: usize, f: &mut PartFn<'_>) -> Result<()> {
        match index {
            0 => f(self.key),
            1 => f(self.value),
            _ => Err(bad_pair_member()),
        }
    }
}

// -----------------------------------------------------------------------------
// DictionaryEntry

/// A pending dictionary entry, inserted on [`Model::complete`].
pub struct DictionaryEntry<'m, M: MapLike> {
    map: &'m mut M,
    key: M::Key,
    value: M::Value,
    inserted: bool,
}

impl<'m, M: MapLike> DictionaryEntry<'m, M> {
    #[inline]
    pub fn new(map: &'m mut M) -> Self {
        Self {
            map,
            key: Default::default(),
            value: Default::default(),
            inserted: false,
        }
    }
}

impl<M: MapLike> Model for DictionaryEntry<'_, M> {
    fn part_type(&self) -> ModelPartType {
        ModelPartType::Complex
    }

    fn model_name(&self) -> &'static str {
        "pair"
    }

    fn hook_index(&self) -> Option<&'static HookIndex> {
        Some(pair_index())
    }

    fn child_count(&self) -> usize {
        2
    }

    fn complete(&mut self) -> Result<()> {
        if !self.inserted {
            self.inserted = true;
            let key = mem::take(&mut self.key);
            let value = mem::take(&mut self.value);
            self.map.insert_entry(key, value);
        }
        Ok(())
    }

    fn for_each_child(&self, f: &mut ChildFn<'_>) -> Result<()> {
        f(ChildKey::Hook(&KEY), &self.key)?;
        f(ChildKey::Hook(&VALUE), &self.value)
    }

    fn for_each_child_mut(&mut self, f: &mut ChildMutFn<'_>) -> Result<()> {
        f(ChildKey::Hook(&KEY), &mut self.key)?;
        f(ChildKey::Hook(&VALUE), &mut self.value)
    }

    fn child_at(&self, index: usize, f: &mut PartFn<'_>) -> Result<()> {
        match index {
            0 => f(&self.key),
            1 => f(&self.value),
            _ => Err(bad_pair_member()),
        }
    }

    fn child_at_mut(&mut self, index: usize, f: &mut PartMutFn<'_>) -> Result<()> {
        match index {
            0 => f(&mut self.key),
            1 => f(&mut self.value),
            _ => Err(bad_pair_member()),
        }
    }
}

// -----------------------------------------------------------------------------
// Map implementations

macro_rules! impl_dictionary_model {
    ($name:literal, $map:ident<K, V $(, $s:ident)?> where K: $($bound:path),+) => {
        impl<K, V $(, $s)?> MapLike for $map<K, V $(, $s)?>
        where
            K: ModelType + Default $(+ $bound)+,
            V: ModelType + Default,
            $($s: BuildHasher,)?
        {
            type Key = K;
            type Value = V;

            #[inline]
            fn entry_count(&self) -> usize {
                self.len()
            }

            #[inline]
            fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
                self.iter()
            }

            #[inline]
            fn insert_entry(&mut self, key: K, value: V) {
                self.insert(key, value);
            }
        }

        impl<K, V $(, $s)?> Model for $map<K, V $(, $s)?>
        where
            K: ModelType + Default $(+ $bound)+,
            V: ModelType + Default,
            $($s: BuildHasher,)?
        {
            fn part_type(&self) -> ModelPartType {
                ModelPartType::Dictionary
            }

            fn model_name(&self) -> &'static str {
                $name
            }

            fn child_count(&self) -> usize {
                self.entry_count()
            }

            fn for_each_child(&self, f: &mut ChildFn<'_>) -> Result<()> {
                self.entries()
                    .enumerate()
                    .try_for_each(|(index, (key, value))| {
                        f(ChildKey::Index(index), &PairRef::new(key, value))
                    })
            }

            fn for_each_child_mut(&mut self, _f: &mut ChildMutFn<'_>) -> Result<()> {
                Err(Error::invalid_operation($name, "dictionary entries cannot be mutated in place"))
            }

            fn child_at(&self, index: usize, f: &mut PartFn<'_>) -> Result<()> {
                match self.entries().nth(index) {
                    Some((key, value)) => f(&PairRef::new(key, value)),
                    None => Err(Error::invalid_operation($name, "entry index out of bounds")),
                }
            }

            fn create_element(&mut self, f: &mut PartMutFn<'_>) -> Result<()> {
                let mut entry = DictionaryEntry::new(self);
                f(&mut entry)?;
                entry.complete()
            }
        }

        impl<K, V $(, $s)?> ModelType for $map<K, V $(, $s)?>
        where
            K: ModelType + Default $(+ $bound)+,
            V: ModelType + Default,
            $($s: BuildHasher,)?
        {
            const PART_TYPE: ModelPartType = ModelPartType::Dictionary;
            const NAME: &'static str = $name;
        }
    };
}

impl_dictionary_model!("BTreeMap", BTreeMap<K, V> where K: Ord);
impl_dictionary_model!("HashMap", StdHashMap<K, V, S> where K: Eq, Hash);
impl_dictionary_model!("HashMap", HashbrownMap<K, V, S> where K: Eq, Hash);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::NameMatch;
    use crate::value::Primitive;
    use alloc::string::String;

    #[test]
    fn pairs_expose_key_and_value() {
        let map = BTreeMap::from([(1_u32, String::from("one")), (2, String::from("two"))]);
        let mut seen = Vec::new();
        map.for_each_child(&mut |_, pair| {
            assert_eq!(pair.part_type(), ModelPartType::Complex);
            let mut key = None;
            let mut value = None;
            pair.child("key", NameMatch::Exact, &mut |k| {
                key = k.value()?;
                Ok(())
            })?;
            pair.child("VALUE", NameMatch::CaseInsensitive, &mut |v| {
                value = v.value()?;
                Ok(())
            })?;
            seen.push((key, value));
            Ok(())
        })
        .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (Some(Primitive::U32(1)), Some(Primitive::from("one"))));

        assert_eq!(map.child_count(), 2);
        let mut second = None;
        map.child_at(1, &mut |pair| {
            pair.child_at(1, &mut |v| {
                second = v.value()?;
                Ok(())
            })
        })
        .unwrap();
        assert_eq!(second, Some(Primitive::from("two")));
        assert!(map.child_at(2, &mut |_| Ok(())).unwrap_err().is_usage());
    }

    #[test]
    fn insert_happens_on_complete() {
        let mut map: BTreeMap<String, i64> = BTreeMap::new();
        map.create_element(&mut |entry| {
            entry.child_at_mut(0, &mut |k| k.set_value(Primitive::from("a")))?;
            entry.child_at_mut(1, &mut |v| v.set_value(Primitive::I64(5)))
        })
        .unwrap();
        assert_eq!(map.get("a"), Some(&5));
    }

    #[test]
    fn partial_pairs_never_appear() {
        let mut map: StdHashMap<String, u8> = StdHashMap::new();
        let result = map.create_element(&mut |entry| {
            entry.child_at_mut(0, &mut |k| k.set_value(Primitive::from("half")))?;
            entry.child_at_mut(1, &mut |v| v.set_value(Primitive::I64(1000)))
        });
        assert!(result.is_err());
        assert!(map.is_empty());
    }

    #[test]
    fn hashbrown_maps_are_dictionaries() {
        let mut map: hw_utils::hash::HashMap<u8, bool> = Default::default();
        map.create_element(&mut |entry| {
            entry.child_mut("key", NameMatch::Exact, &mut |k| k.set_value(Primitive::U8(1)))?;
            entry.child_mut("value", NameMatch::Exact, &mut |v| v.set_value(Primitive::Bool(true)))?;
            Ok(())
        })
        .unwrap();
        assert_eq!(map.get(&1), Some(&true));
        assert_eq!(map.part_type(), ModelPartType::Dictionary);
    }
}
