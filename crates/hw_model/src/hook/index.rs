use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::iter::FusedIterator;

use hw_utils::ascii::cmp_folded_key;

use super::HookInfo;

/// How a member name is compared during lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameMatch {
    /// Byte-wise equal names.
    #[default]
    Exact,
    /// ASCII case-insensitive; the query is folded during comparison.
    CaseInsensitive,
    /// ASCII case-insensitive; the query is already lowercased.
    Folded,
}

/// Name to member index of a Complex type.
///
/// Two permutations of the declaration order are kept, one sorted by exact
/// name and one by folded name. Ties keep declaration order, so every
/// lookup yields matches in the order the members were declared.
#[derive(Debug)]
pub struct HookIndex {
    hooks: Box<[HookInfo]>,
    by_name: Box<[u32]>,
    by_folded: Box<[u32]>,
}

impl HookIndex {
    /// Builds the index; `hooks` are in declaration order.
    pub fn new(hooks: Vec<HookInfo>) -> Self {
        debug_assert!(hooks.iter().all(|h| hw_utils::ascii::is_folded(h.folded())));

        let order = || (0..hooks.len() as u32).collect::<Vec<u32>>();

        let mut by_name = order();
        by_name.sort_by(|&a, &b| hooks[a as usize].name().cmp(hooks[b as usize].name()));

        let mut by_folded = order();
        by_folded.sort_by(|&a, &b| hooks[a as usize].folded().cmp(hooks[b as usize].folded()));

        Self {
            hooks: hooks.into_boxed_slice(),
            by_name: by_name.into_boxed_slice(),
            by_folded: by_folded.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// The member at declaration position `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&HookInfo> {
        self.hooks.get(index)
    }

    /// Members in declaration order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, HookInfo> {
        self.hooks.iter()
    }

    /// All members whose name matches `name` under `mode`, in declaration
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use hw_model::hook::{HookIndex, HookInfo, NameMatch};
    /// use hw_model::metadata::Metadata;
    ///
    /// let index = HookIndex::new(vec![
    ///     HookInfo::new("Id", "id", Metadata::EMPTY),
    ///     HookInfo::new("name", "name", Metadata::EMPTY),
    ///     HookInfo::new("ID", "id", Metadata::EMPTY),
    /// ]);
    ///
    /// let exact: Vec<_> = index.equal_range("ID", NameMatch::Exact).map(|(i, _)| i).collect();
    /// assert_eq!(exact, [2]);
    ///
    /// let folded: Vec<_> = index.equal_range("id", NameMatch::CaseInsensitive).map(|(i, _)| i).collect();
    /// assert_eq!(folded, [0, 2]);
    ///
    /// assert_eq!(index.equal_range("missing", NameMatch::Exact).len(), 0);
    /// ```
    pub fn equal_range(&self, name: &str, mode: NameMatch) -> HookRange<'_> {
        let order = match mode {
            NameMatch::Exact => &self.by_name[..],
            NameMatch::CaseInsensitive | NameMatch::Folded => &self.by_folded[..],
        };
        let cmp: fn(&HookInfo, &str) -> Ordering = match mode {
            NameMatch::Exact => cmp_exact,
            NameMatch::CaseInsensitive => cmp_insensitive,
            NameMatch::Folded => cmp_prefolded,
        };

        let start = order.partition_point(|&i| cmp(&self.hooks[i as usize], name).is_lt());
        let len = order[start..]
            .iter()
            .take_while(|&&i| cmp(&self.hooks[i as usize], name).is_eq())
            .count();

        HookRange {
            hooks: &self.hooks,
            order: &order[start..start + len],
        }
    }

    /// Declaration position of the first member matching `name`.
    #[inline]
    pub fn position(&self, name: &str, mode: NameMatch) -> Option<usize> {
        self.equal_range(name, mode).next().map(|(i, _)| i)
    }
}

fn cmp_exact(hook: &HookInfo, name: &str) -> Ordering {
    hook.name().cmp(name)
}

fn cmp_insensitive(hook: &HookInfo, name: &str) -> Ordering {
    cmp_folded_key(hook.folded(), name)
}

fn cmp_prefolded(hook: &HookInfo, name: &str) -> Ordering {
    hook.folded().cmp(name)
}

// -----------------------------------------------------------------------------
// HookRange

/// Iterator over the matches of [`HookIndex::equal_range`].
///
/// Yields `(declaration position, descriptor)` pairs.
#[derive(Debug, Clone)]
pub struct HookRange<'a> {
    hooks: &'a [HookInfo],
    order: &'a [u32],
}

impl HookRange<'static> {
    /// A range without matches.
    pub const EMPTY: Self = HookRange {
        hooks: &[],
        order: &[],
    };
}

impl<'a> Iterator for HookRange<'a> {
    type Item = (usize, &'a HookInfo);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (&first, rest) = self.order.split_first()?;
        self.order = rest;
        Some((first as usize, &self.hooks[first as usize]))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.order.len(), Some(self.order.len()))
    }
}

impl DoubleEndedIterator for HookRange<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let (&last, rest) = self.order.split_last()?;
        self.order = rest;
        Some((last as usize, &self.hooks[last as usize]))
    }
}

impl ExactSizeIterator for HookRange<'_> {}

impl FusedIterator for HookRange<'_> {}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;
    use alloc::vec;

    static ATTR: &[&str] = &["xml:attribute"];

    fn index() -> HookIndex {
        HookIndex::new(vec![
            HookInfo::new("value", "value", Metadata::EMPTY),
            HookInfo::new("Name", "name", Metadata::new(ATTR)),
            HookInfo::new("alpha", "alpha", Metadata::EMPTY),
            HookInfo::new("name", "name", Metadata::EMPTY),
            HookInfo::new("NAME", "name", Metadata::EMPTY),
            HookInfo::new("zeta", "zeta", Metadata::EMPTY),
        ])
    }

    fn positions(range: HookRange<'_>) -> Vec<usize> {
        range.map(|(i, _)| i).collect()
    }

    #[test]
    fn exact_returns_only_exact() {
        let index = index();
        assert_eq!(positions(index.equal_range("name", NameMatch::Exact)), [3]);
        assert_eq!(positions(index.equal_range("Name", NameMatch::Exact)), [1]);
        assert_eq!(positions(index.equal_range("nAmE", NameMatch::Exact)), [] as [usize; 0]);
    }

    #[test]
    fn folded_returns_all_in_declaration_order() {
        let index = index();
        assert_eq!(positions(index.equal_range("nAmE", NameMatch::CaseInsensitive)), [1, 3, 4]);
        assert_eq!(positions(index.equal_range("name", NameMatch::Folded)), [1, 3, 4]);
        assert_eq!(index.position("NAME", NameMatch::CaseInsensitive), Some(1));
    }

    #[test]
    fn filter_disambiguates() {
        let index = index();
        let attribute = index
            .equal_range("name", NameMatch::CaseInsensitive)
            .find(|(_, hook)| hook.metadata().has_flag("xml:attribute"));
        assert_eq!(attribute.map(|(i, _)| i), Some(1));

        let element = index
            .equal_range("name", NameMatch::CaseInsensitive)
            .find(|(_, hook)| !hook.metadata().has_flag("xml:attribute"));
        assert_eq!(element.map(|(i, _)| i), Some(3));
    }

    #[test]
    fn boundaries() {
        let index = index();
        assert_eq!(positions(index.equal_range("alpha", NameMatch::Exact)), [2]);
        assert_eq!(positions(index.equal_range("zeta", NameMatch::CaseInsensitive)), [5]);
        assert_eq!(index.equal_range("", NameMatch::Exact).len(), 0);
        assert_eq!(index.equal_range("zz", NameMatch::Folded).len(), 0);
        assert_eq!(HookRange::EMPTY.len(), 0);

        let mut range = index.equal_range("NAME", NameMatch::CaseInsensitive);
        assert_eq!(range.next_back().map(|(i, _)| i), Some(4));
        assert_eq!(range.len(), 2);
    }
}
