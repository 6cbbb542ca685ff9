//! Hook tables: the compile-time member list of a Complex node.
//!
//! A [`Hook<T>`] binds one member name of `T` to a pair of accessor
//! functions. `#[derive(Model)]` builds one [`HookTable<T>`] per type, once,
//! and keeps it in a static [`HookTableCell`] (or [`GenericHookTableCell`]
//! for generic types).
//!
//! ## Menu
//!
//! - [`HookInfo`]: name, folded name and [`Metadata`] of a member.
//! - [`HookIndex`]: name to hook lookup, see [`HookIndex::equal_range`].
//! - [`NameMatch`]: the case sensitivity of a lookup.
//! - [`HookTable`]: a [`HookIndex`] plus the typed accessors.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod index;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericHookTableCell, HookTableCell};
pub use index::{HookIndex, HookRange, NameMatch};

// -----------------------------------------------------------------------------
// Hook

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::metadata::Metadata;
use crate::part::{PartFn, PartMutFn};
use crate::{Error, Result};

/// Static descriptor of one named member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookInfo {
    name: &'static str,
    folded: &'static str,
    metadata: Metadata,
}

impl HookInfo {
    /// Creates a descriptor.
    ///
    /// `folded` must be `name` with ASCII letters lowercased.
    #[inline]
    pub const fn new(name: &'static str, folded: &'static str, metadata: Metadata) -> Self {
        Self {
            name,
            folded,
            metadata,
        }
    }

    /// The exact member name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The ASCII-lowercased member name.
    #[inline]
    pub const fn folded(&self) -> &'static str {
        self.folded
    }

    #[inline]
    pub const fn metadata(&self) -> Metadata {
        self.metadata
    }
}

/// Visits a member of `T` by shared reference.
pub type Getter<T> = fn(&T, &mut PartFn<'_>) -> Result<()>;

/// Visits a member of `T` by mutable reference.
pub type Setter<T> = fn(&mut T, &mut PartMutFn<'_>) -> Result<()>;

/// A member descriptor together with its accessors.
///
/// # Examples
///
/// ```
/// use hw_model::hook::{Hook, HookInfo, HookTable};
/// use hw_model::metadata::Metadata;
///
/// struct Point { x: i32 }
///
/// let table = HookTable::new([Hook::<Point>::new(
///     HookInfo::new("x", "x", Metadata::EMPTY),
///     |this, f| f(&this.x),
///     |this, f| f(&mut this.x),
/// )]);
/// assert_eq!(table.index().get(0).unwrap().name(), "x");
/// ```
pub struct Hook<T> {
    info: HookInfo,
    get: Getter<T>,
    get_mut: Setter<T>,
}

impl<T> Hook<T> {
    #[inline]
    pub const fn new(info: HookInfo, get: Getter<T>, get_mut: Setter<T>) -> Self {
        Self { info, get, get_mut }
    }

    #[inline]
    pub const fn info(&self) -> &HookInfo {
        &self.info
    }
}

impl<T> Clone for Hook<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Hook<T> {}

impl<T> fmt::Debug for Hook<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hook").field(&self.info).finish()
    }
}

// -----------------------------------------------------------------------------
// HookTable

/// The immutable member list of a Complex type `T`.
pub struct HookTable<T> {
    index: HookIndex,
    accessors: Box<[(Getter<T>, Setter<T>)]>,
}

impl<T> HookTable<T> {
    /// Builds the table; hooks keep their iteration order as declaration order.
    pub fn new(hooks: impl IntoIterator<Item = Hook<T>>) -> Self {
        let (infos, accessors): (Vec<_>, Vec<_>) = hooks
            .into_iter()
            .map(|hook| (hook.info, (hook.get, hook.get_mut)))
            .unzip();
        Self {
            index: HookIndex::new(infos),
            accessors: accessors.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn index(&self) -> &HookIndex {
        &self.index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Hands member `index` of `this` to `f`.
    pub fn visit(&self, index: usize, this: &T, f: &mut PartFn<'_>) -> Result<()> {
        match self.accessors.get(index) {
            Some((get, _)) => get(this, f),
            None => Err(out_of_range()),
        }
    }

    /// Hands member `index` of `this` to `f` mutably.
    pub fn visit_mut(&self, index: usize, this: &mut T, f: &mut PartMutFn<'_>) -> Result<()> {
        match self.accessors.get(index) {
            Some((_, get_mut)) => get_mut(this, f),
            None => Err(out_of_range()),
        }
    }
}

#[cold]
fn out_of_range() -> Error {
    Error::invalid_operation("hook table", "member index out of range")
}

impl<T> fmt::Debug for HookTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookTable").field("index", &self.index).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Model;
    use crate::value::{Primitive, PrimitiveKinds};

    struct Pair {
        left: i32,
        right: String,
    }

    fn table() -> HookTable<Pair> {
        HookTable::new([
            Hook::<Pair>::new(
                HookInfo::new("left", "left", Metadata::EMPTY),
                |this, f| f(&this.left),
                |this, f| f(&mut this.left),
            ),
            Hook::<Pair>::new(
                HookInfo::new("Right", "right", Metadata::EMPTY),
                |this, f| f(&this.right),
                |this, f| f(&mut this.right),
            ),
        ])
    }

    #[test]
    fn visit_by_index() {
        let table = table();
        let mut pair = Pair {
            left: 3,
            right: String::from("x"),
        };

        let mut seen = None;
        table
            .visit(0, &pair, &mut |part: &dyn Model| {
                seen = part.get_value(PrimitiveKinds::all())?;
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, Some(Primitive::I32(3)));

        table
            .visit_mut(1, &mut pair, &mut |part: &mut dyn Model| {
                part.set_value(Primitive::String("y".into()))
            })
            .unwrap();
        assert_eq!(pair.right, "y");

        assert!(table.visit(2, &pair, &mut |_| Ok(())).unwrap_err().is_usage());
    }
}
