//! Static storage for hook tables.
//!
//! A non-generic type keeps its table in a [`HookTableCell`], a thin
//! wrapper over [`OnceLock`].
//!
//! A `static` inside a generic function is shared by every instantiation,
//! so generic types use a [`GenericHookTableCell`] instead: a [`TypeIdMap`]
//! behind a [`RwLock`], with one leaked table per concrete type.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use hw_utils::TypeIdMap;

use super::HookTable;

/// Storage of the hook table of one non-generic type.
///
/// ## Example
///
/// ```
/// use hw_model::hook::{Hook, HookInfo, HookTable, HookTableCell};
/// use hw_model::metadata::Metadata;
///
/// struct Point { x: i32 }
///
/// fn hook_table() -> &'static HookTable<Point> {
///     static CELL: HookTableCell<Point> = HookTableCell::new();
///     CELL.get_or_init(|| HookTable::new([Hook::<Point>::new(
///         HookInfo::new("x", "x", Metadata::EMPTY),
///         |this, f| f(&this.x),
///         |this, f| f(&mut this.x),
///     )]))
/// }
///
/// assert!(core::ptr::eq(hook_table(), hook_table()));
/// ```
pub struct HookTableCell<T>(OnceLock<HookTable<T>>);

impl<T> HookTableCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the table, building it with `f` on first use.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> HookTable<T>) -> &HookTable<T> {
        self.0.get_or_init(f)
    }
}

/// Storage of the hook tables of every instantiation of a generic type.
///
/// ## Example
///
/// ```
/// use hw_model::hook::{GenericHookTableCell, Hook, HookInfo, HookTable};
/// use hw_model::metadata::Metadata;
/// use hw_model::part::ModelType;
///
/// struct Wrapper<T> { inner: T }
///
/// fn hook_table<T: ModelType + 'static>() -> &'static HookTable<Wrapper<T>> {
///     static CELL: GenericHookTableCell = GenericHookTableCell::new();
///     CELL.get_or_insert::<Wrapper<T>>(|| HookTable::new([Hook::<Wrapper<T>>::new(
///         HookInfo::new("inner", "inner", Metadata::EMPTY),
///         |this, f| f(&this.inner),
///         |this, f| f(&mut this.inner),
///     )]))
/// }
///
/// assert!(core::ptr::eq(hook_table::<i32>(), hook_table::<i32>()));
/// assert_eq!(hook_table::<u8>().len(), 1);
/// ```
pub struct GenericHookTableCell(RwLock<TypeIdMap<&'static (dyn Any + Send + Sync)>>);

impl GenericHookTableCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the table of `T`, building it with `f` on first use.
    pub fn get_or_insert<T: 'static>(&self, f: impl FnOnce() -> HookTable<T>) -> &'static HookTable<T> {
        let type_id = TypeId::of::<T>();

        let found = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        if let Some(table) = found.and_then(|any| any.downcast_ref::<HookTable<T>>()) {
            return table;
        }

        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        let any: &'static (dyn Any + Send + Sync) = *map.get_or_insert(type_id, || {
            Box::leak(Box::new(f())) as &'static (dyn Any + Send + Sync)
        });
        match any.downcast_ref::<HookTable<T>>() {
            Some(table) => table,
            None => unreachable!("hook tables are keyed by their own type"),
        }
    }
}

impl Default for GenericHookTableCell {
    fn default() -> Self {
        Self::new()
    }
}
