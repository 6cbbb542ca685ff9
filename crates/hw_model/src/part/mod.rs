//! The uniform node interface over an object graph.
//!
//! Every point of a model is viewed as a `dyn` [`Model`]: a field, a
//! collection element, a dictionary pair or the whole root object. Formats
//! only talk to this trait; the Rust types behind it stay unknown to them.
//!
//! ## Menu
//!
//! - [`ModelPartType`]: the five node shapes.
//! - [`Model`]: the object-safe node interface.
//! - [`ModelType`]: static facts about a node type, answered without a value.
//! - Node kinds: [`Complex`] (derived structs), [`ModelEnum`] (derived
//!   enums), `Vec<T>`, maps ([`MapLike`]), `Option<T>`, [`Poly`],
//!   [`Converted`], [`Blob`], [`Stream`] and every [`Scalar`].
//! - Roots: [`RootRef`] and [`RootMut`].
//!
//! [`Scalar`]: crate::value::Scalar

// -----------------------------------------------------------------------------
// Modules

mod complex;
mod converted;
mod dictionary;
mod enums;
mod optional;
mod poly;
mod root;
mod sequence;
mod simple;

// -----------------------------------------------------------------------------
// Exports

pub use complex::Complex;
pub use converted::{Conversion, Converted};
pub use dictionary::{DictionaryEntry, MapLike, PairRef};
pub use enums::{EnumSymbol, ModelEnum};
pub use poly::{Poly, PolyBase, SubclassOf};
pub use root::{RootMut, RootRef};
pub use simple::{Blob, Stream};

/// Helpers called by `#[derive(Model)]` expansions.
pub mod derive_support {
    pub use super::complex::{
        child_at, child_at_mut, child_count, for_each_child, for_each_child_mut, hook_index,
    };
    pub use super::enums::{enum_get_value, enum_set_value};
}

// -----------------------------------------------------------------------------
// Types

use alloc::borrow::Cow;
use core::fmt;

use crate::hook::{HookIndex, HookInfo, HookRange, NameMatch};
use crate::metadata::Metadata;
use crate::value::{Primitive, PrimitiveKind, PrimitiveKinds, no_conversion};
use crate::{Error, Result};

/// The shape of a node. Constant for a given node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelPartType {
    /// No value at all, e.g. `()`.
    Null,
    /// A leaf carrying one primitive.
    Simple,
    /// Named children, described by a hook table.
    Complex,
    /// Ordered, positional children.
    Sequence,
    /// Key/value pairs.
    Dictionary,
}

impl ModelPartType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Simple => "simple",
            Self::Complex => "complex",
            Self::Sequence => "sequence",
            Self::Dictionary => "dictionary",
        }
    }
}

impl fmt::Display for ModelPartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a child was reached from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKey<'a> {
    /// A named member of a Complex node.
    Hook(&'a HookInfo),
    /// A position in a Sequence or Dictionary node.
    Index(usize),
}

impl<'a> ChildKey<'a> {
    /// The member name, for hooks.
    #[inline]
    pub fn name(&self) -> Option<&'a str> {
        match self {
            Self::Hook(hook) => Some(hook.name()),
            Self::Index(_) => None,
        }
    }

    /// The member metadata; empty for positional children.
    #[inline]
    pub fn metadata(&self) -> Metadata {
        match self {
            Self::Hook(hook) => hook.metadata(),
            Self::Index(_) => Metadata::EMPTY,
        }
    }
}

/// Receives a node by shared reference.
pub type PartFn<'f> = dyn FnMut(&dyn Model) -> Result<()> + 'f;

/// Receives a node by mutable reference.
pub type PartMutFn<'f> = dyn FnMut(&mut dyn Model) -> Result<()> + 'f;

/// Receives each child with its key.
pub type ChildFn<'f> = dyn FnMut(ChildKey<'_>, &dyn Model) -> Result<()> + 'f;

/// Receives each child mutably with its key.
pub type ChildMutFn<'f> = dyn FnMut(ChildKey<'_>, &mut dyn Model) -> Result<()> + 'f;

// -----------------------------------------------------------------------------
// Model

#[cold]
pub(crate) fn unsupported(node: &'static str, reason: &'static str) -> Error {
    Error::invalid_operation(node, reason)
}

/// A node of the object graph.
///
/// Nodes are borrowed views; they never own the data they describe. Most
/// methods have defaults describing a node without children and without a
/// value, so each node kind only overrides what it supports. Calling an
/// operation a node kind does not support is a usage error
/// ([`Error::InvalidOperation`]), except [`set_null`](Model::set_null) on a
/// non-nullable node, which is a data error.
///
/// Children are handed to closures instead of being returned, so a node can
/// build a temporary wrapper (a converted field, a dictionary pair) on the
/// stack for the duration of the call.
pub trait Model {
    fn part_type(&self) -> ModelPartType;

    /// The runtime type name. For polymorphic slots this is the name of the
    /// contained derived type.
    fn model_name(&self) -> &'static str;

    /// `false` only for absent optional or polymorphic slots.
    fn has_value(&self) -> bool {
        true
    }

    /// Type level tags.
    fn metadata(&self) -> Metadata {
        Metadata::EMPTY
    }

    /// The native exchange kind of a Simple node.
    fn value_kind(&self) -> Option<PrimitiveKind> {
        None
    }

    /// Materializes storage for absent optional and polymorphic slots.
    fn create(&mut self) -> Result<()> {
        Ok(())
    }

    /// Finalizes the node once its children are populated.
    fn complete(&mut self) -> Result<()> {
        Ok(())
    }

    /// The member index of a Complex node.
    fn hook_index(&self) -> Option<&'static HookIndex> {
        None
    }

    fn child_count(&self) -> usize {
        0
    }

    /// Visits every child in declaration or container order.
    fn for_each_child(&self, _f: &mut ChildFn<'_>) -> Result<()> {
        Ok(())
    }

    /// Visits every child mutably.
    fn for_each_child_mut(&mut self, _f: &mut ChildMutFn<'_>) -> Result<()> {
        Ok(())
    }

    /// Visits the child at `index`: a hook position for Complex nodes, an
    /// element position otherwise.
    fn child_at(&self, _index: usize, _f: &mut PartFn<'_>) -> Result<()> {
        Err(unsupported(self.model_name(), "node has no children"))
    }

    fn child_at_mut(&mut self, _index: usize, _f: &mut PartMutFn<'_>) -> Result<()> {
        Err(unsupported(self.model_name(), "node has no children"))
    }

    /// Appends a new element to a Sequence or Dictionary node.
    ///
    /// The element is populated by `f` and completed before it becomes
    /// visible in the container; if `f` fails the container is unchanged.
    fn create_element(&mut self, _f: &mut PartMutFn<'_>) -> Result<()> {
        Err(unsupported(self.model_name(), "node is not a container"))
    }

    /// Reads the value as one of the `accepts` kinds.
    ///
    /// `Ok(None)` means "no value", which is distinct from a zero or
    /// `false` value.
    fn get_value(&self, _accepts: PrimitiveKinds) -> Result<Option<Primitive>> {
        Err(unsupported(self.model_name(), "node has no value"))
    }

    fn set_value(&mut self, _value: Primitive) -> Result<()> {
        Err(unsupported(self.model_name(), "node has no value"))
    }

    /// Clears an optional or polymorphic slot.
    fn set_null(&mut self) -> Result<()> {
        Err(no_conversion("null", self.model_name()))
    }

    /// `true` for slots whose runtime type is resolved through the subclass
    /// registry.
    fn is_polymorphic(&self) -> bool {
        false
    }

    /// The exchange name of the runtime type, or `None` when it equals the
    /// statically declared type.
    fn type_id_name(&self) -> Option<Cow<'static, str>> {
        None
    }

    /// Replaces the slot content with a new instance of the subclass
    /// registered under the exchange name `name`, then hands it to `f`.
    fn subclass_part(&mut self, _name: &str, _f: &mut PartMutFn<'_>) -> Result<()> {
        Err(unsupported(self.model_name(), "node is not polymorphic"))
    }
}

/// Static facts about a node type.
///
/// These are answered without a value, so an absent `Option<T>` can still
/// describe itself.
pub trait ModelType: Model {
    const PART_TYPE: ModelPartType;
    const NAME: &'static str;
    const VALUE_KIND: Option<PrimitiveKind> = None;
    const POLYMORPHIC: bool = false;

    fn static_hook_index() -> Option<&'static HookIndex> {
        None
    }

    fn static_metadata() -> Metadata {
        Metadata::EMPTY
    }
}

impl dyn Model + '_ {
    fn named_index(&self) -> Result<Option<&'static HookIndex>> {
        if self.part_type() != ModelPartType::Complex {
            return Err(unsupported(
                self.model_name(),
                "named child lookup on a non-complex node",
            ));
        }
        Ok(self.hook_index())
    }

    /// Every member matching `name`, in declaration order.
    ///
    /// Empty for nodes without a hook index.
    pub fn matches(&self, name: &str, mode: NameMatch) -> HookRange<'static> {
        match self.hook_index() {
            Some(index) => index.equal_range(name, mode),
            None => HookRange::EMPTY,
        }
    }

    /// Visits the first member matching `name`.
    ///
    /// Returns `Ok(false)` when nothing matches or the node is absent.
    pub fn child(&self, name: &str, mode: NameMatch, f: &mut PartFn<'_>) -> Result<bool> {
        let index = self.named_index()?;
        if !self.has_value() {
            return Ok(false);
        }
        match index.and_then(|index| index.position(name, mode)) {
            Some(position) => self.child_at(position, f).map(|()| true),
            None => Ok(false),
        }
    }

    /// Visits the first member matching `name` mutably, creating absent
    /// storage first.
    pub fn child_mut(&mut self, name: &str, mode: NameMatch, f: &mut PartMutFn<'_>) -> Result<bool> {
        let mut index = self.named_index()?;
        if index.is_none() && !self.has_value() {
            self.create()?;
            index = self.hook_index();
        }
        match index.and_then(|index| index.position(name, mode)) {
            Some(position) => self.child_at_mut(position, f).map(|()| true),
            None => Ok(false),
        }
    }

    /// Reads the value in its native kind.
    #[inline]
    pub fn value(&self) -> Result<Option<Primitive>> {
        self.get_value(PrimitiveKinds::all())
    }
}

impl fmt::Debug for dyn Model + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("part_type", &self.part_type())
            .field("model_name", &self.model_name())
            .field("has_value", &self.has_value())
            .finish()
    }
}
