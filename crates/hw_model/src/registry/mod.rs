//! The process-wide subclass registry.
//!
//! Polymorphic slots ([`Poly<dyn Base>`](crate::part::Poly)) resolve the
//! discriminator read from a format through this registry:
//!
//! 1. the exchange name is translated to a model name through the
//!    [name map](SubclassRegistry::map_name), falling back to the literal
//!    name;
//! 2. the factory registered for `(dyn Base, model name)` builds a default
//!    instance.
//!
//! Writing goes the other way: the runtime model name is translated to its
//! exchange name.
//!
//! ## auto_register
//!
//! With the `auto_register` feature (on by default), every
//! `#[model(subclass_of(dyn Base))]` type submits a registration function
//! through the [`inventory`] crate. The [`global`] registry runs them all the
//! first time it is used, so no explicit start-up step is needed. Without the
//! feature, or on platforms `inventory` does not support, register types with
//! [`SubclassRegistry::register`] on [`global`]`().write()` before the first
//! traversal.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod name_map;
mod subclass_registry;

// -----------------------------------------------------------------------------
// Exports

pub use name_map::NameMap;
pub use subclass_registry::{SubclassRegistry, SubclassRegistryArc};

use std::sync::LazyLock;

/// The registry used by every polymorphic slot.
pub fn global() -> &'static SubclassRegistryArc {
    static GLOBAL: LazyLock<SubclassRegistryArc> =
        LazyLock::new(|| SubclassRegistryArc::new(SubclassRegistry::new()));
    &GLOBAL
}
