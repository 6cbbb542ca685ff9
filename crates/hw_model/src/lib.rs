#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Derive expansions name this crate as `hw_model`, which has to resolve
// inside the crate itself as well as in its doc tests.
extern crate self as hw_model;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod format;
pub mod hook;
pub mod metadata;
pub mod part;
pub mod registry;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::{Error, Result};
pub use hw_model_derive as derive;
pub use hw_model_derive::Model;
pub use part::{Model, ModelPartType, ModelType};
