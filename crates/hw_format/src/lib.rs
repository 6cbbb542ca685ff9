//! Wire formats for `hw_model` graphs.
//!
//! Each format implements [`hw_model::format::Serializer`] and/or
//! [`hw_model::format::Deserializer`] and talks to the graph only through
//! `dyn Model`:
//!
//! - [`serde`]: a bridge usable with any self-describing `serde` format.
//! - [`json`]: JSON through `serde_json`.
//! - [`binary`]: a compact tagged encoding for RPC payloads.
//! - [`xml`]: an XML writer and a small reader.
//! - [`sql`]: result rows into models, models into insert bindings.
//!
//! ## Example
//!
//! ```
//! use hw_model::Model;
//!
//! #[derive(Model, Default, Debug, PartialEq)]
//! struct Book {
//!     title: String,
//!     pages: u32,
//! }
//!
//! let book = Book { title: "Dune".into(), pages: 412 };
//!
//! let json = hw_format::json::to_string(&book).unwrap();
//! assert_eq!(json, r#"{"title":"Dune","pages":412}"#);
//! assert_eq!(hw_format::json::from_str::<Book>(&json).unwrap(), book);
//!
//! let bytes = hw_format::binary::to_vec(&book).unwrap();
//! assert_eq!(hw_format::binary::from_slice::<Book>(&bytes).unwrap(), book);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod binary;
pub mod json;
pub mod serde;
pub mod sql;
pub mod xml;

// -----------------------------------------------------------------------------
// Options

/// What a reader does with a member name the target does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFields {
    /// Fail with [`hw_model::Error::IncorrectElementName`].
    #[default]
    Error,
    /// Skip the value and log a warning.
    Ignore,
}
