//! XML documents with a Complex root.
//!
//! | node         | XML                                                  |
//! |--------------|------------------------------------------------------|
//! | Complex      | element named after the member (root: the type)      |
//! | member tagged `xml:attribute` | attribute, when the member is Simple |
//! | Sequence     | element with one `<item>` per element, or the name from `xml:item:<name>` |
//! | Dictionary   | `<entry><key>…</key><value>…</value></entry>` per entry |
//! | Simple       | text content                                         |
//! | absent       | omitted as a member, `_nil="true"` elsewhere         |
//!
//! A polymorphic node whose runtime type differs from the declared type
//! carries its exchange name in a `_type` attribute. The root element is
//! named by the type level tag `xml:name:<name>`, or the model name.
//!
//! # Examples
//!
//! ```
//! use hw_model::Model;
//! use hw_format::xml;
//!
//! #[derive(Model, Default, Debug, PartialEq)]
//! struct Point {
//!     #[model(tag = "xml:attribute")]
//!     x: i32,
//!     y: i32,
//! }
//!
//! let text = xml::to_string(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(text, r#"<Point x="1"><y>2</y></Point>"#);
//! assert_eq!(xml::from_str::<Point>(&text).unwrap(), Point { x: 1, y: 2 });
//! ```

// -----------------------------------------------------------------------------
// Modules

mod parser;
mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::XmlDeserializer;
pub use writer::XmlSerializer;

use alloc::borrow::Cow;
use alloc::string::String;

use hw_model::format;
use hw_model::hook::NameMatch;
use hw_model::part::{Model, ModelType};
use hw_model::Result;

use crate::UnknownFields;

/// Member flag selecting attribute placement.
pub const ATTRIBUTE_FLAG: &str = "xml:attribute";

const ITEM_KEY: &str = "xml:item";
const NAME_KEY: &str = "xml:name";
const TYPE_ATTR: &str = "_type";
const NIL_ATTR: &str = "_nil";

/// Reader settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XmlOptions {
    /// Attributes and elements without a matching member.
    pub unknown_elements: UnknownFields,
    pub name_match: NameMatch,
}

impl XmlOptions {
    /// Case-insensitive names, unknown names skipped.
    pub const LENIENT: Self = Self {
        unknown_elements: UnknownFields::Ignore,
        name_match: NameMatch::CaseInsensitive,
    };
}

#[inline]
fn element_name(node: &dyn Model) -> &'static str {
    node.metadata()
        .value(NAME_KEY)
        .unwrap_or_else(|| node.model_name())
}

/// Positional members (`0`, `1`, ...) are written as `_0`, `_1`, ... since
/// XML names cannot start with a digit.
fn xml_member_name(member: &str) -> Cow<'_, str> {
    if member.starts_with(|c: char| c.is_ascii_digit()) {
        Cow::Owned(alloc::format!("_{member}"))
    } else {
        Cow::Borrowed(member)
    }
}

fn member_of_xml_name(name: &str) -> &str {
    match name.strip_prefix('_') {
        Some(position) if position.starts_with(|c: char| c.is_ascii_digit()) => position,
        _ => name,
    }
}

// -----------------------------------------------------------------------------
// Shortcuts

/// Serializes `value` as a compact document.
#[inline]
pub fn to_string(value: &dyn Model) -> Result<String> {
    format::serialize_any(XmlSerializer::new(), value)
}

/// Builds a `T` from a document with the default options.
#[inline]
pub fn from_str<T: ModelType + Default>(input: &str) -> Result<T> {
    format::deserialize_any::<T, _>(XmlDeserializer::new(input))
}

/// Populates an existing value from a document.
#[inline]
pub fn from_str_into(input: &str, value: &mut dyn Model, options: XmlOptions) -> Result<()> {
    format::deserialize_into(XmlDeserializer::with_options(input, options), value)
}

// -----------------------------------------------------------------------------
// Tests
