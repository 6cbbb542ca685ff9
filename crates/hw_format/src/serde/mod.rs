//! Bridge between model graphs and `serde`.
//!
//! - [`ModelSerialize`]: implements `serde::Serialize` over a `&dyn Model`.
//! - [`ModelSeed`]: implements `serde::de::DeserializeSeed` over a
//!   `&mut dyn Model`.
//!
//! Both work with any self-describing `serde` format. Nodes are mapped as
//! follows:
//!
//! | node         | serde data model                                   |
//! |--------------|----------------------------------------------------|
//! | absent       | `none`                                             |
//! | `Null`       | `unit`                                             |
//! | `Simple`     | the scalar of the exchanged [`Primitive`]          |
//! | `Complex`    | map of member names, discriminator first under [`TYPE_KEY`] |
//! | `Sequence`   | seq                                                |
//! | `Dictionary` | map                                                |
//!
//! Human readable formats receive bytes as hex strings; dates and times are
//! always written as ISO 8601 strings.
//!
//! ## Errors
//!
//! A model error raised in the middle of a `serde` call is stored in the
//! [`SerdeContext`] and only a message crosses the `serde` boundary.
//! [`SerdeContext::resolve`] gives the original error back.
//!
//! [`Primitive`]: hw_model::value::Primitive

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

#[cfg(all(debug_assertions, feature = "debug"))]
mod node_path;

// -----------------------------------------------------------------------------
// Exports

pub use de::ModelSeed;
pub use ser::ModelSerialize;

// -----------------------------------------------------------------------------
// SerdeContext

use alloc::string::{String, ToString};
use core::cell::RefCell;
use core::fmt::Display;

use hw_model::Error;
use hw_model::hook::NameMatch;

use crate::UnknownFields;

/// The key a polymorphic member's discriminator is written under.
pub const TYPE_KEY: &str = "$type";

/// Shared state of one serialization or deserialization call.
pub struct SerdeContext {
    failure: RefCell<Option<Error>>,
    name_match: NameMatch,
    unknown_fields: UnknownFields,
    #[cfg(all(debug_assertions, feature = "debug"))]
    path: RefCell<node_path::NodePath>,
}

impl Default for SerdeContext {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SerdeContext {
    /// Exact member names, unknown members rejected.
    #[inline]
    pub fn new() -> Self {
        Self::with_options(NameMatch::Exact, UnknownFields::Error)
    }

    pub fn with_options(name_match: NameMatch, unknown_fields: UnknownFields) -> Self {
        Self {
            failure: RefCell::new(None),
            name_match,
            unknown_fields,
            #[cfg(all(debug_assertions, feature = "debug"))]
            path: RefCell::new(node_path::NodePath::new()),
        }
    }

    #[inline]
    pub fn name_match(&self) -> NameMatch {
        self.name_match
    }

    #[inline]
    pub fn unknown_fields(&self) -> UnknownFields {
        self.unknown_fields
    }

    /// Stores `err` and returns the message to hand to `serde`.
    ///
    /// Only the first error is kept.
    pub(crate) fn record(&self, err: Error) -> String {
        let msg = err.to_string();
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            *failure = Some(err);
        }
        msg
    }

    /// The error to report for a failed `serde` call.
    ///
    /// Returns the recorded model error if there is one, otherwise
    /// [`Error::Malformed`] built from the `serde` error.
    pub fn resolve(&self, err: impl Display) -> Error {
        if let Some(recorded) = self.failure.borrow_mut().take() {
            #[cfg(all(debug_assertions, feature = "debug"))]
            log::debug!("{recorded} at `{}`", self.path.borrow());
            return recorded;
        }

        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            let path = self.path.borrow();
            if !path.is_empty() {
                return Error::malformed(alloc::format!("{err} at `{path}`"));
            }
        }

        Error::malformed(err.to_string())
    }

    /// Runs `f` with `segment` pushed on the node path.
    ///
    /// The segment stays on the path when `f` fails, so the path points at
    /// the failing node.
    #[inline]
    pub(crate) fn scoped<T, E>(
        &self,
        segment: impl FnOnce() -> Segment,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            self.path.borrow_mut().push(segment());
            let result = f();
            if result.is_ok() {
                self.path.borrow_mut().pop();
            }
            result
        }

        #[cfg(not(all(debug_assertions, feature = "debug")))]
        {
            let _ = segment;
            f()
        }
    }
}

impl core::fmt::Debug for SerdeContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerdeContext")
            .field("name_match", &self.name_match)
            .field("unknown_fields", &self.unknown_fields)
            .finish_non_exhaustive()
    }
}

/// One step of a node path.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    Member(String),
    Index(usize),
}

/// Placeholder error carried through model callbacks while the real
/// `serde` error waits in a local slot.
#[cold]
fn interrupted() -> Error {
    Error::malformed("interrupted by the serde data format")
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::Any;

    use hw_model::part::Poly;
    use hw_model::registry;
    use hw_model::{Error, Model, impl_poly_base};
    use serde_core::de::DeserializeSeed;

    use super::{ModelSeed, ModelSerialize, SerdeContext};
    use crate::json;

    trait Shape: Model + Any {}

    impl_poly_base!(dyn Shape, declared = Square);

    #[derive(Model, Default, Debug, PartialEq)]
    #[model(subclass_of(dyn Shape))]
    struct Square {
        side: f64,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    #[model(subclass_of(dyn Shape), exchange_name = "circle")]
    struct Circle {
        radius: f64,
    }

    impl Shape for Square {}
    impl Shape for Circle {}

    #[derive(Model, Default)]
    struct Canvas {
        shapes: Vec<Poly<dyn Shape>>,
        focus: Option<Poly<dyn Shape>>,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Settings {
        title: String,
        volume: Option<u8>,
        levels: BTreeMap<u16, String>,
        history: Vec<Option<i64>>,
    }

    fn registered() {
        let mut registry = registry::global().write();
        registry.register::<dyn Shape, Square>();
        registry.register::<dyn Shape, Circle>();
    }

    #[test]
    fn discriminator_only_when_needed() {
        registered();
        let canvas = Canvas {
            shapes: vec![
                Poly::<dyn Shape>::new(Box::new(Square { side: 1.0 })),
                Poly::<dyn Shape>::new(Box::new(Circle { radius: 2.5 })),
            ],
            focus: None,
        };
        let json = json::to_string(&canvas).unwrap();
        assert_eq!(
            json,
            r#"{"shapes":[{"side":1.0},{"$type":"circle","radius":2.5}],"focus":null}"#
        );

        let back: Canvas = json::from_str(&json).unwrap();
        assert_eq!(back.shapes.len(), 2);
        assert_eq!(back.shapes[0].downcast_ref::<Square>(), Some(&Square { side: 1.0 }));
        assert_eq!(back.shapes[1].downcast_ref::<Circle>(), Some(&Circle { radius: 2.5 }));
        assert!(back.focus.is_none());
    }

    #[test]
    fn unknown_discriminator() {
        registered();
        let mut canvas = Canvas::default();
        let err = json::from_str_into(
            r#"{"shapes":[{"side":2.0},{"$type":"hexagon","side":1.0}]}"#,
            &mut canvas,
            json::JsonOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::UnknownType {
                base: "Shape",
                name: String::from("hexagon")
            }
        );
        assert_eq!(canvas.shapes.len(), 1);
    }

    #[test]
    fn any_self_describing_format() {
        let settings = Settings {
            title: String::from("main"),
            volume: None,
            levels: BTreeMap::from([(1, String::from("low")), (9, String::from("high"))]),
            history: vec![Some(-3), None, Some(12)],
        };
        let ctx = SerdeContext::new();
        let text = ron::to_string(&ModelSerialize::new(&settings, &ctx)).unwrap();

        let mut back = Settings::default();
        let mut de = ron::Deserializer::from_str(&text).unwrap();
        ModelSeed::new(&mut back, &ctx).deserialize(&mut de).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn failed_entry_is_not_inserted() {
        let mut settings = Settings::default();
        let err = json::from_str_into(
            r#"{"levels": {"1": "a", "2": "b", "x": "c"}}"#,
            &mut settings,
            json::JsonOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(settings.levels.len(), 2);
    }

    #[test]
    fn first_error_wins() {
        let ctx = SerdeContext::new();
        let _ = ctx.record(Error::NoRows);
        let _ = ctx.record(Error::TooManyRows);
        assert_eq!(ctx.resolve("ignored"), Error::NoRows);
        assert!(matches!(ctx.resolve("eof"), Error::Malformed(_)));
    }

    #[cfg(all(debug_assertions, feature = "debug"))]
    #[test]
    fn malformed_errors_carry_the_path() {
        let err = json::from_str::<Settings>(r#"{"history": [1, {}]}"#).unwrap_err();
        let Error::Malformed(msg) = err else {
            panic!("expected a malformed input error, got {err:?}");
        };
        assert!(msg.ends_with("at `history[1]`"), "{msg}");
    }
}
