use alloc::borrow::Cow;
use alloc::string::String;

use thiserror::Error;

use crate::part::ModelPartType;
use crate::value::PrimitiveKind;

/// A specialized [`Result`](core::result::Result) for model traversal.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Every failure a traversal can surface.
///
/// Variants fall into three families that callers usually handle
/// differently:
///
/// - "not found": [`Error::NoRows`], see [`Error::is_not_found`].
/// - malformed or mismatched data: most other variants.
/// - programmer misuse: [`Error::InvalidOperation`], see [`Error::is_usage`].
///
/// Nothing in the model catches or retries these; they are returned to the
/// caller of the top level entry point unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A serializer or deserializer was handed a root it cannot represent.
    #[error("{context} does not support `{found}` roots")]
    UnsupportedModelType {
        context: &'static str,
        found: ModelPartType,
    },
    /// A single row was expected but the source had none.
    #[error("no rows returned")]
    NoRows,
    /// A single row was expected but the source had more than one.
    #[error("too many rows returned")]
    TooManyRows,
    /// A type discriminator did not resolve to a registered subclass.
    #[error("unknown type `{name}` for base `{base}`")]
    UnknownType { base: &'static str, name: String },
    /// A member name in the input matched no member of the target.
    #[error("incorrect element name `{name}` in `{owner}`")]
    IncorrectElementName { owner: &'static str, name: String },
    /// A string did not match any symbol of an enumeration.
    #[error("invalid enumeration symbol `{symbol}` for `{enum_name}`")]
    InvalidEnumSymbol {
        enum_name: &'static str,
        symbol: String,
    },
    /// An integer did not match any value of an enumeration.
    #[error("invalid enumeration value {value} for `{enum_name}`")]
    InvalidEnumValue { enum_name: &'static str, value: i128 },
    /// No conversion accepted the offered or requested exchange type.
    #[error("no conversion found from {from} to `{to}`")]
    NoConversion {
        from: Cow<'static, str>,
        to: Cow<'static, str>,
    },
    /// A numeric value does not fit the target kind.
    #[error("value {value} is out of range for {target}")]
    OutOfRange { value: String, target: PrimitiveKind },
    /// A textual value could not be parsed as the target kind.
    #[error("cannot parse `{value}` as {target}")]
    Parse { value: String, target: PrimitiveKind },
    /// The operation is not meaningful for this kind of node.
    #[error("invalid operation on `{node}`: {reason}")]
    InvalidOperation {
        node: &'static str,
        reason: &'static str,
    },
    /// A generated identifier was requested into a non-integer field.
    #[error("field `{0}` cannot hold a generated identifier")]
    UnsuitableGeneratedIdField(&'static str),
    /// The input of a format is not well formed.
    #[error("malformed input: {0}")]
    Malformed(Cow<'static, str>),
}

impl Error {
    /// Creates [`Error::InvalidOperation`].
    #[inline]
    pub const fn invalid_operation(node: &'static str, reason: &'static str) -> Self {
        Self::InvalidOperation { node, reason }
    }

    /// Creates [`Error::Malformed`].
    #[inline]
    pub fn malformed(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Returns `true` for programming errors, which should not be caught in
    /// normal operation.
    #[inline]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidOperation { .. })
    }

    /// Returns `true` when the source simply had nothing to offer.
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NoRows)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::part::ModelPartType;

    #[test]
    fn families() {
        assert!(Error::NoRows.is_not_found());
        assert!(!Error::TooManyRows.is_not_found());
        assert!(Error::invalid_operation("Stream", "read only").is_usage());
        assert!(!Error::malformed("eof").is_usage());
    }

    #[test]
    fn display() {
        let err = Error::UnsupportedModelType {
            context: "insert serializer",
            found: ModelPartType::Dictionary,
        };
        assert_eq!(err.to_string(), "insert serializer does not support `dictionary` roots");
        assert_eq!(
            Error::InvalidEnumValue { enum_name: "Color", value: 7 }.to_string(),
            "invalid enumeration value 7 for `Color`"
        );
    }
}
