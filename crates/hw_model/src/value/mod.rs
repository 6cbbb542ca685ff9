//! Primitive value exchange between model nodes and formats.
//!
//! A leaf node and a format trade exactly one [`Primitive`] per value. The
//! format announces which kinds it can represent with a [`PrimitiveKinds`]
//! set; the node offers its native kind when accepted and otherwise the
//! first successful coercion along a fixed fallback chain.
//!
//! Every coercion is explicit and range-checked: narrowing that does not
//! fit fails with [`Error::OutOfRange`](crate::Error::OutOfRange) instead of
//! truncating.

// -----------------------------------------------------------------------------
// Modules

mod coerce;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use scalar::Scalar;

pub(crate) use coerce::no_conversion;

// -----------------------------------------------------------------------------
// PrimitiveKind

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::Result;

/// The payload-less tag of a [`Primitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Bytes,
    Date,
    Time,
    DateTime,
}

impl PrimitiveKind {
    /// Every kind, in declaration order.
    pub const ALL: [PrimitiveKind; 16] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::String,
        Self::Bytes,
        Self::Date,
        Self::Time,
        Self::DateTime,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
        }
    }

    /// The single-element [`PrimitiveKinds`] of this kind.
    pub const fn as_set(self) -> PrimitiveKinds {
        match self {
            Self::Bool => PrimitiveKinds::BOOL,
            Self::I8 => PrimitiveKinds::I8,
            Self::I16 => PrimitiveKinds::I16,
            Self::I32 => PrimitiveKinds::I32,
            Self::I64 => PrimitiveKinds::I64,
            Self::U8 => PrimitiveKinds::U8,
            Self::U16 => PrimitiveKinds::U16,
            Self::U32 => PrimitiveKinds::U32,
            Self::U64 => PrimitiveKinds::U64,
            Self::F32 => PrimitiveKinds::F32,
            Self::F64 => PrimitiveKinds::F64,
            Self::String => PrimitiveKinds::STRING,
            Self::Bytes => PrimitiveKinds::BYTES,
            Self::Date => PrimitiveKinds::DATE,
            Self::Time => PrimitiveKinds::TIME,
            Self::DateTime => PrimitiveKinds::DATETIME,
        }
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        PrimitiveKinds::INTEGERS.contains(self.as_set())
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Kinds tried, in order, when a format does not accept this kind.
    pub(crate) const fn fallbacks(self) -> &'static [PrimitiveKind] {
        use PrimitiveKind as K;
        match self {
            K::Bool => &[K::I32, K::I64, K::U8, K::String],
            K::I8 => &[K::I16, K::I32, K::I64, K::F64, K::String],
            K::I16 => &[K::I32, K::I64, K::F64, K::String],
            K::I32 => &[K::I64, K::F64, K::String],
            K::I64 => &[K::F64, K::String],
            K::U8 => &[K::U16, K::I16, K::U32, K::I32, K::U64, K::I64, K::F64, K::String],
            K::U16 => &[K::U32, K::I32, K::U64, K::I64, K::F64, K::String],
            K::U32 => &[K::U64, K::I64, K::F64, K::String],
            K::U64 => &[K::I64, K::F64, K::String],
            K::F32 => &[K::F64, K::String],
            K::F64 => &[K::F32, K::String],
            K::String => &[],
            K::Bytes => &[K::String],
            K::Date => &[K::DateTime, K::String],
            K::Time => &[K::String],
            K::DateTime => &[K::String],
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// PrimitiveKinds

bitflags::bitflags! {
    /// The set of [`PrimitiveKind`]s a format can represent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PrimitiveKinds: u16 {
        const BOOL = 1 << 0;
        const I8 = 1 << 1;
        const I16 = 1 << 2;
        const I32 = 1 << 3;
        const I64 = 1 << 4;
        const U8 = 1 << 5;
        const U16 = 1 << 6;
        const U32 = 1 << 7;
        const U64 = 1 << 8;
        const F32 = 1 << 9;
        const F64 = 1 << 10;
        const STRING = 1 << 11;
        const BYTES = 1 << 12;
        const DATE = 1 << 13;
        const TIME = 1 << 14;
        const DATETIME = 1 << 15;

        const INTEGERS = Self::I8.bits() | Self::I16.bits() | Self::I32.bits() | Self::I64.bits()
            | Self::U8.bits() | Self::U16.bits() | Self::U32.bits() | Self::U64.bits();
        const FLOATS = Self::F32.bits() | Self::F64.bits();
        const NUMBERS = Self::INTEGERS.bits() | Self::FLOATS.bits();
        const TEMPORAL = Self::DATE.bits() | Self::TIME.bits() | Self::DATETIME.bits();
    }
}

impl PrimitiveKinds {
    /// Returns `true` if `kind` is in the set.
    #[inline]
    pub const fn accepts(self, kind: PrimitiveKind) -> bool {
        self.contains(kind.as_set())
    }
}

impl From<PrimitiveKind> for PrimitiveKinds {
    #[inline]
    fn from(kind: PrimitiveKind) -> Self {
        kind.as_set()
    }
}

// -----------------------------------------------------------------------------
// Primitive

/// A single exchanged value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Primitive {
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::U8(_) => PrimitiveKind::U8,
            Self::U16(_) => PrimitiveKind::U16,
            Self::U32(_) => PrimitiveKind::U32,
            Self::U64(_) => PrimitiveKind::U64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            Self::String(_) => PrimitiveKind::String,
            Self::Bytes(_) => PrimitiveKind::Bytes,
            Self::Date(_) => PrimitiveKind::Date,
            Self::Time(_) => PrimitiveKind::Time,
            Self::DateTime(_) => PrimitiveKind::DateTime,
        }
    }

    /// Converts into `to`, range-checked.
    ///
    /// # Examples
    ///
    /// ```
    /// use hw_model::value::{Primitive, PrimitiveKind};
    ///
    /// assert_eq!(Primitive::I64(200).coerce(PrimitiveKind::U8), Ok(Primitive::U8(200)));
    /// assert!(Primitive::I64(300).coerce(PrimitiveKind::U8).is_err());
    /// assert_eq!(
    ///     Primitive::String("-7".into()).coerce(PrimitiveKind::I16),
    ///     Ok(Primitive::I16(-7)),
    /// );
    /// ```
    #[inline]
    pub fn coerce(self, to: PrimitiveKind) -> Result<Primitive> {
        if self.kind() == to {
            return Ok(self);
        }
        coerce::coerce(self, to)
    }

    /// Offers a native value to a format accepting `accepts`.
    ///
    /// Returns the value itself when its kind is accepted, otherwise the
    /// first fallback coercion that succeeds.
    pub fn offer(self, accepts: PrimitiveKinds) -> Result<Primitive> {
        let kind = self.kind();
        if accepts.accepts(kind) {
            return Ok(self);
        }
        let mut failure = None;
        for &fallback in kind.fallbacks() {
            if accepts.accepts(fallback) {
                match self.clone().coerce(fallback) {
                    Ok(value) => return Ok(value),
                    Err(err) => failure = Some(err),
                }
            }
        }
        Err(failure.unwrap_or_else(|| no_conversion(kind.name(), alloc::format!("{accepts:?}"))))
    }

    /// Returns the string payload, if this is a string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::I8(v) => fmt::Display::fmt(v, f),
            Self::I16(v) => fmt::Display::fmt(v, f),
            Self::I32(v) => fmt::Display::fmt(v, f),
            Self::I64(v) => fmt::Display::fmt(v, f),
            Self::U8(v) => fmt::Display::fmt(v, f),
            Self::U16(v) => fmt::Display::fmt(v, f),
            Self::U32(v) => fmt::Display::fmt(v, f),
            Self::U64(v) => fmt::Display::fmt(v, f),
            Self::F32(v) => fmt::Display::fmt(v, f),
            Self::F64(v) => fmt::Display::fmt(v, f),
            Self::String(v) => f.write_str(v),
            Self::Bytes(v) => f.write_str(&hex::encode(v)),
            Self::Date(v) => fmt::Display::fmt(v, f),
            Self::Time(v) => fmt::Display::fmt(v, f),
            Self::DateTime(v) => fmt::Display::fmt(&v.format(coerce::DATETIME_FORMAT), f),
        }
    }
}

macro_rules! impl_from_native {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Primitive {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_native!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
);

impl From<&str> for Primitive {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_sets() {
        for kind in PrimitiveKind::ALL {
            assert!(PrimitiveKinds::all().accepts(kind));
            assert_eq!(PrimitiveKinds::from(kind).bits().count_ones(), 1);
        }
        assert!(PrimitiveKind::U64.is_integer());
        assert!(!PrimitiveKind::F32.is_integer());
        assert!(PrimitiveKinds::NUMBERS.accepts(PrimitiveKind::F32));
        assert!(!PrimitiveKinds::NUMBERS.accepts(PrimitiveKind::Bool));
    }

    #[test]
    fn offer_prefers_native() {
        let value = Primitive::U16(7).offer(PrimitiveKinds::all()).unwrap();
        assert_eq!(value, Primitive::U16(7));
    }

    #[test]
    fn offer_walks_fallbacks() {
        let value = Primitive::U16(7).offer(PrimitiveKinds::I64 | PrimitiveKinds::STRING);
        assert_eq!(value, Ok(Primitive::I64(7)));

        let value = Primitive::Bytes(vec![0xAB, 0x01]).offer(PrimitiveKinds::STRING);
        assert_eq!(value, Ok(Primitive::String("ab01".into())));

        // 2^60 + 1 has no exact f64 representation, so the string fallback is used.
        let big = (1_i64 << 60) + 1;
        let value = Primitive::I64(big).offer(PrimitiveKinds::F64 | PrimitiveKinds::STRING);
        assert_eq!(value, Ok(Primitive::String(big.to_string())));
    }

    #[test]
    fn offer_without_route_fails() {
        let err = Primitive::Time(NaiveTime::MIN).offer(PrimitiveKinds::NUMBERS).unwrap_err();
        assert!(matches!(err, crate::Error::NoConversion { .. }));
    }

    #[test]
    fn display() {
        assert_eq!(Primitive::F64(-0.0).to_string(), "-0");
        assert_eq!(Primitive::from("x").to_string(), "x");
        let dt = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(Primitive::DateTime(dt).to_string(), "2024-02-29T10:30:00");
    }
}
