use alloc::string::String;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{Primitive, PrimitiveKind, no_conversion};
use crate::Result;

/// A Rust type with a native [`Primitive`] representation.
///
/// Implemented for the numeric types, `bool`, `String` and the `chrono`
/// naive date/time types. Every `Scalar` is a Simple model node.
pub trait Scalar: Sized + 'static {
    /// The native exchange kind.
    const KIND: PrimitiveKind;

    fn to_primitive(&self) -> Primitive;

    /// Builds a value from `value`, coercing it to [`Self::KIND`] first.
    fn from_primitive(value: Primitive) -> Result<Self>;
}

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: PrimitiveKind = PrimitiveKind::$variant;

                #[inline]
                fn to_primitive(&self) -> Primitive {
                    Primitive::$variant(Clone::clone(self))
                }

                fn from_primitive(value: Primitive) -> Result<Self> {
                    match value.coerce(Self::KIND)? {
                        Primitive::$variant(v) => Ok(v),
                        other => Err(no_conversion(other.kind().name(), Self::KIND.name())),
                    }
                }
            }
        )*
    };
}

impl_scalar!(
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
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_primitive_coerces() {
        assert_eq!(u16::from_primitive(Primitive::I64(9)), Ok(9));
        assert_eq!(String::from_primitive(Primitive::U8(9)).as_deref(), Ok("9"));
        assert!(u8::from_primitive(Primitive::I32(-1)).is_err());
        assert_eq!(true.to_primitive(), Primitive::Bool(true));
    }
}
