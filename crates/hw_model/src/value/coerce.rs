use alloc::borrow::Cow;
use alloc::string::ToString;
use core::fmt::Display;
use core::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{Primitive, PrimitiveKind as K};
use crate::{Error, Result};

/// Textual form of date-times, ISO 8601 without offset.
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Date-time form used by SQL engines.
const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub(crate) fn no_conversion(
    from: impl Into<Cow<'static, str>>,
    to: impl Into<Cow<'static, str>>,
) -> Error {
    Error::NoConversion {
        from: from.into(),
        to: to.into(),
    }
}

#[cold]
fn out_of_range(value: impl Display, target: K) -> Error {
    Error::OutOfRange {
        value: value.to_string(),
        target,
    }
}

#[cold]
fn parse_error(value: &str, target: K) -> Error {
    Error::Parse {
        value: value.into(),
        target,
    }
}

#[derive(Clone, Copy)]
enum Number {
    Int(i128),
    Float(f64),
}

fn number_of(value: &Primitive) -> Option<Number> {
    Some(match *value {
        Primitive::Bool(v) => Number::Int(v as i128),
        Primitive::I8(v) => Number::Int(v.into()),
        Primitive::I16(v) => Number::Int(v.into()),
        Primitive::I32(v) => Number::Int(v.into()),
        Primitive::I64(v) => Number::Int(v.into()),
        Primitive::U8(v) => Number::Int(v.into()),
        Primitive::U16(v) => Number::Int(v.into()),
        Primitive::U32(v) => Number::Int(v.into()),
        Primitive::U64(v) => Number::Int(v.into()),
        Primitive::F32(v) => Number::Float(v.into()),
        Primitive::F64(v) => Number::Float(v),
        _ => return None,
    })
}

pub(super) fn coerce(value: Primitive, to: K) -> Result<Primitive> {
    let from = value.kind();
    if to == K::String {
        return Ok(Primitive::String(value.to_string()));
    }
    if let Some(number) = number_of(&value) {
        return from_number(number, from, to);
    }
    match value {
        Primitive::String(text) => parse(&text, to),
        Primitive::Date(date) if to == K::DateTime => {
            Ok(Primitive::DateTime(date.and_time(NaiveTime::MIN)))
        }
        _ => Err(no_conversion(from.name(), to.name())),
    }
}

fn to_int<T: TryFrom<i128>>(number: Number, to: K) -> Result<T> {
    let int = match number {
        Number::Int(v) => v,
        Number::Float(v) => {
            if !v.is_finite() || v.fract() != 0.0 || v.abs() >= 2_f64.powi(127) {
                return Err(out_of_range(v, to));
            }
            v as i128
        }
    };
    T::try_from(int).map_err(|_| out_of_range(int, to))
}

fn from_number(number: Number, from: K, to: K) -> Result<Primitive> {
    Ok(match to {
        K::Bool => match number {
            Number::Int(0) => Primitive::Bool(false),
            Number::Int(1) => Primitive::Bool(true),
            Number::Float(v) if v == 0.0 => Primitive::Bool(false),
            Number::Float(v) if v == 1.0 => Primitive::Bool(true),
            Number::Int(v) => return Err(out_of_range(v, to)),
            Number::Float(v) => return Err(out_of_range(v, to)),
        },
        K::I8 => Primitive::I8(to_int(number, to)?),
        K::I16 => Primitive::I16(to_int(number, to)?),
        K::I32 => Primitive::I32(to_int(number, to)?),
        K::I64 => Primitive::I64(to_int(number, to)?),
        K::U8 => Primitive::U8(to_int(number, to)?),
        K::U16 => Primitive::U16(to_int(number, to)?),
        K::U32 => Primitive::U32(to_int(number, to)?),
        K::U64 => Primitive::U64(to_int(number, to)?),
        K::F32 => match number {
            Number::Int(v) => {
                let f = v as f32;
                if f as i128 != v {
                    return Err(out_of_range(v, to));
                }
                Primitive::F32(f)
            }
            Number::Float(v) => {
                if v.is_finite() && v.abs() > f32::MAX as f64 {
                    return Err(out_of_range(v, to));
                }
                Primitive::F32(v as f32)
            }
        },
        K::F64 => match number {
            Number::Int(v) => {
                let f = v as f64;
                if f as i128 != v {
                    return Err(out_of_range(v, to));
                }
                Primitive::F64(f)
            }
            Number::Float(v) => Primitive::F64(v),
        },
        _ => return Err(no_conversion(from.name(), to.name())),
    })
}

fn parse_with<T: FromStr>(text: &str, to: K) -> Result<T> {
    text.parse::<T>().map_err(|_| parse_error(text, to))
}

fn parse(text: &str, to: K) -> Result<Primitive> {
    let trimmed = text.trim();
    match to {
        K::Bool => {
            if trimmed == "1" || trimmed.eq_ignore_ascii_case("true") {
                Ok(Primitive::Bool(true))
            } else if trimmed == "0" || trimmed.eq_ignore_ascii_case("false") {
                Ok(Primitive::Bool(false))
            } else {
                Err(parse_error(text, to))
            }
        }
        K::F32 => parse_with(trimmed, to).map(Primitive::F32),
        K::F64 => parse_with(trimmed, to).map(Primitive::F64),
        _ if to.is_integer() => {
            let number = match trimmed.parse::<i128>() {
                Ok(v) => Number::Int(v),
                Err(_) => Number::Float(parse_with(trimmed, to)?),
            };
            from_number(number, K::String, to)
        }
        K::Bytes => hex::decode(trimmed)
            .map(Primitive::Bytes)
            .map_err(|_| parse_error(text, to)),
        K::Date => parse_with::<NaiveDate>(trimmed, to).map(Primitive::Date),
        K::Time => parse_with::<NaiveTime>(trimmed, to).map(Primitive::Time),
        K::DateTime => trimmed
            .parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, SQL_DATETIME_FORMAT))
            .map(Primitive::DateTime)
            .map_err(|_| parse_error(text, to)),
        _ => Ok(Primitive::String(text.into())),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveKind;

    fn coerce(value: impl Into<Primitive>, to: PrimitiveKind) -> Result<Primitive> {
        value.into().coerce(to)
    }

    #[test]
    fn integer_bounds() {
        assert_eq!(coerce(u64::MAX, K::U64), Ok(Primitive::U64(u64::MAX)));
        assert_eq!(coerce(i64::MIN, K::I64), Ok(Primitive::I64(i64::MIN)));
        assert_eq!(coerce(255_u8, K::I8).unwrap_err(), out_of_range(255, K::I8));
        assert_eq!(coerce(-1_i32, K::U32).unwrap_err(), out_of_range(-1, K::U32));
        assert_eq!(coerce(u64::MAX, K::I64).unwrap_err(), out_of_range(u64::MAX, K::I64));
        assert_eq!(coerce(-128_i64, K::I8), Ok(Primitive::I8(-128)));
    }

    #[test]
    fn float_narrowing() {
        assert_eq!(coerce(1.5_f64, K::F32), Ok(Primitive::F32(1.5)));
        assert!(matches!(coerce(1e300_f64, K::F32), Err(Error::OutOfRange { .. })));
        assert!(matches!(coerce(f64::INFINITY, K::F32), Ok(Primitive::F32(v)) if v.is_infinite()));
        assert_eq!(coerce(3.0_f64, K::I32), Ok(Primitive::I32(3)));
        assert!(matches!(coerce(3.5_f64, K::I32), Err(Error::OutOfRange { .. })));
        assert!(matches!(coerce(f64::NAN, K::I64), Err(Error::OutOfRange { .. })));
        assert!(matches!(coerce((1_i64 << 53) + 1, K::F64), Err(Error::OutOfRange { .. })));
        assert_eq!(coerce(1_i64 << 53, K::F64), Ok(Primitive::F64(9007199254740992.0)));
    }

    #[test]
    fn booleans() {
        assert_eq!(coerce(true, K::U8), Ok(Primitive::U8(1)));
        assert_eq!(coerce(0_i64, K::Bool), Ok(Primitive::Bool(false)));
        assert!(coerce(2_i64, K::Bool).is_err());
        assert_eq!(coerce("TRUE", K::Bool), Ok(Primitive::Bool(true)));
        assert!(matches!(coerce("yes", K::Bool), Err(Error::Parse { .. })));
    }

    #[test]
    fn text_round_trip() {
        for value in [
            Primitive::I64(i64::MIN),
            Primitive::U64(u64::MAX),
            Primitive::F64(-0.0),
            Primitive::F64(0.1),
            Primitive::F32(f32::MAX),
            Primitive::Bytes(vec![0, 1, 254, 255]),
            Primitive::Date(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()),
            Primitive::Time(NaiveTime::from_hms_nano_opt(23, 59, 59, 5).unwrap()),
        ] {
            let kind = value.kind();
            let text = value.clone().coerce(K::String).unwrap();
            let back = text.coerce(kind).unwrap();
            match (&back, &value) {
                (Primitive::F64(a), Primitive::F64(b)) => assert_eq!(a.to_bits(), b.to_bits()),
                _ => assert_eq!(back, value),
            }
        }
    }

    #[test]
    fn text_parsing() {
        assert_eq!(coerce(" 42 ", K::U8), Ok(Primitive::U8(42)));
        assert_eq!(coerce("2.0", K::I16), Ok(Primitive::I16(2)));
        assert!(matches!(coerce("300", K::U8), Err(Error::OutOfRange { .. })));
        assert!(matches!(coerce("abc", K::I32), Err(Error::Parse { .. })));
        let sql = coerce("2024-01-02 03:04:05", K::DateTime).unwrap();
        let iso = coerce("2024-01-02T03:04:05", K::DateTime).unwrap();
        assert_eq!(sql, iso);
    }

    #[test]
    fn temporal() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 17).unwrap();
        let Primitive::DateTime(dt) = coerce(date, K::DateTime).unwrap() else {
            panic!("expected a date-time");
        };
        assert_eq!(dt.date(), date);
        assert!(matches!(coerce(date, K::I64), Err(Error::NoConversion { .. })));
    }
}
