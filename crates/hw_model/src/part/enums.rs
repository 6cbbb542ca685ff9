//! Fieldless enums as Simple nodes.
//!
//! An enum exchanges its symbol name as a string when the format accepts
//! strings, otherwise its discriminant as an integer. Reading accepts
//! either form.

use alloc::format;
use alloc::string::String;

use super::ModelType;
use crate::value::{Primitive, PrimitiveKind, PrimitiveKinds, no_conversion};
use crate::{Error, Result};

/// One declared enumerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumSymbol {
    pub name: &'static str,
    pub value: i64,
}

impl EnumSymbol {
    #[inline]
    pub const fn new(name: &'static str, value: i64) -> Self {
        Self { name, value }
    }
}

/// A fieldless enum with a symbol table, implemented by `#[derive(Model)]`.
pub trait ModelEnum: ModelType + Sized + 'static {
    /// Enumerators in declaration order.
    const SYMBOLS: &'static [EnumSymbol];

    /// Position of `self` in [`Self::SYMBOLS`].
    fn symbol_index(&self) -> usize;

    fn from_symbol_index(index: usize) -> Option<Self>;

    /// The symbol of `self`.
    #[inline]
    fn symbol(&self) -> EnumSymbol {
        Self::SYMBOLS[self.symbol_index()]
    }

    /// Finds an enumerator by name, preferring an exact match over a case
    /// insensitive one.
    fn from_name(name: &str) -> Result<Self> {
        let position = Self::SYMBOLS
            .iter()
            .position(|s| s.name == name)
            .or_else(|| Self::SYMBOLS.iter().position(|s| s.name.eq_ignore_ascii_case(name)));
        position
            .and_then(Self::from_symbol_index)
            .ok_or_else(|| Error::InvalidEnumSymbol {
                enum_name: Self::NAME,
                symbol: String::from(name),
            })
    }

    /// Finds an enumerator by discriminant.
    fn from_value(value: i128) -> Result<Self> {
        Self::SYMBOLS
            .iter()
            .position(|s| i128::from(s.value) == value)
            .and_then(Self::from_symbol_index)
            .ok_or(Error::InvalidEnumValue {
                enum_name: Self::NAME,
                value,
            })
    }
}

/// [`Model::get_value`](super::Model::get_value) of a derived enum.
pub fn enum_get_value<E: ModelEnum>(this: &E, accepts: PrimitiveKinds) -> Result<Option<Primitive>> {
    let symbol = this.symbol();
    if accepts.accepts(PrimitiveKind::String) {
        return Ok(Some(Primitive::String(String::from(symbol.name))));
    }
    let number = Primitive::I64(symbol.value);
    if let Ok(value) = number.clone().offer(accepts) {
        return Ok(Some(value));
    }
    // Narrower integer kinds, range-checked.
    PrimitiveKind::ALL
        .into_iter()
        .filter(|kind| kind.is_integer() && accepts.accepts(*kind))
        .find_map(|kind| number.clone().coerce(kind).ok())
        .map(Some)
        .ok_or_else(|| no_conversion(E::NAME, format!("{accepts:?}")))
}

/// [`Model::set_value`](super::Model::set_value) of a derived enum.
pub fn enum_set_value<E: ModelEnum>(this: &mut E, value: Primitive) -> Result<()> {
    *this = match value {
        Primitive::String(text) => match E::from_name(&text) {
            Ok(found) => found,
            Err(err) => match text.trim().parse::<i128>() {
                Ok(number) => E::from_value(number)?,
                Err(_) => return Err(err),
            },
        },
        Primitive::U64(number) => E::from_value(number.into())?,
        other => match other.coerce(PrimitiveKind::I64)? {
            Primitive::I64(number) => E::from_value(number.into())?,
            unexpected => {
                return Err(no_conversion(unexpected.kind().name(), E::NAME));
            }
        },
    };
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Model;
    use crate::part::ModelPartType;

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    enum Level {
        #[default]
        Low = 1,
        High = 10,
    }

    impl ModelEnum for Level {
        const SYMBOLS: &'static [EnumSymbol] = &[
            EnumSymbol::new("Low", Level::Low as i64),
            EnumSymbol::new("High", Level::High as i64),
        ];

        fn symbol_index(&self) -> usize {
            match self {
                Self::Low => 0,
                Self::High => 1,
            }
        }

        fn from_symbol_index(index: usize) -> Option<Self> {
            match index {
                0 => Some(Self::Low),
                1 => Some(Self::High),
                _ => None,
            }
        }
    }

    impl Model for Level {
        fn part_type(&self) -> ModelPartType {
            ModelPartType::Simple
        }

        fn model_name(&self) -> &'static str {
            "Level"
        }

        fn get_value(&self, accepts: PrimitiveKinds) -> Result<Option<Primitive>> {
            enum_get_value(self, accepts)
        }

        fn set_value(&mut self, value: Primitive) -> Result<()> {
            enum_set_value(self, value)
        }
    }

    impl ModelType for Level {
        const PART_TYPE: ModelPartType = ModelPartType::Simple;
        const NAME: &'static str = "Level";
    }

    #[test]
    fn symbol_preferred() {
        assert_eq!(
            Level::High.get_value(PrimitiveKinds::all()),
            Ok(Some(Primitive::from("High")))
        );
        assert_eq!(
            Level::High.get_value(PrimitiveKinds::INTEGERS),
            Ok(Some(Primitive::I64(10)))
        );
        assert_eq!(
            Level::High.get_value(PrimitiveKinds::U8),
            Ok(Some(Primitive::U8(10)))
        );
    }

    #[test]
    fn set_by_symbol_or_value() {
        let mut level = Level::Low;
        level.set_value(Primitive::from("high")).unwrap();
        assert_eq!(level, Level::High);
        level.set_value(Primitive::U8(1)).unwrap();
        assert_eq!(level, Level::Low);
        level.set_value(Primitive::from("10")).unwrap();
        assert_eq!(level, Level::High);
    }

    #[test]
    fn invalid_inputs() {
        let mut level = Level::Low;
        assert_eq!(
            level.set_value(Primitive::from("Medium")),
            Err(Error::InvalidEnumSymbol {
                enum_name: "Level",
                symbol: "Medium".into()
            })
        );
        assert_eq!(
            level.set_value(Primitive::I32(5)),
            Err(Error::InvalidEnumValue {
                enum_name: "Level",
                value: 5
            })
        );
        assert_eq!(
            level.set_value(Primitive::from("5")),
            Err(Error::InvalidEnumValue {
                enum_name: "Level",
                value: 5
            })
        );
        assert_eq!(
            level.set_value(Primitive::U64(u64::MAX)),
            Err(Error::InvalidEnumValue {
                enum_name: "Level",
                value: u64::MAX.into()
            })
        );
        assert_eq!(
            level.set_value(Primitive::from("-99999999999999999999")),
            Err(Error::InvalidEnumValue {
                enum_name: "Level",
                value: -99_999_999_999_999_999_999
            })
        );
        level.set_value(Primitive::U64(10)).unwrap();
        assert_eq!(level, Level::High);
    }
}
