//! Fields exchanged through user supplied conversions.
//!
//! `#[model(convert(A, B))]` wraps the field in a [`Converted`] node for the
//! duration of each access. Conversions are tried in declaration order
//! before the field's own [`Model::get_value`] / [`Model::set_value`],
//! which `#[model(no_default_conversion)]` turns off.

use alloc::format;

use super::{Model, ModelPartType, ModelType, unsupported};
use crate::Result;
use crate::value::{Primitive, PrimitiveKind, PrimitiveKinds, no_conversion};

/// One way of exchanging a `T` as a primitive of kind `exchange`.
pub struct Conversion<T> {
    pub name: &'static str,
    pub exchange: PrimitiveKind,
    pub load: fn(Primitive) -> Result<T>,
    pub store: fn(&T) -> Result<Primitive>,
}

impl<T> Conversion<T> {
    #[inline]
    pub const fn new(
        name: &'static str,
        exchange: PrimitiveKind,
        load: fn(Primitive) -> Result<T>,
        store: fn(&T) -> Result<Primitive>,
    ) -> Self {
        Self {
            name,
            exchange,
            load,
            store,
        }
    }
}

impl<T> Clone for Conversion<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Conversion<T> {}

impl<T> core::fmt::Debug for Conversion<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Conversion")
            .field("name", &self.name)
            .field("exchange", &self.exchange)
            .finish()
    }
}

enum Slot<'a, T> {
    Ref(&'a T),
    Mut(&'a mut T),
    OptRef(&'a Option<T>),
    OptMut(&'a mut Option<T>),
}

/// A converted field, borrowed for one access.
pub struct Converted<'a, T: 'static> {
    slot: Slot<'a, T>,
    conversions: &'static [Conversion<T>],
    default: bool,
}

impl<'a, T: ModelType + Default + 'static> Converted<'a, T> {
    #[inline]
    pub fn new(value: &'a T, conversions: &'static [Conversion<T>], default: bool) -> Self {
        Self {
            slot: Slot::Ref(value),
            conversions,
            default,
        }
    }

    #[inline]
    pub fn new_mut(value: &'a mut T, conversions: &'static [Conversion<T>], default: bool) -> Self {
        Self {
            slot: Slot::Mut(value),
            conversions,
            default,
        }
    }

    #[inline]
    pub fn optional(value: &'a Option<T>, conversions: &'static [Conversion<T>], default: bool) -> Self {
        Self {
            slot: Slot::OptRef(value),
            conversions,
            default,
        }
    }

    #[inline]
    pub fn optional_mut(
        value: &'a mut Option<T>,
        conversions: &'static [Conversion<T>],
        default: bool,
    ) -> Self {
        Self {
            slot: Slot::OptMut(value),
            conversions,
            default,
        }
    }

    fn current(&self) -> Option<&T> {
        match &self.slot {
            Slot::Ref(value) => Some(*value),
            Slot::Mut(value) => Some(&**value),
            Slot::OptRef(value) => value.as_ref(),
            Slot::OptMut(value) => value.as_ref(),
        }
    }

    fn assign(&mut self, value: T) -> Result<()> {
        match &mut self.slot {
            Slot::Mut(slot) => **slot = value,
            Slot::OptMut(slot) => **slot = Some(value),
            Slot::Ref(_) | Slot::OptRef(_) => {
                return Err(unsupported(T::NAME, "write through a read-only field"));
            }
        }
        Ok(())
    }
}

impl<T: ModelType + Default + 'static> Model for Converted<'_, T> {
    #[inline]
    fn part_type(&self) -> ModelPartType {
        ModelPartType::Simple
    }

    #[inline]
    fn model_name(&self) -> &'static str {
        T::NAME
    }

    fn has_value(&self) -> bool {
        self.current().is_some()
    }

    fn value_kind(&self) -> Option<PrimitiveKind> {
        if self.default && T::VALUE_KIND.is_some() {
            return T::VALUE_KIND;
        }
        self.conversions.first().map(|conversion| conversion.exchange)
    }

    fn get_value(&self, accepts: PrimitiveKinds) -> Result<Option<Primitive>> {
        let Some(value) = self.current() else {
            return Ok(None);
        };
        if let Some(conversion) = self
            .conversions
            .iter()
            .find(|conversion| accepts.accepts(conversion.exchange))
        {
            return (conversion.store)(value).map(Some);
        }
        if self.default {
            return value.get_value(accepts);
        }
        Err(no_conversion(T::NAME, format!("{accepts:?}")))
    }

    fn set_value(&mut self, value: Primitive) -> Result<()> {
        if matches!(self.slot, Slot::Ref(_) | Slot::OptRef(_)) {
            return Err(unsupported(T::NAME, "write through a read-only field"));
        }
        let kind = value.kind();
        if let Some(conversion) = self.conversions.iter().find(|c| c.exchange == kind) {
            let loaded = (conversion.load)(value)?;
            return self.assign(loaded);
        }
        if !self.default {
            return Err(no_conversion(kind.name(), T::NAME));
        }
        match &mut self.slot {
            Slot::Mut(slot) => slot.set_value(value),
            Slot::OptMut(slot) => Model::set_value(&mut **slot, value),
            Slot::Ref(_) | Slot::OptRef(_) => Err(unsupported(T::NAME, "write through a read-only field")),
        }
    }

    fn set_null(&mut self) -> Result<()> {
        match &mut self.slot {
            Slot::OptMut(slot) => {
                **slot = None;
                Ok(())
            }
            Slot::Mut(_) => Err(no_conversion("null", T::NAME)),
            Slot::Ref(_) | Slot::OptRef(_) => Err(unsupported(T::NAME, "write through a read-only field")),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::Error;

    fn load_hex(value: Primitive) -> Result<u32> {
        let text = value.as_str().unwrap_or_default();
        u32::from_str_radix(text.trim_start_matches("0x"), 16)
            .map_err(|_| Error::malformed("not a hex number"))
    }

    fn store_hex(value: &u32) -> Result<Primitive> {
        Ok(Primitive::String(format!("0x{value:x}")))
    }

    fn load_flag(value: Primitive) -> Result<u32> {
        match value {
            Primitive::Bool(flag) => Ok(u32::from(flag)),
            _ => Err(Error::malformed("not a flag")),
        }
    }

    fn store_flag(value: &u32) -> Result<Primitive> {
        Ok(Primitive::Bool(*value != 0))
    }

    static HEX_FIRST: [Conversion<u32>; 2] = [
        Conversion::new("hex", PrimitiveKind::String, load_hex, store_hex),
        Conversion::new("flag", PrimitiveKind::Bool, load_flag, store_flag),
    ];

    #[test]
    fn first_accepted_conversion_wins() {
        let value = 255_u32;
        let node = Converted::new(&value, &HEX_FIRST, true);
        assert_eq!(
            node.get_value(PrimitiveKinds::all()),
            Ok(Some(Primitive::String("0xff".to_string())))
        );
        assert_eq!(
            node.get_value(PrimitiveKinds::BOOL | PrimitiveKinds::U32),
            Ok(Some(Primitive::Bool(true)))
        );
    }

    #[test]
    fn default_conversion_is_the_fallback() {
        let value = 7_u32;
        let node = Converted::new(&value, &HEX_FIRST, true);
        assert_eq!(node.get_value(PrimitiveKinds::U32), Ok(Some(Primitive::U32(7))));

        let node = Converted::new(&value, &HEX_FIRST, false);
        assert!(matches!(
            node.get_value(PrimitiveKinds::U32),
            Err(Error::NoConversion { .. })
        ));
    }

    #[test]
    fn set_matches_offered_kind() {
        let mut value = 0_u32;
        Converted::new_mut(&mut value, &HEX_FIRST, true)
            .set_value(Primitive::from("0x10"))
            .unwrap();
        assert_eq!(value, 16);

        Converted::new_mut(&mut value, &HEX_FIRST, true)
            .set_value(Primitive::Bool(false))
            .unwrap();
        assert_eq!(value, 0);

        Converted::new_mut(&mut value, &HEX_FIRST, true)
            .set_value(Primitive::I64(42))
            .unwrap();
        assert_eq!(value, 42);

        let err = Converted::new_mut(&mut value, &HEX_FIRST, false)
            .set_value(Primitive::I64(1))
            .unwrap_err();
        assert_eq!(
            err,
            Error::NoConversion {
                from: "i64".into(),
                to: "u32".into()
            }
        );
    }

    #[test]
    fn narrowing_is_range_checked() {
        let mut value = 0_u32;
        let err = Converted::new_mut(&mut value, &HEX_FIRST, true)
            .set_value(Primitive::I64(-1))
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
        assert_eq!(value, 0);
    }

    #[test]
    fn optional_slot() {
        let mut value: Option<u32> = None;
        assert_eq!(
            Converted::optional(&value, &HEX_FIRST, true).get_value(PrimitiveKinds::all()),
            Ok(None)
        );
        Converted::optional_mut(&mut value, &HEX_FIRST, true)
            .set_value(Primitive::from("0xa"))
            .unwrap();
        assert_eq!(value, Some(10));
        Converted::optional_mut(&mut value, &HEX_FIRST, true)
            .set_null()
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn read_only_slot_rejects_writes() {
        let value = 3_u32;
        let mut node = Converted::new(&value, &HEX_FIRST, true);
        assert!(node.set_value(Primitive::U32(1)).unwrap_err().is_usage());
    }
}
