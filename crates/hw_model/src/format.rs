//! The contract between a model and a wire format.
//!
//! A serializer walks a [`RootRef`] and produces some output; a
//! deserializer populates a [`RootMut`] from whatever source it owns. Both
//! declare up front which root shapes they handle, so an unsupported root
//! is rejected before anything is read or written.

use crate::part::{Model, ModelPartType, ModelType, RootMut, RootRef};
use crate::{Error, Result};

/// Writes a model graph.
pub trait Serializer {
    type Output;

    /// A short name used in error messages.
    const NAME: &'static str;

    /// Whether roots of `part_type` can be written.
    fn supports(&self, part_type: ModelPartType) -> bool {
        let _ = part_type;
        true
    }

    fn serialize(self, root: RootRef<'_>) -> Result<Self::Output>;
}

/// Populates a model graph.
pub trait Deserializer {
    /// A short name used in error messages.
    const NAME: &'static str;

    /// Whether roots of `part_type` can be populated.
    fn supports(&self, part_type: ModelPartType) -> bool {
        let _ = part_type;
        true
    }

    fn deserialize(self, root: RootMut<'_>) -> Result<()>;
}

/// Serializes any model value, rejecting unsupported roots first.
pub fn serialize_any<S: Serializer>(serializer: S, value: &dyn Model) -> Result<S::Output> {
    let found = value.part_type();
    if !serializer.supports(found) {
        return Err(Error::UnsupportedModelType {
            context: S::NAME,
            found,
        });
    }
    serializer.serialize(RootRef::new(value))
}

/// Populates an existing model value, rejecting unsupported roots first.
pub fn deserialize_into<D: Deserializer>(deserializer: D, value: &mut dyn Model) -> Result<()> {
    let found = value.part_type();
    if !deserializer.supports(found) {
        return Err(Error::UnsupportedModelType {
            context: D::NAME,
            found,
        });
    }
    deserializer.deserialize(RootMut::new(value))
}

/// Builds a default `T` and populates it.
pub fn deserialize_any<T: ModelType + Default, D: Deserializer>(deserializer: D) -> Result<T> {
    let mut value = T::default();
    deserialize_into(deserializer, &mut value)?;
    Ok(value)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::value::{Primitive, PrimitiveKinds};

    struct Scalars;

    impl Serializer for Scalars {
        type Output = Primitive;
        const NAME: &'static str = "scalars";

        fn supports(&self, part_type: ModelPartType) -> bool {
            part_type == ModelPartType::Simple
        }

        fn serialize(self, root: RootRef<'_>) -> Result<Primitive> {
            root.node()
                .get_value(PrimitiveKinds::STRING)?
                .ok_or(Error::malformed("absent root"))
        }
    }

    struct Counting(i64);

    impl Deserializer for Counting {
        const NAME: &'static str = "counting";

        fn supports(&self, part_type: ModelPartType) -> bool {
            part_type == ModelPartType::Sequence
        }

        fn deserialize(self, mut root: RootMut<'_>) -> Result<()> {
            for n in 0..self.0 {
                root.node().create_element(&mut |element| element.set_value(Primitive::I64(n)))?;
            }
            Ok(())
        }
    }

    #[test]
    fn serialize_checks_support_first() {
        assert_eq!(serialize_any(Scalars, &12_u8), Ok(Primitive::from("12")));
        assert_eq!(
            serialize_any(Scalars, &vec![1_u8]),
            Err(Error::UnsupportedModelType {
                context: "scalars",
                found: ModelPartType::Sequence
            })
        );
    }

    #[test]
    fn deserialize_builds_default() {
        let values: Vec<u16> = deserialize_any(Counting(3)).unwrap();
        assert_eq!(values, [0, 1, 2]);

        let mut untouched = 5_u16;
        let err = deserialize_into(Counting(1), &mut untouched).unwrap_err();
        assert!(matches!(err, Error::UnsupportedModelType { .. }));
        assert_eq!(untouched, 5);
    }
}
