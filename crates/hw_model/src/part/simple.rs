use alloc::string::String;
use alloc::vec::Vec;
use std::io;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{Model, ModelPartType, ModelType, unsupported};
use crate::Result;
use crate::value::{Primitive, PrimitiveKind, PrimitiveKinds, Scalar};

// -----------------------------------------------------------------------------
// Scalars

macro_rules! impl_scalar_model {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Model for $ty {
                #[inline]
                fn part_type(&self) -> ModelPartType {
                    ModelPartType::Simple
                }

                #[inline]
                fn model_name(&self) -> &'static str {
                    $name
                }

                #[inline]
                fn value_kind(&self) -> Option<PrimitiveKind> {
                    Some(<Self as Scalar>::KIND)
                }

                fn get_value(&self, accepts: PrimitiveKinds) -> Result<Option<Primitive>> {
                    Scalar::to_primitive(self).offer(accepts).map(Some)
                }

                fn set_value(&mut self, value: Primitive) -> Result<()> {
                    *self = <Self as Scalar>::from_primitive(value)?;
                    Ok(())
                }
            }

            impl ModelType for $ty {
                const PART_TYPE: ModelPartType = ModelPartType::Simple;
                const NAME: &'static str = $name;
                const VALUE_KIND: Option<PrimitiveKind> = Some(<Self as Scalar>::KIND);
            }
        )*
    };
}

impl_scalar_model!(
    bool => "bool",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    f32 => "f32",
    f64 => "f64",
    String => "String",
    NaiveDate => "NaiveDate",
    NaiveTime => "NaiveTime",
    NaiveDateTime => "NaiveDateTime",
);

// -----------------------------------------------------------------------------
// Unit

impl Model for () {
    fn part_type(&self) -> ModelPartType {
        ModelPartType::Null
    }

    fn model_name(&self) -> &'static str {
        "()"
    }

    fn has_value(&self) -> bool {
        false
    }

    fn get_value(&self, _accepts: PrimitiveKinds) -> Result<Option<Primitive>> {
        Ok(None)
    }

    fn set_null(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ModelType for () {
    const PART_TYPE: ModelPartType = ModelPartType::Null;
    const NAME: &'static str = "()";
}

// -----------------------------------------------------------------------------
// Blob

/// An owned byte string, exchanged as [`PrimitiveKind::Bytes`].
///
/// `Vec<u8>` is a Sequence of `u8` nodes; wrap it in a `Blob` to exchange it
/// as a single value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(pub Vec<u8>);

impl From<Vec<u8>> for Blob {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Model for Blob {
    fn part_type(&self) -> ModelPartType {
        ModelPartType::Simple
    }

    fn model_name(&self) -> &'static str {
        "Blob"
    }

    fn value_kind(&self) -> Option<PrimitiveKind> {
        Some(PrimitiveKind::Bytes)
    }

    fn get_value(&self, accepts: PrimitiveKinds) -> Result<Option<Primitive>> {
        Primitive::Bytes(self.0.clone()).offer(accepts).map(Some)
    }

    fn set_value(&mut self, value: Primitive) -> Result<()> {
        match value.coerce(PrimitiveKind::Bytes)? {
            Primitive::Bytes(bytes) => self.0 = bytes,
            other => return Err(crate::value::no_conversion(other.kind().name(), "Blob")),
        }
        Ok(())
    }
}

impl ModelType for Blob {
    const PART_TYPE: ModelPartType = ModelPartType::Simple;
    const NAME: &'static str = "Blob";
    const VALUE_KIND: Option<PrimitiveKind> = Some(PrimitiveKind::Bytes);
}

// -----------------------------------------------------------------------------
// Stream

/// A read-only byte payload drained from an [`io::Read`] source.
///
/// Streams can be serialized but never written by a deserializer;
/// [`Model::set_value`] on a stream is a usage error.
///
/// # Examples
///
/// ```
/// use hw_model::Model;
/// use hw_model::part::Stream;
/// use hw_model::value::Primitive;
///
/// let mut stream = Stream::from_reader(&b"abc"[..]).unwrap();
/// assert_eq!(stream.bytes(), b"abc");
/// assert!(stream.set_value(Primitive::Bytes(vec![])).unwrap_err().is_usage());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stream {
    data: Vec<u8>,
}

impl Stream {
    /// Reads `reader` to its end.
    pub fn from_reader(mut reader: impl io::Read) -> io::Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self { data })
    }

    #[inline]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// A reader over the payload.
    #[inline]
    pub fn reader(&self) -> impl io::Read + '_ {
        &self.data[..]
    }
}

impl Model for Stream {
    fn part_type(&self) -> ModelPartType {
        ModelPartType::Simple
    }

    fn model_name(&self) -> &'static str {
        "Stream"
    }

    fn value_kind(&self) -> Option<PrimitiveKind> {
        Some(PrimitiveKind::Bytes)
    }

    fn get_value(&self, accepts: PrimitiveKinds) -> Result<Option<Primitive>> {
        Primitive::Bytes(self.data.clone()).offer(accepts).map(Some)
    }

    fn set_value(&mut self, _value: Primitive) -> Result<()> {
        Err(unsupported("Stream", "stream nodes are read-only"))
    }

    fn set_null(&mut self) -> Result<()> {
        Err(unsupported("Stream", "stream nodes are read-only"))
    }
}

impl ModelType for Stream {
    const PART_TYPE: ModelPartType = ModelPartType::Simple;
    const NAME: &'static str = "Stream";
    const VALUE_KIND: Option<PrimitiveKind> = Some(PrimitiveKind::Bytes);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn scalar_nodes() {
        let mut value = 0_u8;
        let node: &mut dyn Model = &mut value;
        assert_eq!(node.part_type(), ModelPartType::Simple);
        assert_eq!(node.value_kind(), Some(PrimitiveKind::U8));

        node.set_value(Primitive::I64(200)).unwrap();
        assert!(matches!(
            node.set_value(Primitive::I64(256)),
            Err(Error::OutOfRange { .. })
        ));
        assert_eq!(node.value(), Ok(Some(Primitive::U8(200))));
        assert_eq!(value, 200);
    }

    #[test]
    fn scalar_rejects_children() {
        let value = 1.5_f64;
        let node: &dyn Model = &value;
        assert!(node.child_at(0, &mut |_| Ok(())).unwrap_err().is_usage());
        assert!(
            node.child("x", crate::hook::NameMatch::Exact, &mut |_| Ok(()))
                .unwrap_err()
                .is_usage()
        );
        assert!(!node.is_polymorphic());
    }

    #[test]
    fn null_node() {
        let node: &mut dyn Model = &mut ();
        assert_eq!(node.part_type(), ModelPartType::Null);
        assert!(!node.has_value());
        assert_eq!(node.value(), Ok(None));
        assert!(node.set_null().is_ok());
    }

    #[test]
    fn blob_accepts_hex_text() {
        let mut blob = Blob::default();
        blob.set_value(Primitive::from("cafe")).unwrap();
        assert_eq!(blob.0, [0xCA, 0xFE]);
        assert_eq!(
            blob.get_value(PrimitiveKinds::STRING),
            Ok(Some(Primitive::String("cafe".into())))
        );
    }

    #[test]
    fn stream_is_read_only() {
        let mut stream = Stream::from_bytes(vec![1, 2]);
        assert_eq!(
            stream.get_value(PrimitiveKinds::BYTES),
            Ok(Some(Primitive::Bytes(vec![1, 2])))
        );
        assert!(stream.set_value(Primitive::Bytes(vec![])).unwrap_err().is_usage());
        let mut subclass = 0_i32;
        assert!(
            Model::subclass_part(&mut subclass, "x", &mut |_| Ok(()))
                .unwrap_err()
                .is_usage()
        );
    }
}
