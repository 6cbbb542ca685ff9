//! A compact, self-describing binary encoding for RPC payloads.
//!
//! Every value starts with a one byte tag. Lengths and integers are LEB128
//! varints, signed integers are zigzag encoded first, floats are little
//! endian.
//!
//! | tag | payload                                                   |
//! |-----|-----------------------------------------------------------|
//! | `0` | none; an absent value                                     |
//! | `1` | `false`                                                   |
//! | `2` | `true`                                                    |
//! | `3` | unsigned varint                                           |
//! | `4` | zigzag varint                                             |
//! | `5` | `f32`                                                     |
//! | `6` | `f64`                                                     |
//! | `7` | string: length, UTF-8 bytes                               |
//! | `8` | bytes: length, bytes                                      |
//! | `9` | complex: member count, then name (as a string) and value per member |
//! | `10`| typed complex: discriminator string, then as `9`          |
//! | `11`| sequence: element count, elements                         |
//! | `12`| dictionary: entry count, key and value per entry          |
//!
//! Members are written by name, so a reader tolerates reordered members.
//! Dates and times travel as ISO 8601 strings.

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::BinaryDeserializer;
pub use writer::BinarySerializer;

use alloc::vec::Vec;

use hw_model::format;
use hw_model::part::{Model, ModelType};
use hw_model::value::PrimitiveKinds;
use hw_model::Result;

// -----------------------------------------------------------------------------
// Tags

mod tag {
    pub const NONE: u8 = 0;
    pub const FALSE: u8 = 1;
    pub const TRUE: u8 = 2;
    pub const UINT: u8 = 3;
    pub const SINT: u8 = 4;
    pub const F32: u8 = 5;
    pub const F64: u8 = 6;
    pub const STRING: u8 = 7;
    pub const BYTES: u8 = 8;
    pub const COMPLEX: u8 = 9;
    pub const TYPED_COMPLEX: u8 = 10;
    pub const SEQUENCE: u8 = 11;
    pub const DICTIONARY: u8 = 12;
}

/// Kinds with a dedicated tag; narrower integers widen to 64 bits.
const ACCEPTS: PrimitiveKinds = PrimitiveKinds::BOOL
    .union(PrimitiveKinds::I64)
    .union(PrimitiveKinds::U64)
    .union(PrimitiveKinds::F32)
    .union(PrimitiveKinds::F64)
    .union(PrimitiveKinds::STRING)
    .union(PrimitiveKinds::BYTES);

/// Nesting deeper than this is rejected as malformed.
const MAX_DEPTH: usize = 128;

// -----------------------------------------------------------------------------
// Shortcuts

/// Encodes `value`.
#[inline]
pub fn to_vec(value: &dyn Model) -> Result<Vec<u8>> {
    format::serialize_any(BinarySerializer::new(), value)
}

/// Decodes a `T`.
#[inline]
pub fn from_slice<T: ModelType + Default>(input: &[u8]) -> Result<T> {
    format::deserialize_any::<T, _>(BinaryDeserializer::new(input))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use hw_model::{Error, Model};
    use hw_model::part::Blob;

    use super::*;

    #[derive(Model, Default, Debug, PartialEq)]
    struct Bounds {
        i8_min: i8,
        i64_min: i64,
        u64_max: u64,
        f32_neg_zero: f32,
        f64_max: f64,
        flag: bool,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Message {
        id: u32,
        subject: Option<String>,
        body: Blob,
        recipients: Vec<String>,
        headers: BTreeMap<String, String>,
        bounds: Bounds,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Reordered {
        subject: Option<String>,
        id: u32,
    }

    fn sample() -> Message {
        Message {
            id: 42,
            subject: Some(String::from("héllo")),
            body: Blob(vec![0, 1, 2, 255]),
            recipients: vec![String::from("a@x"), String::from("b@x")],
            headers: BTreeMap::from([(String::from("k"), String::from("v"))]),
            bounds: Bounds {
                i8_min: i8::MIN,
                i64_min: i64::MIN,
                u64_max: u64::MAX,
                f32_neg_zero: -0.0,
                f64_max: f64::MAX,
                flag: true,
            },
        }
    }

    #[test]
    fn round_trip() {
        let message = sample();
        let bytes = to_vec(&message).unwrap();
        let back: Message = from_slice(&bytes).unwrap();
        assert_eq!(back, message);
        assert!(back.bounds.f32_neg_zero.is_sign_negative());

        let empty = Message::default();
        assert_eq!(from_slice::<Message>(&to_vec(&empty).unwrap()).unwrap(), empty);
    }

    #[test]
    fn scalar_layout() {
        assert_eq!(to_vec(&300_u16).unwrap(), [tag::UINT, 0xac, 0x02]);
        assert_eq!(to_vec(&-1_i32).unwrap(), [tag::SINT, 0x01]);
        assert_eq!(to_vec(&Some(String::from("ab"))).unwrap(), [tag::STRING, 2, b'a', b'b']);
        assert_eq!(to_vec(&None::<String>).unwrap(), [tag::NONE]);
    }

    #[test]
    fn members_are_matched_by_name() {
        let message = sample();
        let back: Reordered = BinaryDeserializer::new(&to_vec(&message).unwrap())
            .ignore_unknown(true)
            .decode()
            .unwrap();
        assert_eq!(back.id, 42);
        assert_eq!(back.subject.as_deref(), Some("héllo"));

        let err = from_slice::<Reordered>(&to_vec(&message).unwrap()).unwrap_err();
        assert!(matches!(err, Error::IncorrectElementName { .. }));
    }

    #[test]
    fn truncated_input_is_malformed() {
        let bytes = to_vec(&sample()).unwrap();
        for len in [0, 1, 5, bytes.len() / 2, bytes.len() - 1] {
            let err = from_slice::<Message>(&bytes[..len]).unwrap_err();
            assert!(matches!(err, Error::Malformed(_)), "{len}: {err:?}");
        }

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(matches!(from_slice::<Message>(&trailing), Err(Error::Malformed(_))));
        assert!(matches!(from_slice::<Message>(&[99]), Err(Error::Malformed(_))));
    }

    #[test]
    fn shape_mismatch_is_malformed() {
        let bytes = to_vec(&vec![1_u8, 2]).unwrap();
        assert!(matches!(from_slice::<Message>(&bytes), Err(Error::Malformed(_))));
        assert!(matches!(from_slice::<u8>(&to_vec(&300_u32).unwrap()), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn nesting_is_bounded() {
        // An unknown member is skipped without a model to stop the descent.
        let mut bytes = vec![tag::COMPLEX, 1, 1, b'x'];
        for _ in 0..=MAX_DEPTH {
            bytes.extend_from_slice(&[tag::SEQUENCE, 1]);
        }
        bytes.push(tag::NONE);
        let err = BinaryDeserializer::new(&bytes)
            .ignore_unknown(true)
            .decode::<Reordered>()
            .unwrap_err();
        assert_eq!(err, Error::malformed("binary input nested too deeply"));

        bytes.truncate(bytes.len() - 1 - 2 * 8);
        bytes.push(tag::NONE);
        let skipped: Reordered = BinaryDeserializer::new(&bytes).ignore_unknown(true).decode().unwrap();
        assert_eq!(skipped, Reordered::default());
    }
}
