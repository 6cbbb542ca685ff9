use alloc::vec::Vec;

use hw_model::format::Serializer;
use hw_model::part::{Model, ModelPartType, RootRef};
use hw_model::value::Primitive;
use hw_model::{Error, Result};

use super::{ACCEPTS, tag};

/// Encodes a model into the tagged binary format.
#[derive(Debug, Default)]
pub struct BinarySerializer {
    out: Vec<u8>,
}

impl BinarySerializer {
    #[inline]
    pub const fn new() -> Self {
        Self { out: Vec::new() }
    }

    /// Appends to `out` instead of a new buffer.
    #[inline]
    pub fn with_buffer(out: Vec<u8>) -> Self {
        Self { out }
    }

    fn put_varint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.out.push(byte);
                return;
            }
            self.out.push(byte | 0x80);
        }
    }

    fn put_len(&mut self, len: usize) {
        self.put_varint(len as u64);
    }

    fn put_str(&mut self, value: &str) {
        self.put_len(value.len());
        self.out.extend_from_slice(value.as_bytes());
    }

    fn primitive(&mut self, value: Primitive) -> Result<()> {
        match value {
            Primitive::Bool(false) => self.out.push(tag::FALSE),
            Primitive::Bool(true) => self.out.push(tag::TRUE),
            Primitive::U64(v) => {
                self.out.push(tag::UINT);
                self.put_varint(v);
            }
            Primitive::I64(v) => {
                self.out.push(tag::SINT);
                self.put_varint(((v << 1) ^ (v >> 63)) as u64);
            }
            Primitive::F32(v) => {
                self.out.push(tag::F32);
                self.out.extend_from_slice(&v.to_le_bytes());
            }
            Primitive::F64(v) => {
                self.out.push(tag::F64);
                self.out.extend_from_slice(&v.to_le_bytes());
            }
            Primitive::String(v) => {
                self.out.push(tag::STRING);
                self.put_str(&v);
            }
            Primitive::Bytes(v) => {
                self.out.push(tag::BYTES);
                self.put_len(v.len());
                self.out.extend_from_slice(&v);
            }
            other => {
                return Err(Error::NoConversion {
                    from: other.kind().name().into(),
                    to: "binary".into(),
                });
            }
        }
        Ok(())
    }

    fn node(&mut self, node: &dyn Model) -> Result<()> {
        if !node.has_value() {
            self.out.push(tag::NONE);
            return Ok(());
        }
        match node.part_type() {
            ModelPartType::Null => self.out.push(tag::NONE),
            ModelPartType::Simple => match node.get_value(ACCEPTS)? {
                Some(value) => self.primitive(value)?,
                None => self.out.push(tag::NONE),
            },
            ModelPartType::Complex => {
                match node.type_id_name() {
                    Some(name) => {
                        self.out.push(tag::TYPED_COMPLEX);
                        self.put_str(&name);
                    }
                    None => self.out.push(tag::COMPLEX),
                }
                self.put_len(node.child_count());
                node.for_each_child(&mut |key, child| {
                    self.put_str(key.name().unwrap_or_default());
                    self.node(child)
                })?;
            }
            ModelPartType::Sequence => {
                self.out.push(tag::SEQUENCE);
                self.put_len(node.child_count());
                node.for_each_child(&mut |_, element| self.node(element))?;
            }
            ModelPartType::Dictionary => {
                self.out.push(tag::DICTIONARY);
                self.put_len(node.child_count());
                node.for_each_child(&mut |_, pair| {
                    pair.child_at(0, &mut |key| self.node(key))?;
                    pair.child_at(1, &mut |value| self.node(value))
                })?;
            }
        }
        Ok(())
    }
}

impl Serializer for BinarySerializer {
    type Output = Vec<u8>;
    const NAME: &'static str = "binary";

    fn serialize(mut self, root: RootRef<'_>) -> Result<Vec<u8>> {
        self.node(root.node())?;
        Ok(self.out)
    }
}
