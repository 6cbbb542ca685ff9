use alloc::format;

use hw_model::format::{self, Deserializer};
use hw_model::hook::NameMatch;
use hw_model::part::{Model, ModelPartType, ModelType, RootMut};
use hw_model::value::Primitive;
use hw_model::{Error, Result};

use super::{MAX_DEPTH, tag};

#[cold]
fn eof() -> Error {
    Error::malformed("unexpected end of binary input")
}

#[cold]
fn mismatch(node: &dyn Model, found: u8) -> Error {
    Error::malformed(format!(
        "tag {found} cannot populate {} node `{}`",
        node.part_type(),
        node.model_name()
    ))
}

/// Decodes the tagged binary format into a model.
#[derive(Debug, Clone, Copy)]
pub struct BinaryDeserializer<'i> {
    input: &'i [u8],
    ignore_unknown: bool,
}

impl<'i> BinaryDeserializer<'i> {
    #[inline]
    pub const fn new(input: &'i [u8]) -> Self {
        Self {
            input,
            ignore_unknown: false,
        }
    }

    /// Skips members the target does not have instead of failing with
    /// [`Error::IncorrectElementName`].
    #[inline]
    pub const fn ignore_unknown(mut self, ignore: bool) -> Self {
        self.ignore_unknown = ignore;
        self
    }

    /// Builds a default `T` and decodes into it.
    #[inline]
    pub fn decode<T: ModelType + Default>(self) -> Result<T> {
        format::deserialize_any::<T, _>(self)
    }
}

impl Deserializer for BinaryDeserializer<'_> {
    const NAME: &'static str = "binary";

    fn deserialize(self, root: RootMut<'_>) -> Result<()> {
        let mut reader = Reader {
            input: self.input,
            pos: 0,
            depth: 0,
            ignore_unknown: self.ignore_unknown,
        };
        reader.node(root.into_node())?;
        if reader.pos != reader.input.len() {
            return Err(Error::malformed(format!(
                "{} trailing bytes after the root value",
                reader.input.len() - reader.pos
            )));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Reader

struct Reader<'i> {
    input: &'i [u8],
    pos: usize,
    depth: usize,
    ignore_unknown: bool,
}

impl<'i> Reader<'i> {
    fn byte(&mut self) -> Result<u8> {
        let byte = *self.input.get(self.pos).ok_or_else(eof)?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> Result<&'i [u8]> {
        let end = self.pos.checked_add(len).ok_or_else(eof)?;
        let bytes = self.input.get(self.pos..end).ok_or_else(eof)?;
        self.pos = end;
        Ok(bytes)
    }

    fn varint(&mut self) -> Result<u64> {
        let mut value = 0_u64;
        for shift in (0..64).step_by(7) {
            let byte = self.byte()?;
            let bits = u64::from(byte & 0x7f);
            if shift == 63 && bits > 1 {
                return Err(Error::malformed("varint overflows 64 bits"));
            }
            value |= bits << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::malformed("varint longer than 10 bytes"))
    }

    fn len(&mut self) -> Result<usize> {
        let len = self.varint()?;
        usize::try_from(len).map_err(|_| Error::malformed("length does not fit in memory"))
    }

    fn str(&mut self) -> Result<&'i str> {
        let len = self.len()?;
        let bytes = self.take(len)?;
        core::str::from_utf8(bytes).map_err(|_| Error::malformed("string is not UTF-8"))
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.take(N)?;
        let mut array = [0; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    /// Reads the payload of a scalar tag.
    fn scalar(&mut self, tag: u8) -> Result<Option<Primitive>> {
        Ok(Some(match tag {
            tag::FALSE => Primitive::Bool(false),
            tag::TRUE => Primitive::Bool(true),
            tag::UINT => Primitive::U64(self.varint()?),
            tag::SINT => {
                let raw = self.varint()?;
                Primitive::I64(((raw >> 1) as i64) ^ -((raw & 1) as i64))
            }
            tag::F32 => Primitive::F32(f32::from_le_bytes(self.array()?)),
            tag::F64 => Primitive::F64(f64::from_le_bytes(self.array()?)),
            tag::STRING => Primitive::String(self.str()?.into()),
            tag::BYTES => {
                let len = self.len()?;
                Primitive::Bytes(self.take(len)?.into())
            }
            _ => return Ok(None),
        }))
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::malformed("binary input nested too deeply"));
        }
        Ok(())
    }

    fn node(&mut self, node: &mut dyn Model) -> Result<()> {
        self.enter()?;
        let tag = self.byte()?;
        match tag {
            tag::NONE => node.set_null()?,
            tag::COMPLEX | tag::TYPED_COMPLEX => {
                if node.part_type() != ModelPartType::Complex {
                    return Err(mismatch(node, tag));
                }
                if tag == tag::TYPED_COMPLEX {
                    let name = self.str()?;
                    if node.is_polymorphic() {
                        node.subclass_part(name, &mut |inner| self.members(inner))?;
                    } else {
                        log::warn!("ignoring discriminator `{name}` of non-polymorphic `{}`", node.model_name());
                        node.create()?;
                        self.members(node)?;
                    }
                } else {
                    node.create()?;
                    self.members(node)?;
                }
            }
            tag::SEQUENCE => {
                if node.part_type() != ModelPartType::Sequence {
                    return Err(mismatch(node, tag));
                }
                node.create()?;
                for _ in 0..self.len()? {
                    node.create_element(&mut |element| self.node(element))?;
                }
                node.complete()?;
            }
            tag::DICTIONARY => {
                if node.part_type() != ModelPartType::Dictionary {
                    return Err(mismatch(node, tag));
                }
                node.create()?;
                for _ in 0..self.len()? {
                    node.create_element(&mut |entry| {
                        entry.child_at_mut(0, &mut |key| self.node(key))?;
                        entry.child_at_mut(1, &mut |value| self.node(value))
                    })?;
                }
                node.complete()?;
            }
            _ => {
                let Some(value) = self.scalar(tag)? else {
                    return Err(Error::malformed(format!("unknown tag {tag}")));
                };
                if !matches!(node.part_type(), ModelPartType::Simple | ModelPartType::Null) {
                    return Err(mismatch(node, tag));
                }
                node.set_value(value)?;
            }
        }
        self.depth -= 1;
        Ok(())
    }

    fn members(&mut self, node: &mut dyn Model) -> Result<()> {
        for _ in 0..self.len()? {
            let name = self.str()?;
            if !node.child_mut(name, NameMatch::Exact, &mut |child| self.node(child))? {
                if !self.ignore_unknown {
                    return Err(Error::IncorrectElementName {
                        owner: node.model_name(),
                        name: name.into(),
                    });
                }
                log::warn!("ignoring unknown member `{name}` of `{}`", node.model_name());
                self.skip()?;
            }
        }
        node.complete()
    }

    fn skip(&mut self) -> Result<()> {
        self.enter()?;
        let tag = self.byte()?;
        match tag {
            tag::NONE => {}
            tag::COMPLEX | tag::TYPED_COMPLEX => {
                if tag == tag::TYPED_COMPLEX {
                    self.str()?;
                }
                for _ in 0..self.len()? {
                    self.str()?;
                    self.skip()?;
                }
            }
            tag::SEQUENCE => {
                for _ in 0..self.len()? {
                    self.skip()?;
                }
            }
            tag::DICTIONARY => {
                for _ in 0..self.len()? {
                    self.skip()?;
                    self.skip()?;
                }
            }
            _ => {
                if self.scalar(tag)?.is_none() {
                    return Err(Error::malformed(format!("unknown tag {tag}")));
                }
            }
        }
        self.depth -= 1;
        Ok(())
    }
}
