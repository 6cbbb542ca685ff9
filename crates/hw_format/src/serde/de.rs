use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hw_model::Error;
use hw_model::part::{Model, ModelPartType};
use hw_model::value::Primitive;
use serde_core::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Unexpected, Visitor};
use serde_core::Deserializer;

use super::{SerdeContext, Segment, TYPE_KEY, interrupted};
use crate::UnknownFields;

#[inline]
fn fail<E: de::Error>(ctx: &SerdeContext, err: Error) -> E {
    E::custom(ctx.record(err))
}

/// Picks the error to return once a model callback has finished: the
/// `serde` error parked in `pending`, or the model error itself.
fn settle<E: de::Error>(ctx: &SerdeContext, outcome: hw_model::Result<()>, pending: Option<E>) -> Result<(), E> {
    match (outcome, pending) {
        (_, Some(err)) => Err(err),
        (Err(err), None) => Err(fail(ctx, err)),
        (Ok(()), None) => Ok(()),
    }
}

// -----------------------------------------------------------------------------
// ModelSeed

/// A `serde::de::DeserializeSeed` populating a model node in place.
///
/// ## Example
///
/// ```
/// use hw_model::Model;
/// use hw_format::serde::{ModelSeed, SerdeContext};
/// use serde_core::de::DeserializeSeed;
///
/// #[derive(Model, Default)]
/// struct Point { x: i32, y: Option<i32> }
///
/// let ctx = SerdeContext::new();
/// let mut point = Point::default();
/// let mut de = serde_json::Deserializer::from_str(r#"{"x": 3, "y": -4}"#);
/// ModelSeed::new(&mut point, &ctx).deserialize(&mut de).unwrap();
/// assert_eq!((point.x, point.y), (3, Some(-4)));
/// ```
pub struct ModelSeed<'a> {
    node: &'a mut dyn Model,
    ctx: &'a SerdeContext,
}

impl<'a> ModelSeed<'a> {
    #[inline]
    pub fn new(node: &'a mut dyn Model, ctx: &'a SerdeContext) -> Self {
        Self { node, ctx }
    }
}

impl<'de> DeserializeSeed<'de> for ModelSeed<'_> {
    type Value = ();

    #[inline]
    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl ModelSeed<'_> {
    fn set<E: de::Error>(self, value: Primitive, unexpected: Unexpected<'_>) -> Result<(), E> {
        match self.node.part_type() {
            ModelPartType::Simple | ModelPartType::Null => {
                self.node.set_value(value).map_err(|err| fail(self.ctx, err))
            }
            _ => Err(E::invalid_type(unexpected, &self)),
        }
    }

    /// Reads the members of a Complex node, starting with `first` when the
    /// caller already consumed a key.
    fn fill_members<'de, A: MapAccess<'de>>(
        node: &mut dyn Model,
        ctx: &SerdeContext,
        map: &mut A,
        mut first: Option<String>,
    ) -> Result<(), A::Error> {
        loop {
            let name = match first.take() {
                Some(name) => name,
                None => match map.next_key::<String>()? {
                    Some(name) => name,
                    None => break,
                },
            };

            let mut pending = None;
            let found = node.child_mut(&name, ctx.name_match(), &mut |child| {
                ctx.scoped(
                    || Segment::Member(name.clone()),
                    || map.next_value_seed(ModelSeed::new(child, ctx)),
                )
                .map_err(|err| {
                    pending = Some(err);
                    interrupted()
                })
            });
            match found {
                Ok(true) => {}
                Ok(false) if pending.is_none() => match ctx.unknown_fields() {
                    UnknownFields::Ignore => {
                        log::warn!("ignoring unknown member `{name}` of `{}`", node.model_name());
                        map.next_value::<IgnoredAny>()?;
                    }
                    UnknownFields::Error => {
                        return Err(fail(
                            ctx,
                            Error::IncorrectElementName {
                                owner: node.model_name(),
                                name,
                            },
                        ));
                    }
                },
                outcome => settle(ctx, outcome.map(|_| ()), pending)?,
            }
        }
        node.complete().map_err(|err| fail(ctx, err))
    }
}

impl<'de> Visitor<'de> for ModelSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "a {} value for `{}`",
            self.node.part_type(),
            self.node.model_name()
        )
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<(), E> {
        self.set(Primitive::Bool(v), Unexpected::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<(), E> {
        self.set(Primitive::I64(v), Unexpected::Signed(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<(), E> {
        self.set(Primitive::U64(v), Unexpected::Unsigned(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<(), E> {
        self.set(Primitive::F64(v), Unexpected::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<(), E> {
        self.set(Primitive::String(String::from(v)), Unexpected::Str(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<(), E> {
        if matches!(self.node.part_type(), ModelPartType::Simple | ModelPartType::Null) {
            self.node.set_value(Primitive::String(v)).map_err(|err| fail(self.ctx, err))
        } else {
            Err(E::invalid_type(Unexpected::Str(&v), &self))
        }
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<(), E> {
        self.set(Primitive::Bytes(Vec::from(v)), Unexpected::Bytes(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        self.node.set_null().map_err(|err| fail(self.ctx, err))
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        self.visit_none()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        let ModelSeed { node, ctx } = self;
        if node.part_type() != ModelPartType::Sequence {
            return Err(de::Error::invalid_type(Unexpected::Seq, &ModelSeed { node, ctx }));
        }
        node.create().map_err(|err| fail(ctx, err))?;

        let mut index = 0;
        loop {
            let mut pending = None;
            let mut exhausted = false;
            let outcome = node.create_element(&mut |element| {
                let next = ctx.scoped(
                    || Segment::Index(index),
                    || seq.next_element_seed(ModelSeed::new(element, ctx)),
                );
                match next {
                    Ok(Some(())) => Ok(()),
                    Ok(None) => {
                        exhausted = true;
                        Err(interrupted())
                    }
                    Err(err) => {
                        pending = Some(err);
                        Err(interrupted())
                    }
                }
            });
            if exhausted {
                break;
            }
            settle(ctx, outcome, pending)?;
            index += 1;
        }
        node.complete().map_err(|err| fail(ctx, err))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let ModelSeed { node, ctx } = self;
        match node.part_type() {
            ModelPartType::Complex => {}
            ModelPartType::Dictionary => return visit_dictionary(node, ctx, map),
            _ => return Err(de::Error::invalid_type(Unexpected::Map, &ModelSeed { node, ctx })),
        }

        let first = map.next_key::<String>()?;
        if first.as_deref() != Some(TYPE_KEY) {
            node.create().map_err(|err| fail(ctx, err))?;
            return Self::fill_members(node, ctx, &mut map, first);
        }

        let name = map.next_value::<String>()?;
        if !node.is_polymorphic() {
            log::warn!("ignoring discriminator `{name}` of non-polymorphic `{}`", node.model_name());
            node.create().map_err(|err| fail(ctx, err))?;
            return Self::fill_members(node, ctx, &mut map, None);
        }

        let mut pending = None;
        let outcome = node.subclass_part(&name, &mut |inner| {
            Self::fill_members(inner, ctx, &mut map, None).map_err(|err| {
                pending = Some(err);
                interrupted()
            })
        });
        settle(ctx, outcome, pending)
    }
}

fn visit_dictionary<'de, A: MapAccess<'de>>(
    node: &mut dyn Model,
    ctx: &SerdeContext,
    mut map: A,
) -> Result<(), A::Error> {
    node.create().map_err(|err| fail(ctx, err))?;

    let mut index = 0;
    loop {
        let mut pending = None;
        let mut exhausted = false;
        let outcome = node.create_element(&mut |entry| {
            entry.child_at_mut(0, &mut |key| match map.next_key_seed(ModelSeed::new(key, ctx)) {
                Ok(Some(())) => Ok(()),
                Ok(None) => {
                    exhausted = true;
                    Ok(())
                }
                Err(err) => {
                    pending = Some(err);
                    Err(interrupted())
                }
            })?;
            if exhausted {
                return Err(interrupted());
            }
            ctx.scoped(
                || Segment::Index(index),
                || {
                    entry.child_at_mut(1, &mut |value| {
                        map.next_value_seed(ModelSeed::new(value, ctx)).map_err(|err| {
                            pending = Some(err);
                            interrupted()
                        })
                    })
                },
            )
        });
        if exhausted {
            break;
        }
        settle(ctx, outcome, pending)?;
        index += 1;
    }
    node.complete().map_err(|err| fail(ctx, err))
}
