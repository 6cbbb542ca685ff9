use alloc::string::String;

use hw_model::part::{ChildKey, Model, ModelPartType};
use hw_model::value::{Primitive, PrimitiveKinds};
use serde_core::ser::{Error as _, SerializeMap, SerializeSeq};
use serde_core::{Serialize, Serializer};

use super::{SerdeContext, Segment, TYPE_KEY, interrupted};

#[inline]
fn fail<E: serde_core::ser::Error>(ctx: &SerdeContext, err: hw_model::Error) -> E {
    E::custom(ctx.record(err))
}

/// Kinds written natively; everything else is offered as a string.
fn accepted(human_readable: bool) -> PrimitiveKinds {
    let kinds = PrimitiveKinds::all().difference(PrimitiveKinds::TEMPORAL);
    if human_readable {
        kinds.difference(PrimitiveKinds::BYTES)
    } else {
        kinds
    }
}

/// Calls `f` for each child of `node`, keeping `serde` errors apart from
/// model errors.
fn visit_children<E: serde_core::ser::Error>(
    node: &dyn Model,
    ctx: &SerdeContext,
    mut f: impl FnMut(ChildKey<'_>, &dyn Model) -> Result<(), E>,
) -> Result<(), E> {
    let mut pending: Option<E> = None;
    let outcome = node.for_each_child(&mut |key, child| {
        f(key, child).map_err(|err| {
            pending = Some(err);
            interrupted()
        })
    });
    match (outcome, pending) {
        (_, Some(err)) => Err(err),
        (Err(err), None) => Err(fail(ctx, err)),
        (Ok(()), None) => Ok(()),
    }
}

/// Writes one primitive. Human readable formats get non-finite floats as
/// `inf`, `-inf` or `NaN` strings, which read back through string coercion.
fn serialize_primitive<S: Serializer>(value: Primitive, serializer: S) -> Result<S::Ok, S::Error> {
    let human_readable = serializer.is_human_readable();
    match value {
        Primitive::F32(v) if human_readable && !v.is_finite() => serializer.collect_str(&v),
        Primitive::F64(v) if human_readable && !v.is_finite() => serializer.collect_str(&v),
        Primitive::Bool(v) => serializer.serialize_bool(v),
        Primitive::I8(v) => serializer.serialize_i8(v),
        Primitive::I16(v) => serializer.serialize_i16(v),
        Primitive::I32(v) => serializer.serialize_i32(v),
        Primitive::I64(v) => serializer.serialize_i64(v),
        Primitive::U8(v) => serializer.serialize_u8(v),
        Primitive::U16(v) => serializer.serialize_u16(v),
        Primitive::U32(v) => serializer.serialize_u32(v),
        Primitive::U64(v) => serializer.serialize_u64(v),
        Primitive::F32(v) => serializer.serialize_f32(v),
        Primitive::F64(v) => serializer.serialize_f64(v),
        Primitive::String(v) => serializer.serialize_str(&v),
        Primitive::Bytes(v) => serializer.serialize_bytes(&v),
        other @ (Primitive::Date(_) | Primitive::Time(_) | Primitive::DateTime(_)) => {
            serializer.collect_str(&other)
        }
    }
}

// -----------------------------------------------------------------------------
// ModelSerialize

/// A `serde::Serialize` view of a model node.
///
/// ## Example
///
/// ```
/// use hw_model::Model;
/// use hw_format::serde::{ModelSerialize, SerdeContext};
///
/// #[derive(Model, Default)]
/// struct Point { x: i32, y: Option<i32> }
///
/// let ctx = SerdeContext::new();
/// let point = Point { x: 1, y: None };
/// let json = serde_json::to_string(&ModelSerialize::new(&point, &ctx)).unwrap();
/// assert_eq!(json, r#"{"x":1,"y":null}"#);
/// ```
pub struct ModelSerialize<'a> {
    node: &'a dyn Model,
    ctx: &'a SerdeContext,
}

impl<'a> ModelSerialize<'a> {
    #[inline]
    pub fn new(node: &'a dyn Model, ctx: &'a SerdeContext) -> Self {
        Self { node, ctx }
    }
}

impl Serialize for ModelSerialize<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.node;
        if !node.has_value() {
            return serializer.serialize_none();
        }
        match node.part_type() {
            ModelPartType::Null => serializer.serialize_unit(),
            ModelPartType::Simple => {
                let accepts = accepted(serializer.is_human_readable());
                match node.get_value(accepts).map_err(|err| fail::<S::Error>(self.ctx, err))? {
                    Some(value) => serialize_primitive(value, serializer),
                    None => serializer.serialize_none(),
                }
            }
            ModelPartType::Complex => self.serialize_complex(serializer),
            ModelPartType::Sequence => self.serialize_sequence(serializer),
            ModelPartType::Dictionary => self.serialize_dictionary(serializer),
        }
    }
}

impl ModelSerialize<'_> {
    fn serialize_complex<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.node;
        let ctx = self.ctx;
        let type_name = node.type_id_name();
        let len = node.child_count() + usize::from(type_name.is_some());

        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(name) = &type_name {
            map.serialize_entry(TYPE_KEY, &**name)?;
        }
        visit_children(node, ctx, |key, child| {
            let name = key.name().unwrap_or_default();
            ctx.scoped(
                || Segment::Member(String::from(name)),
                || map.serialize_entry(name, &ModelSerialize::new(child, ctx)),
            )
        })?;
        map.end()
    }

    fn serialize_sequence<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ctx = self.ctx;
        let mut seq = serializer.serialize_seq(Some(self.node.child_count()))?;
        let mut index = 0;
        visit_children(self.node, ctx, |_, element| {
            let result = ctx.scoped(
                || Segment::Index(index),
                || seq.serialize_element(&ModelSerialize::new(element, ctx)),
            );
            index += 1;
            result
        })?;
        seq.end()
    }

    fn serialize_dictionary<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ctx = self.ctx;
        let mut map = serializer.serialize_map(Some(self.node.child_count()))?;
        let mut index = 0;
        visit_children(self.node, ctx, |_, pair| {
            let result = ctx.scoped(
                || Segment::Index(index),
                || {
                    let mut pending = None;
                    let mut outcome = pair.child_at(0, &mut |key| {
                        map.serialize_key(&MapKey(ModelSerialize::new(key, ctx)))
                            .map_err(|err| {
                                pending = Some(err);
                                interrupted()
                            })
                    });
                    if outcome.is_ok() {
                        outcome = pair.child_at(1, &mut |value| {
                            map.serialize_value(&ModelSerialize::new(value, ctx))
                                .map_err(|err| {
                                    pending = Some(err);
                                    interrupted()
                                })
                        });
                    }
                    match (outcome, pending) {
                        (_, Some(err)) => Err(err),
                        (Err(err), None) => Err(S::Error::custom(ctx.record(err))),
                        (Ok(()), None) => Ok(()),
                    }
                },
            );
            index += 1;
            result
        })?;
        map.end()
    }
}

/// A dictionary key. Human readable formats get every simple key as a
/// string.
struct MapKey<'a>(ModelSerialize<'a>);

impl Serialize for MapKey<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.0.node;
        if !serializer.is_human_readable() || node.part_type() != ModelPartType::Simple {
            return self.0.serialize(serializer);
        }
        match node.get_value(PrimitiveKinds::STRING) {
            Ok(Some(value)) => serialize_primitive(value, serializer),
            Ok(None) => serializer.serialize_none(),
            Err(err) => Err(fail(self.0.ctx, err)),
        }
    }
}
