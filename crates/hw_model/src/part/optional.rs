use alloc::borrow::Cow;

use super::{ChildFn, ChildMutFn, Model, ModelPartType, ModelType, PartFn, PartMutFn, unsupported};
use crate::Result;
use crate::hook::HookIndex;
use crate::metadata::Metadata;
use crate::value::{Primitive, PrimitiveKind, PrimitiveKinds};

/// `None` is an absent node: it reports `has_value() == false` and answers
/// every type query from `T`'s [`ModelType`] facts. Writes materialize
/// `Some(T::default())` first.
impl<T: ModelType + Default> Model for Option<T> {
    #[inline]
    fn part_type(&self) -> ModelPartType {
        T::PART_TYPE
    }

    fn model_name(&self) -> &'static str {
        match self {
            Some(inner) => inner.model_name(),
            None => T::NAME,
        }
    }

    fn has_value(&self) -> bool {
        self.as_ref().is_some_and(Model::has_value)
    }

    fn metadata(&self) -> Metadata {
        match self {
            Some(inner) => inner.metadata(),
            None => T::static_metadata(),
        }
    }

    fn value_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Some(inner) => inner.value_kind(),
            None => T::VALUE_KIND,
        }
    }

    fn create(&mut self) -> Result<()> {
        self.get_or_insert_with(T::default).create()
    }

    fn complete(&mut self) -> Result<()> {
        match self {
            Some(inner) => inner.complete(),
            None => Ok(()),
        }
    }

    fn hook_index(&self) -> Option<&'static HookIndex> {
        match self {
            Some(inner) => inner.hook_index(),
            None => T::static_hook_index(),
        }
    }

    fn child_count(&self) -> usize {
        self.as_ref().map_or(0, Model::child_count)
    }

    fn for_each_child(&self, f: &mut ChildFn<'_>) -> Result<()> {
        match self {
            Some(inner) => inner.for_each_child(f),
            None => Ok(()),
        }
    }

    fn for_each_child_mut(&mut self, f: &mut ChildMutFn<'_>) -> Result<()> {
        self.create()?;
        match self {
            Some(inner) => inner.for_each_child_mut(f),
            None => Ok(()),
        }
    }

    fn child_at(&self, index: usize, f: &mut PartFn<'_>) -> Result<()> {
        match self {
            Some(inner) => inner.child_at(index, f),
            None => Err(unsupported(T::NAME, "absent optional has no children")),
        }
    }

    fn child_at_mut(&mut self, index: usize, f: &mut PartMutFn<'_>) -> Result<()> {
        self.get_or_insert_with(T::default).child_at_mut(index, f)
    }

    fn create_element(&mut self, f: &mut PartMutFn<'_>) -> Result<()> {
        self.get_or_insert_with(T::default).create_element(f)
    }

    fn get_value(&self, accepts: PrimitiveKinds) -> Result<Option<Primitive>> {
        match self {
            Some(inner) => inner.get_value(accepts),
            None => Ok(None),
        }
    }

    fn set_value(&mut self, value: Primitive) -> Result<()> {
        match self {
            Some(inner) => inner.set_value(value),
            None => {
                let mut inner = T::default();
                inner.set_value(value)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }

    fn set_null(&mut self) -> Result<()> {
        *self = None;
        Ok(())
    }

    fn is_polymorphic(&self) -> bool {
        T::POLYMORPHIC
    }

    fn type_id_name(&self) -> Option<Cow<'static, str>> {
        self.as_ref().and_then(Model::type_id_name)
    }

    fn subclass_part(&mut self, name: &str, f: &mut PartMutFn<'_>) -> Result<()> {
        self.get_or_insert_with(T::default).subclass_part(name, f)
    }
}

impl<T: ModelType + Default> ModelType for Option<T> {
    const PART_TYPE: ModelPartType = T::PART_TYPE;
    const NAME: &'static str = T::NAME;
    const VALUE_KIND: Option<PrimitiveKind> = T::VALUE_KIND;
    const POLYMORPHIC: bool = T::POLYMORPHIC;

    fn static_hook_index() -> Option<&'static HookIndex> {
        T::static_hook_index()
    }

    fn static_metadata() -> Metadata {
        T::static_metadata()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_answers_type_queries() {
        let value: Option<i16> = None;
        let node: &dyn Model = &value;
        assert!(!node.has_value());
        assert_eq!(node.part_type(), ModelPartType::Simple);
        assert_eq!(node.model_name(), "i16");
        assert_eq!(node.value_kind(), Some(PrimitiveKind::I16));
        assert_eq!(node.value(), Ok(None));
    }

    #[test]
    fn set_and_clear() {
        let mut value: Option<i16> = None;
        value.set_value(Primitive::I64(-3)).unwrap();
        assert_eq!(value, Some(-3));
        value.set_null().unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn failed_write_keeps_absent() {
        let mut value: Option<u8> = None;
        assert!(value.set_value(Primitive::I64(-1)).is_err());
        assert_eq!(value, None);
    }

    #[test]
    fn zero_is_not_absent() {
        let value = Some(0_u32);
        assert_eq!(value.get_value(PrimitiveKinds::all()), Ok(Some(Primitive::U32(0))));
        assert!(Model::has_value(&value));
    }

    #[test]
    fn create_materializes_default() {
        let mut value: Option<String> = None;
        value.create().unwrap();
        assert_eq!(value.as_deref(), Some(""));
    }
}
