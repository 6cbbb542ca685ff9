use alloc::vec::Vec;

use super::{ChildFn, ChildKey, ChildMutFn, Model, ModelPartType, ModelType, PartFn, PartMutFn};
use crate::{Error, Result};

#[cold]
fn out_of_bounds() -> Error {
    Error::invalid_operation("Vec", "element index out of bounds")
}

impl<T: ModelType + Default> Model for Vec<T> {
    fn part_type(&self) -> ModelPartType {
        ModelPartType::Sequence
    }

    fn model_name(&self) -> &'static str {
        "Vec"
    }

    fn child_count(&self) -> usize {
        self.len()
    }

    fn for_each_child(&self, f: &mut ChildFn<'_>) -> Result<()> {
        self.iter()
            .enumerate()
            .try_for_each(|(index, element)| f(ChildKey::Index(index), element))
    }

    fn for_each_child_mut(&mut self, f: &mut ChildMutFn<'_>) -> Result<()> {
        self.iter_mut()
            .enumerate()
            .try_for_each(|(index, element)| f(ChildKey::Index(index), element))
    }

    fn child_at(&self, index: usize, f: &mut PartFn<'_>) -> Result<()> {
        f(self.get(index).ok_or_else(out_of_bounds)?)
    }

    fn child_at_mut(&mut self, index: usize, f: &mut PartMutFn<'_>) -> Result<()> {
        f(self.get_mut(index).ok_or_else(out_of_bounds)?)
    }

    fn create_element(&mut self, f: &mut PartMutFn<'_>) -> Result<()> {
        let mut element = T::default();
        f(&mut element)?;
        element.complete()?;
        self.push(element);
        Ok(())
    }
}

impl<T: ModelType + Default> ModelType for Vec<T> {
    const PART_TYPE: ModelPartType = ModelPartType::Sequence;
    const NAME: &'static str = "Vec";
}

// -----------------------------------------------------------------------------
// Tests
