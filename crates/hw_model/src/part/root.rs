//! Entry points handed to serializers and deserializers.

use super::{Model, ModelPartType};

/// The root of a graph being written.
#[derive(Clone, Copy)]
pub struct RootRef<'a> {
    node: &'a dyn Model,
}

impl<'a> RootRef<'a> {
    #[inline]
    pub fn new(node: &'a dyn Model) -> Self {
        Self { node }
    }

    #[inline]
    pub fn node(&self) -> &'a dyn Model {
        self.node
    }

    #[inline]
    pub fn part_type(&self) -> ModelPartType {
        self.node.part_type()
    }
}

impl core::fmt::Debug for RootRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("RootRef").field(&self.node).finish()
    }
}

/// The root of a graph being populated.
pub struct RootMut<'a> {
    node: &'a mut dyn Model,
}

impl<'a> RootMut<'a> {
    #[inline]
    pub fn new(node: &'a mut dyn Model) -> Self {
        Self { node }
    }

    #[inline]
    pub fn node(&mut self) -> &mut dyn Model {
        self.node
    }

    #[inline]
    pub fn into_node(self) -> &'a mut dyn Model {
        self.node
    }

    #[inline]
    pub fn part_type(&self) -> ModelPartType {
        self.node.part_type()
    }
}

impl core::fmt::Debug for RootMut<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("RootMut").field(&&*self.node).finish()
    }
}
