use alloc::vec::Vec;
use core::fmt;

use super::Segment;

/// The members and indices leading from the root to the current node.
#[derive(Default, Clone)]
pub(super) struct NodePath {
    stack: Vec<Segment>,
}

impl NodePath {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, segment: Segment) {
        self.stack.push(segment);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.stack {
            match segment {
                Segment::Member(name) if first => f.write_str(name)?,
                Segment::Member(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
            first = false;
        }
        Ok(())
    }
}
