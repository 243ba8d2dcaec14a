//! Identity types for factors.
//!
//! A `FactorId` is the position of a factor in its design's declaration
//! order. Ids are only meaningful within the design that issued them.

use std::fmt;

/// Index of a factor within a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactorId(pub u32);

impl FactorId {
    /// Create a new FactorId from a raw value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Position in the declaration order.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for FactorId {
    fn from(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}
