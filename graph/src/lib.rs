//! Trial Dependency Graph
//!
//! This crate orders factors so that derived factors follow what they read:
//! - Dependency extraction from level predicates
//! - Arena storage addressed by FactorId
//! - Deterministic topological ordering with cycle reporting

mod error;
mod graph;
mod index;

pub use error::*;
pub use graph::*;
pub use index::NameIndex;
