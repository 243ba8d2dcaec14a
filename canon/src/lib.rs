//! Trial Canonicalizer
//!
//! Rebuild the factor columns of recorded trials so they match a design.
//!
//! Responsibilities:
//! - Check static factor labels against declared levels, remapping when asked
//! - Bind predicate references to trial rows, including look-back windows
//! - Evaluate level predicates and assign the first level that holds
//! - Report structural problems as errors, per-row failures by policy

mod binding;
mod canonicalize;
mod error;
mod eval;
mod options;

pub use binding::{Resolution, RowEnv};
pub use canonicalize::{canonicalize, CanonicalTable};
pub use error::*;
pub use eval::Evaluator;
pub use options::*;
