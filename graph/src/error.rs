//! Errors for dependency analysis.

use thiserror::Error;

/// Errors raised while building or ordering the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A predicate names a factor the design does not declare.
    #[error("level '{level}' of factor '{factor}' references undeclared factor '{name}'")]
    UnknownFactorReference {
        factor: String,
        level: String,
        name: String,
    },

    /// No ordering exists; `factors` is every factor left unordered, in
    /// declaration order.
    #[error("cyclic dependency among factors: {}", .factors.join(", "))]
    CyclicDependency { factors: Vec<String> },

    /// The same factor name was given twice.
    #[error("factor '{name}' is declared more than once")]
    DuplicateFactor { name: String },
}

impl GraphError {
    pub fn unknown_reference(
        factor: impl Into<String>,
        level: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::UnknownFactorReference {
            factor: factor.into(),
            level: level.into(),
            name: name.into(),
        }
    }

    pub fn cyclic<S: Into<String>>(factors: impl IntoIterator<Item = S>) -> Self {
        Self::CyclicDependency {
            factors: factors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn duplicate_factor(name: impl Into<String>) -> Self {
        Self::DuplicateFactor { name: name.into() }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
