//! Canonicalization error types.

use thiserror::Error;

/// A predicate that could not be evaluated for one row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Operands the operator is not defined for.
    #[error("type error: {message}")]
    TypeError { message: String },

    /// A variable slot with no value in the row environment.
    #[error("no value bound for '{name}' at offset {offset}")]
    UnboundSlot { name: String, offset: i64 },
}

impl EvalError {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError {
            message: message.into(),
        }
    }

    pub fn unbound_slot(name: impl Into<String>, offset: i64) -> Self {
        Self::UnboundSlot {
            name: name.into(),
            offset,
        }
    }
}

/// Result type for predicate evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that abort canonicalization. No table is returned on error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanonError {
    /// Recorded labels of a static factor do not match its levels.
    #[error(
        "levels in column '{column}' [{}] do not match design [{}]",
        .observed.join(", "),
        .expected.join(", ")
    )]
    LevelMismatch {
        column: String,
        observed: Vec<String>,
        expected: Vec<String>,
    },

    /// A static factor has no column in the input table.
    #[error("missing factor column '{name}'")]
    MissingColumn { name: String },

    /// A predicate failed under the strict failure policy.
    #[error("evaluating level '{level}' of factor '{factor}' at trial {row}: {source}")]
    Evaluation {
        factor: String,
        level: String,
        row: usize,
        #[source]
        source: EvalError,
    },

    #[error("Dependency error: {0}")]
    Graph(#[from] trial_graph::GraphError),

    #[error("Table error: {0}")]
    Table(#[from] trial_core::TableError),
}

impl CanonError {
    pub fn level_mismatch(
        column: impl Into<String>,
        observed: Vec<String>,
        expected: Vec<String>,
    ) -> Self {
        Self::LevelMismatch {
            column: column.into(),
            observed,
            expected,
        }
    }

    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn { name: name.into() }
    }

    pub fn evaluation(
        factor: impl Into<String>,
        level: impl Into<String>,
        row: usize,
        source: EvalError,
    ) -> Self {
        Self::Evaluation {
            factor: factor.into(),
            level: level.into(),
            row,
            source,
        }
    }
}

/// Result type for canonicalization.
pub type CanonResult<T> = Result<T, CanonError>;
