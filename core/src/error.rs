//! Error types for design construction and trial tables.

use thiserror::Error;
use trial_parser::ParseError;

/// Errors raised while turning a design document into a [`Design`](crate::Design).
///
/// All of them are structural: nothing is emitted or evaluated for a design
/// that fails here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    /// A required top-level key is absent or empty.
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// A factor without a name or without levels.
    #[error("malformed factor #{index}: {reason}")]
    MalformedFactor { index: usize, reason: String },

    /// A level without a name, with an empty expression, or with a bad weight.
    #[error("malformed level #{index} of factor '{factor}': {reason}")]
    MalformedLevel {
        factor: String,
        index: usize,
        reason: String,
    },

    #[error("factor '{name}' is declared more than once")]
    DuplicateFactor { name: String },

    #[error("level '{level}' is declared more than once in factor '{factor}'")]
    DuplicateLevel { factor: String, level: String },

    /// The crossing names a factor the design does not declare.
    #[error("crossing references undeclared factor '{name}'")]
    UnknownCrossingFactor { name: String },

    /// Strategy names are spliced into generated code and must be identifiers.
    #[error("invalid sampling strategy '{name}'")]
    InvalidStrategy { name: String },

    /// A derived level whose predicate does not parse.
    #[error("invalid expression for level '{level}' of factor '{factor}': {source}")]
    Expression {
        factor: String,
        level: String,
        #[source]
        source: ParseError,
    },

    /// The document is not shaped like a design at all.
    #[error("invalid design document: {0}")]
    Document(String),
}

impl DesignError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn malformed_factor(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedFactor {
            index,
            reason: reason.into(),
        }
    }

    pub fn malformed_level(factor: impl Into<String>, index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLevel {
            factor: factor.into(),
            index,
            reason: reason.into(),
        }
    }

    pub fn duplicate_factor(name: impl Into<String>) -> Self {
        Self::DuplicateFactor { name: name.into() }
    }

    pub fn duplicate_level(factor: impl Into<String>, level: impl Into<String>) -> Self {
        Self::DuplicateLevel {
            factor: factor.into(),
            level: level.into(),
        }
    }

    pub fn unknown_crossing_factor(name: impl Into<String>) -> Self {
        Self::UnknownCrossingFactor { name: name.into() }
    }

    pub fn invalid_strategy(name: impl Into<String>) -> Self {
        Self::InvalidStrategy { name: name.into() }
    }

    pub fn expression(factor: impl Into<String>, level: impl Into<String>, source: ParseError) -> Self {
        Self::Expression {
            factor: factor.into(),
            level: level.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for DesignError {
    fn from(err: serde_json::Error) -> Self {
        Self::Document(err.to_string())
    }
}

/// Result type for design construction.
pub type DesignResult<T> = Result<T, DesignError>;

/// Errors raised by [`TrialTable`](crate::TrialTable) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("column '{name}' already exists")]
    DuplicateColumn { name: String },

    #[error("column '{name}' has {actual} rows, table has {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{name}' not found")]
    MissingColumn { name: String },

    /// Row input that is not an array of objects.
    #[error("malformed rows: {0}")]
    MalformedRows(String),
}

impl TableError {
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Self::DuplicateColumn { name: name.into() }
    }

    pub fn column_length(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ColumnLength {
            name: name.into(),
            expected,
            actual,
        }
    }

    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn { name: name.into() }
    }
}

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;
