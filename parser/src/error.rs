//! Parser error types.

use crate::Span;
use thiserror::Error;

/// Errors raised while lexing, parsing or scanning a predicate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The predicate is empty or only whitespace.
    #[error("empty expression")]
    Empty,

    /// A character outside the grammar.
    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    /// A quoted literal without its closing quote.
    #[error("unterminated string literal starting at offset {pos}")]
    UnterminatedString { pos: usize },

    /// A backslash escape the grammar does not know.
    #[error("invalid escape sequence '\\{ch}' at offset {pos}")]
    InvalidEscape { ch: char, pos: usize },

    /// A numeric literal that does not fit the target type.
    #[error("invalid number literal '{text}' at offset {pos}")]
    InvalidNumber { text: String, pos: usize },

    /// The parser expected something else.
    #[error("expected {expected}, found {found} at offset {pos}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: usize,
    },

    /// An operator outside the restricted grammar (`in`, `is`, `=`, `!`).
    #[error("unsupported operator '{op}' at offset {pos}")]
    UnsupportedOperator { op: String, pos: usize },

    /// A bracketed trial offset that is not an integer.
    #[error("malformed trial offset in '{text}'")]
    MalformedOffset { text: String },

    /// A base name used both bare and with an explicit offset.
    #[error(
        "'{name}' is referenced both bare and with a trial offset; write '{name}[0]' for the current trial"
    )]
    MixedReference { name: String },

    /// The reference scan and the parsed predicate read different cells.
    #[error("reference '{name}' is not read by the parsed predicate the same way it was scanned")]
    ReferenceMismatch { name: String },
}

impl ParseError {
    pub fn unexpected_char(ch: char, pos: usize) -> Self {
        Self::UnexpectedChar { ch, pos }
    }

    pub fn invalid_number(text: impl Into<String>, pos: usize) -> Self {
        Self::InvalidNumber {
            text: text.into(),
            pos,
        }
    }

    pub fn unexpected_token(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            pos: span.start,
        }
    }

    pub fn unsupported_operator(op: impl Into<String>, pos: usize) -> Self {
        Self::UnsupportedOperator { op: op.into(), pos }
    }

    pub fn malformed_offset(text: impl Into<String>) -> Self {
        Self::MalformedOffset { text: text.into() }
    }

    pub fn mixed_reference(name: impl Into<String>) -> Self {
        Self::MixedReference { name: name.into() }
    }

    pub fn reference_mismatch(name: impl Into<String>) -> Self {
        Self::ReferenceMismatch { name: name.into() }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
