//! Trial predicate parser
//!
//! This crate provides parsing for the predicate strings attached to derived levels:
//! - Lexing of the restricted boolean/comparison grammar
//! - Expression parsing into a small AST (comparisons, `and`, `or`, `not`)
//! - The two-pass reference scan that yields `(factor, offset)` references
//! - Window width computation for cross-trial predicates
//!
//! The same [`Expression`] value is consumed by code synthesis and by
//! canonicalization, so both directions agree on which cells a predicate reads.

mod ast;
mod error;
mod expression;
mod lexer;
mod parser;
mod refs;

pub use ast::*;
pub use error::*;
pub use expression::Expression;
pub use parser::{parse_expr, Parser};
pub use refs::{scan_refs, strip_strings, window_width, VarRef, KEYWORDS};
