//! Trial Core Types
//!
//! This crate provides the data model shared by synthesis and canonicalization:
//! - Identity types (FactorId)
//! - Cell values (the Value enum stored in trial tables)
//! - The design model (Factor, Level, LevelKind, Crossing, Design)
//! - Trial tables
//! - Text helpers for emitted source
//! - Common error types

mod design;
mod error;
mod id;
mod options;
mod table;
mod text;
mod value;

pub use design::*;
pub use error::*;
pub use id::*;
pub use options::*;
pub use table::*;
pub use text::*;
pub use value::*;

pub use trial_parser::{Expression, VarRef};
