//! Trial Synthesizer
//!
//! Turn a design into source for the external trial-sequence solver.
//!
//! Responsibilities:
//! - Order factors by dependency
//! - Emit one declaration per factor, dependencies first
//! - Emit the design, crossing and constraint assembly
//! - Emit the synthesis invocation for the chosen sampling strategy

mod compiler;
mod error;

pub use compiler::{synthesize, synthesize_json, Synthesizer};
pub use error::{SynthError, SynthResult};
