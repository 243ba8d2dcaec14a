//! Synthesis error types.

use thiserror::Error;

/// Errors that can occur during synthesis. Nothing is emitted on error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    /// The design document is malformed.
    #[error("Design error: {0}")]
    Design(#[from] trial_core::DesignError),

    /// The factors cannot be ordered.
    #[error("Dependency error: {0}")]
    Graph(#[from] trial_graph::GraphError),
}

/// Result type for synthesis.
pub type SynthResult<T> = Result<T, SynthError>;
