//! Synthesis options.

use crate::{is_identifier, DesignError, DesignResult};

/// Sampling strategy used when the design does not name one.
pub const DEFAULT_STRATEGY: &str = "RandomGen";

/// Knobs for the generated synthesis program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Argument of the `MinimumTrials` constraint.
    pub minimum_trials: u32,
    /// Sampling strategy class name; always identifier-shaped.
    pub strategy: String,
    /// Number of sequences requested from the solver.
    pub samples: u32,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            minimum_trials: 1,
            strategy: DEFAULT_STRATEGY.to_string(),
            samples: 1,
        }
    }
}

impl SynthesisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minimum_trials(mut self, n: u32) -> Self {
        self.minimum_trials = n;
        self
    }

    pub fn with_samples(mut self, n: u32) -> Self {
        self.samples = n;
        self
    }

    pub fn with_strategy(mut self, name: impl Into<String>) -> DesignResult<Self> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(DesignError::invalid_strategy(name));
        }
        self.strategy = name;
        Ok(self)
    }
}
