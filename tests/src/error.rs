//! Scenario framework errors.

use thiserror::Error;

/// Errors raised while preparing or checking a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("fixture parse error at line {line}: {message}")]
    FixtureParse { line: usize, message: String },

    #[error("scenario '{scenario}' has no design")]
    MissingDesign { scenario: String },

    #[error("assertion failed at step '{step}': {message}")]
    AssertionFailed { step: String, message: String },
}

impl ScenarioError {
    pub fn fixture_parse(line: usize, message: impl Into<String>) -> Self {
        Self::FixtureParse {
            line,
            message: message.into(),
        }
    }

    pub fn missing_design(scenario: impl Into<String>) -> Self {
        Self::MissingDesign {
            scenario: scenario.into(),
        }
    }

    pub fn assertion_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            message: message.into(),
        }
    }
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
