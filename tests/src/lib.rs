//! Scenario test framework.
//!
//! A scenario pairs one design document with a sequence of steps. Each step
//! either synthesizes solver source or canonicalizes a fixture of recorded
//! trials, and its outcome is checked by an [`Assertion`].

mod assertion;
mod error;
mod loader;
mod scenario;

pub use assertion::{Assertion, StepOutput};
pub use error::{ScenarioError, ScenarioResult};
pub use loader::Trials;
pub use runner::Runner;
pub use scenario::{Action, Scenario, Step};

use std::sync::Once;

static TRACING: Once = Once::new();

/// Route library events to the test writer.
///
/// Filtered by `RUST_LOG`; only errors pass when it is unset.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub mod prelude {
    pub use crate::{Assertion, Scenario, StepOutput, Trials};
    pub use trial_canon::{CanonicalizeOptions, EvalFailurePolicy, LevelMap};
    pub use trial_core::{SynthesisOptions, Value};
}
