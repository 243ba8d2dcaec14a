//! Scenario definitions.

use trial_canon::CanonicalizeOptions;
use trial_core::SynthesisOptions;

use crate::assertion::Assertion;
use crate::error::ScenarioResult;
use crate::runner::Runner;

/// What a step does with the scenario's design.
#[derive(Debug, Clone)]
pub enum Action {
    /// Emit solver source.
    Synthesize(SynthesisOptions),
    /// Canonicalize a trial fixture.
    Canonicalize {
        trials: String,
        options: CanonicalizeOptions,
    },
}

/// One named step and what its result must satisfy.
#[derive(Debug)]
pub struct Step {
    pub name: String,
    pub action: Action,
    pub assertion: Assertion,
}

/// A design document plus the steps run against it.
#[derive(Debug)]
pub struct Scenario {
    name: String,
    design: Option<String>,
    steps: Vec<Step>,
}

impl Scenario {
    /// Create a new, empty scenario.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            design: None,
            steps: Vec::new(),
        }
    }

    /// Set the JSON design document.
    pub fn design(mut self, json: impl Into<String>) -> Self {
        self.design = Some(json.into());
        self
    }

    /// Add a synthesis step with default options.
    pub fn synthesize(self, name: &str, f: impl FnOnce(Assertion) -> Assertion) -> Self {
        self.synthesize_with(name, SynthesisOptions::default(), f)
    }

    /// Add a synthesis step with explicit options.
    pub fn synthesize_with(
        self,
        name: &str,
        options: SynthesisOptions,
        f: impl FnOnce(Assertion) -> Assertion,
    ) -> Self {
        self.step(name, Action::Synthesize(options), f)
    }

    /// Add a canonicalization step over a trial fixture.
    pub fn canonicalize(
        self,
        name: &str,
        trials: &str,
        f: impl FnOnce(Assertion) -> Assertion,
    ) -> Self {
        self.canonicalize_with(name, trials, CanonicalizeOptions::default(), f)
    }

    /// Add a canonicalization step with explicit options.
    pub fn canonicalize_with(
        self,
        name: &str,
        trials: &str,
        options: CanonicalizeOptions,
        f: impl FnOnce(Assertion) -> Assertion,
    ) -> Self {
        let action = Action::Canonicalize {
            trials: trials.to_string(),
            options,
        };
        self.step(name, action, f)
    }

    fn step(mut self, name: &str, action: Action, f: impl FnOnce(Assertion) -> Assertion) -> Self {
        self.steps.push(Step {
            name: name.to_string(),
            action,
            assertion: f(Assertion::new()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn design_source(&self) -> Option<&str> {
        self.design.as_deref()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step and check its assertion.
    pub fn run(&self) -> ScenarioResult<()> {
        Runner::new(self)?.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_builder() {
        let scenario = Scenario::new("builder")
            .design(r#"{"factors": [], "crossing": []}"#)
            .synthesize("emit", |a| a.contains("Factor"))
            .canonicalize("label", "color\nred\n", |a| a.rows(1));

        assert_eq!(scenario.name(), "builder");
        assert_eq!(scenario.steps().len(), 2);
        assert!(matches!(scenario.steps()[0].action, Action::Synthesize(_)));
        assert!(matches!(scenario.steps()[1].action, Action::Canonicalize { .. }));
    }

    #[test]
    fn test_scenario_without_design() {
        let err = Scenario::new("empty").synthesize("emit", |a| a).run().unwrap_err();
        assert!(err.to_string().contains("has no design"));
    }
}
