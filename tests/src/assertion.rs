//! Assertion types and builders for verifying step results.

use trial_canon::CanonicalTable;
use trial_core::Value;

use crate::error::{ScenarioError, ScenarioResult};

/// What a successful step produced.
#[derive(Debug, Clone)]
pub enum StepOutput {
    /// Synthesized solver source.
    Source(String),
    /// Canonicalized trials.
    Table(CanonicalTable),
}

/// A complete assertion for a step result.
#[derive(Default)]
pub struct Assertion {
    // Error assertions
    pub error: Option<String>,
    pub error_pattern: Option<String>,

    // Synthesis assertions
    pub source: Option<String>,
    pub contains: Vec<String>,
    pub in_order: Vec<String>,

    // Canonicalization assertions
    pub columns: Option<Vec<String>>,
    pub rows: Option<usize>,
    pub order: Option<Vec<String>>,
    pub column_values: Vec<(String, Vec<Value>)>,
    pub counts: Vec<(String, Value, usize)>,

    // Custom assertion function
    #[allow(clippy::type_complexity)]
    pub custom: Option<Box<dyn Fn(&StepOutput) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assertion")
            .field("error", &self.error)
            .field("error_pattern", &self.error_pattern)
            .field("contains", &self.contains)
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("counts", &self.counts)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Assertion {
    /// Create a new empty assertion.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== BUILDERS ====================

    /// Expect the step to fail with a message containing `text`.
    pub fn error(mut self, text: impl Into<String>) -> Self {
        self.error = Some(text.into());
        self
    }

    /// Expect the step to fail with a message matching a regex.
    pub fn error_matching(mut self, pattern: impl Into<String>) -> Self {
        self.error_pattern = Some(pattern.into());
        self
    }

    /// Expect exactly this source text.
    pub fn source(mut self, text: impl Into<String>) -> Self {
        self.source = Some(text.into());
        self
    }

    /// Expect the source to contain `text`.
    pub fn contains(mut self, text: impl Into<String>) -> Self {
        self.contains.push(text.into());
        self
    }

    /// Expect the given fragments to appear in this order.
    pub fn in_order<S: Into<String>>(mut self, fragments: impl IntoIterator<Item = S>) -> Self {
        self.in_order = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Expect exactly these columns, in order.
    pub fn columns<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.columns = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Expect this many trials.
    pub fn rows(mut self, n: usize) -> Self {
        self.rows = Some(n);
        self
    }

    /// Expect the factor processing order.
    pub fn order<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.order = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Expect a column to hold exactly these values.
    pub fn column<V: Into<Value>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.column_values
            .push((name.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Expect `n` trials whose `column` holds `value`.
    pub fn count(mut self, column: impl Into<String>, value: impl Into<Value>, n: usize) -> Self {
        self.counts.push((column.into(), value.into(), n));
        self
    }

    /// Expect `n` trials with no level assigned in `column`.
    pub fn nulls(self, column: impl Into<String>, n: usize) -> Self {
        self.count(column, Value::Null, n)
    }

    /// Run an arbitrary check on the output.
    pub fn custom(mut self, check: impl Fn(&StepOutput) -> bool + Send + Sync + 'static) -> Self {
        self.custom = Some(Box::new(check));
        self
    }

    // ==================== VERIFICATION ====================

    /// Verify the assertion against a result.
    pub fn verify(&self, step: &str, result: &Result<StepOutput, String>) -> ScenarioResult<()> {
        // Check error expectations first
        if let Some(ref expected) = self.error {
            return match result {
                Err(msg) if msg.contains(expected.as_str()) => Ok(()),
                Err(msg) => Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error containing '{}', got: {}", expected, msg),
                )),
                Ok(_) => Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error containing '{}', but step succeeded", expected),
                )),
            };
        }

        if let Some(ref pattern) = self.error_pattern {
            let re = regex_lite::Regex::new(pattern).map_err(|e| {
                ScenarioError::assertion_failed(step, format!("invalid regex pattern: {}", e))
            })?;
            return match result {
                Err(msg) if re.is_match(msg) => Ok(()),
                Err(msg) => Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error matching '{}', got: {}", pattern, msg),
                )),
                Ok(_) => Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error matching '{}', but step succeeded", pattern),
                )),
            };
        }

        let output = result
            .as_ref()
            .map_err(|msg| ScenarioError::assertion_failed(step, format!("step failed: {}", msg)))?;

        if let Some(ref custom) = self.custom {
            if !custom(output) {
                return Err(ScenarioError::assertion_failed(step, "custom assertion failed"));
            }
        }

        match output {
            StepOutput::Source(text) => self.verify_source(step, text),
            StepOutput::Table(table) => self.verify_table(step, table),
        }
    }

    fn verify_source(&self, step: &str, text: &str) -> ScenarioResult<()> {
        if let Some(ref expected) = self.source {
            if text != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("source mismatch:\n--- expected\n{}\n--- actual\n{}", expected, text),
                ));
            }
        }

        for fragment in &self.contains {
            if !text.contains(fragment.as_str()) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected source to contain '{}':\n{}", fragment, text),
                ));
            }
        }

        let mut rest = text;
        for fragment in &self.in_order {
            match rest.find(fragment.as_str()) {
                Some(pos) => rest = &rest[pos + fragment.len()..],
                None => {
                    return Err(ScenarioError::assertion_failed(
                        step,
                        format!("'{}' missing or out of order in:\n{}", fragment, text),
                    ))
                }
            }
        }

        if self.has_table_checks() {
            return Err(ScenarioError::assertion_failed(
                step,
                "table assertions on a synthesis step",
            ));
        }
        Ok(())
    }

    fn verify_table(&self, step: &str, canonical: &CanonicalTable) -> ScenarioResult<()> {
        let table = canonical.table();

        if let Some(ref expected) = self.columns {
            let actual = table.column_names();
            if actual != *expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!(
                        "column mismatch:\n  expected: {:?}\n  actual:   {:?}",
                        expected, actual
                    ),
                ));
            }
        }

        if let Some(expected) = self.rows {
            if table.len() != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected {} rows, got {}", expected, table.len()),
                ));
            }
        }

        if let Some(ref expected) = self.order {
            if canonical.order() != expected.as_slice() {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!(
                        "order mismatch:\n  expected: {:?}\n  actual:   {:?}",
                        expected,
                        canonical.order()
                    ),
                ));
            }
        }

        for (name, expected) in &self.column_values {
            let actual = table.column(name).ok_or_else(|| {
                ScenarioError::assertion_failed(step, format!("column '{}' not found", name))
            })?;
            if actual != expected.as_slice() {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!(
                        "values mismatch for column '{}':\n  expected: {}\n  actual:   {}",
                        name,
                        format_values(expected),
                        format_values(actual)
                    ),
                ));
            }
        }

        for (name, value, expected) in &self.counts {
            let actual = table
                .column(name)
                .ok_or_else(|| {
                    ScenarioError::assertion_failed(step, format!("column '{}' not found", name))
                })?
                .iter()
                .filter(|v| *v == value)
                .count();
            if actual != *expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!(
                        "expected {} trials with {} = {}, got {}",
                        expected, name, value, actual
                    ),
                ));
            }
        }

        if self.source.is_some() || !self.contains.is_empty() || !self.in_order.is_empty() {
            return Err(ScenarioError::assertion_failed(
                step,
                "source assertions on a canonicalization step",
            ));
        }
        Ok(())
    }

    fn has_table_checks(&self) -> bool {
        self.columns.is_some()
            || self.rows.is_some()
            || self.order.is_some()
            || !self.column_values.is_empty()
            || !self.counts.is_empty()
    }
}

fn format_values(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trial_canon::{canonicalize, CanonicalizeOptions};
    use trial_core::{Factor, Level, TrialTable};

    fn table_output() -> StepOutput {
        let factors = vec![Factor::new(
            "color",
            vec![Level::fixed("red", 1), Level::fixed("blue", 1)],
        )
        .unwrap()];
        let table = TrialTable::from_columns([(
            "color",
            vec![Value::from("red"), Value::from("blue"), Value::from("red")],
        )])
        .unwrap();
        StepOutput::Table(canonicalize(&table, &factors, &CanonicalizeOptions::default()).unwrap())
    }

    #[test]
    fn test_error_assertion() {
        let failed: Result<StepOutput, String> = Err("cyclic dependency among factors: a, b".into());
        assert!(Assertion::new().error("cyclic").verify("s", &failed).is_ok());
        assert!(Assertion::new().error("missing").verify("s", &failed).is_err());
        assert!(Assertion::new()
            .error_matching(r"among factors: \w+, \w+$")
            .verify("s", &failed)
            .is_ok());
        assert!(Assertion::new().rows(1).verify("s", &failed).is_err());
    }

    #[test]
    fn test_source_assertion() {
        let output = Ok(StepOutput::Source("a = 1\nb = 2\n".into()));
        assert!(Assertion::new().contains("b = 2").verify("s", &output).is_ok());
        assert!(Assertion::new().in_order(["a =", "b ="]).verify("s", &output).is_ok());
        assert!(Assertion::new().in_order(["b =", "a ="]).verify("s", &output).is_err());
        assert!(Assertion::new().rows(2).verify("s", &output).is_err());
    }

    #[test]
    fn test_table_assertion() {
        let output = Ok(table_output());
        let assertion = Assertion::new()
            .columns(["color"])
            .rows(3)
            .order(["color"])
            .column("color", ["red", "blue", "red"])
            .count("color", "red", 2);
        assert!(assertion.verify("s", &output).is_ok());

        let err = Assertion::new().count("color", "blue", 2).verify("s", &output).unwrap_err();
        assert!(err.to_string().contains("expected 2 trials with color = \"blue\", got 1"));
    }
}
