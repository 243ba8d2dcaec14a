//! Reconstruction of factor labels from recorded trials.
//!
//! Factors are processed in dependency order. Static factors have their
//! recorded labels checked (and optionally remapped) against the declared
//! levels; derived factors get a new column holding, per trial, the first
//! level whose predicate holds, or null.

use tracing::{debug, trace, warn};
use trial_core::{Factor, TrialTable, Value};
use trial_graph::DependencyGraph;

use crate::{
    CanonError, CanonResult, CanonicalizeOptions, EvalFailurePolicy, Evaluator, LevelMap, Resolution,
    RowEnv,
};

/// Canonicalized table and the factor order used to build it.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTable {
    table: TrialTable,
    order: Vec<String>,
}

impl CanonicalTable {
    pub fn table(&self) -> &TrialTable {
        &self.table
    }

    pub fn into_table(self) -> TrialTable {
        self.table
    }

    /// Factor names in dependency order.
    pub fn order(&self) -> &[String] {
        &self.order
    }
}

/// Canonicalize a trial table against factors in declaration order.
pub fn canonicalize(
    table: &TrialTable,
    factors: &[Factor],
    options: &CanonicalizeOptions,
) -> CanonResult<CanonicalTable> {
    let graph = DependencyGraph::build(factors)?;
    let ordered: Vec<&Factor> = graph
        .topological_order()?
        .into_iter()
        .map(|id| &factors[id.index()])
        .collect();

    let mut table = table.clone();

    for factor in ordered.iter().filter(|f| f.is_static()) {
        check_static(&mut table, factor, options.remap.get(factor.name()))?;
    }

    let evaluator = Evaluator::new();
    for factor in ordered.iter().filter(|f| f.is_derived()) {
        if table.has_column(factor.name()) {
            warn!(factor = factor.name(), "column already present, keeping recorded values");
            continue;
        }
        let values = derive_column(&evaluator, &table, factor, options.on_eval_error)?;
        table.push_column(factor.name(), values)?;
    }

    let order: Vec<String> = ordered.iter().map(|f| f.name().to_string()).collect();
    if options.only_factors {
        table = table.project(order.as_slice())?;
    }

    Ok(CanonicalTable { table, order })
}

// ==================== STATIC FACTORS ====================

/// Verify a static column holds exactly the declared level names.
///
/// An explicit map is applied first, with unmapped values becoming null.
/// Otherwise, when the recorded and declared sets differ but have the same
/// size, sorted recorded values are paired with sorted level names.
fn check_static(table: &mut TrialTable, factor: &Factor, remap: Option<&LevelMap>) -> CanonResult<()> {
    let column = factor.name();
    let values = table
        .column(column)
        .ok_or_else(|| CanonError::missing_column(column))?;

    let mut expected: Vec<&str> = factor.level_names();
    let mut observed = distinct(values);

    if let Some(map) = remap {
        debug!(factor = column, entries = map.len(), "applying explicit remap");
        table.remap_column(column, |v| Value::from(map.get(v)))?;
        observed = distinct(table.column(column).unwrap_or(&[]));
    } else if !same_levels(&observed, &expected) && observed.len() == expected.len() {
        expected.sort_unstable();
        let pairs: Vec<(Value, String)> = observed
            .iter()
            .cloned()
            .zip(expected.iter().map(|s| s.to_string()))
            .collect();
        debug!(factor = column, mapping = ?pairs, "applying automatic remap");
        table.remap_column(column, |v| {
            pairs
                .iter()
                .find(|(from, _)| from.cmp_total(v).is_eq())
                .map(|(_, to)| Value::from(to.as_str()))
                .unwrap_or(Value::Null)
        })?;
        observed = distinct(table.column(column).unwrap_or(&[]));
    }

    if !same_levels(&observed, &expected) {
        return Err(CanonError::level_mismatch(
            column,
            observed.iter().map(label).collect(),
            factor.level_names().into_iter().map(String::from).collect(),
        ));
    }
    Ok(())
}

/// Distinct values sorted by the total value order.
fn distinct(values: &[Value]) -> Vec<Value> {
    let mut out: Vec<Value> = values.to_vec();
    out.sort_by(Value::cmp_total);
    out.dedup_by(|a, b| a.cmp_total(b).is_eq());
    out
}

fn same_levels(observed: &[Value], expected: &[&str]) -> bool {
    observed.len() == expected.len()
        && observed
            .iter()
            .all(|v| v.as_str().is_some_and(|s| expected.contains(&s)))
}

fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ==================== DERIVED FACTORS ====================

/// Evaluate a derived factor for every trial; first matching level wins.
///
/// Each trial reads only the input table, so rows are independent. A
/// factor reading its own column sees null at every trial.
fn derive_column(
    evaluator: &Evaluator,
    table: &TrialTable,
    factor: &Factor,
    policy: EvalFailurePolicy,
) -> CanonResult<Vec<Value>> {
    let mut values: Vec<Value> = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        let mut assigned = Value::Null;

        for (level, expression) in factor.expressions() {
            let env = match RowEnv::resolve(table, factor.name(), expression.refs(), row)? {
                Resolution::Bound(env) => env,
                Resolution::OutOfBounds => {
                    trace!(factor = factor.name(), level = level.name(), row, "window out of bounds");
                    continue;
                }
            };

            match evaluator.matches(expression.ast(), &env) {
                Ok(true) => {
                    assigned = Value::from(level.name());
                    break;
                }
                Ok(false) => {}
                Err(err) => match policy {
                    EvalFailurePolicy::Unmatched => {
                        warn!(
                            factor = factor.name(),
                            level = level.name(),
                            row,
                            error = %err,
                            "evaluation failed, treating level as unmatched"
                        );
                    }
                    EvalFailurePolicy::Fail => {
                        return Err(CanonError::evaluation(factor.name(), level.name(), row, err));
                    }
                },
            }
        }

        values.push(assigned);
    }

    let unmatched = values.iter().filter(|v| v.is_null()).count();
    debug!(
        factor = factor.name(),
        matched = values.len() - unmatched,
        unmatched,
        "derived column"
    );
    Ok(values)
}
