//! Canonicalization options.

use std::collections::HashMap;

use trial_core::Value;

/// What to do when a predicate cannot be evaluated for a row.
///
/// Out-of-bounds windows are not evaluation failures and leave the level
/// unmatched under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalFailurePolicy {
    /// Treat the level as not matched for that row.
    #[default]
    Unmatched,
    /// Abort canonicalization.
    Fail,
}

/// Explicit mapping from recorded values to level names for one column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelMap {
    entries: Vec<(Value, String)>,
}

impl LevelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<Value>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        match self.entries.iter_mut().find(|(v, _)| *v == from) {
            Some(entry) => entry.1 = to,
            None => self.entries.push((from, to)),
        }
    }

    /// Level name for a recorded value.
    pub fn get(&self, value: &Value) -> Option<&str> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, to)| to.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Into<Value>, S: Into<String>> FromIterator<(V, S)> for LevelMap {
    fn from_iter<I: IntoIterator<Item = (V, S)>>(iter: I) -> Self {
        let mut map = LevelMap::new();
        for (from, to) in iter {
            map.insert(from, to);
        }
        map
    }
}

/// Options for [`canonicalize`](crate::canonicalize).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalizeOptions {
    /// Explicit value remaps for static factor columns.
    pub remap: HashMap<String, LevelMap>,
    /// Keep only the declared factor columns, in dependency order.
    pub only_factors: bool,
    /// Policy for per-row evaluation failures.
    pub on_eval_error: EvalFailurePolicy,
}

impl CanonicalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remap(mut self, column: impl Into<String>, map: LevelMap) -> Self {
        self.remap.insert(column.into(), map);
        self
    }

    pub fn with_only_factors(mut self, only_factors: bool) -> Self {
        self.only_factors = only_factors;
        self
    }

    pub fn with_eval_failure_policy(mut self, policy: EvalFailurePolicy) -> Self {
        self.on_eval_error = policy;
        self
    }
}
