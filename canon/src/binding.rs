//! Row environments for predicate evaluation.

use std::collections::HashMap;

use trial_core::{TrialTable, Value};
use trial_parser::VarRef;

use crate::{CanonError, CanonResult};

const NULL: &Value = &Value::Null;

/// Values of a predicate's `(factor, offset)` references for one trial.
#[derive(Debug, Clone, Default)]
pub struct RowEnv<'a> {
    slots: HashMap<(&'a str, i64), &'a Value>,
}

/// Outcome of binding a predicate's references at a row.
#[derive(Debug, Clone)]
pub enum Resolution<'a> {
    /// Every reference landed inside the table.
    Bound(RowEnv<'a>),
    /// Some reference needs a trial before the first or after the last.
    OutOfBounds,
}

impl<'a> RowEnv<'a> {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a slot.
    pub fn insert(&mut self, name: &'a str, offset: i64, value: &'a Value) {
        self.slots.insert((name, offset), value);
    }

    /// Value of `name` at `offset` relative to the current trial.
    pub fn get(&self, name: &str, offset: i64) -> Option<&'a Value> {
        self.slots.get(&(name, offset)).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bind `refs` at trial `row` of `table`.
    ///
    /// A reference to a factor with no column is an error, except for
    /// `own`, the factor being derived: its column does not exist yet, so
    /// it reads as null at every trial. A reference outside the table is
    /// not an error.
    pub fn resolve(
        table: &'a TrialTable,
        own: &str,
        refs: &'a [VarRef],
        row: usize,
    ) -> CanonResult<Resolution<'a>> {
        let mut env = RowEnv::new();
        for r in refs {
            let Some(target) = target_row(row, r.offset, table.len()) else {
                return Ok(Resolution::OutOfBounds);
            };

            let value = match table.column(&r.base) {
                Some(column) => &column[target],
                None if r.base == own => NULL,
                None => return Err(CanonError::missing_column(&r.base)),
            };
            env.insert(&r.base, r.offset, value);
        }
        Ok(Resolution::Bound(env))
    }
}

fn target_row(row: usize, offset: i64, len: usize) -> Option<usize> {
    let target = i64::try_from(row).ok()?.checked_add(offset)?;
    usize::try_from(target).ok().filter(|t| *t < len)
}
