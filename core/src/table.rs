//! Trial tables.
//!
//! Rows are trials in presentation order, columns are factor names. The
//! table is column-major with columns kept in insertion order. Existing
//! columns are never rewritten by evaluation: derived values arrive as new
//! columns through [`TrialTable::push_column`].

use serde_json::Map;

use crate::{TableError, TableResult, Value};

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<Value>,
}

/// A table of recorded trials.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrialTable {
    columns: Vec<Column>,
    rows: usize,
}

impl TrialTable {
    /// An empty table. The first pushed column fixes the row count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns of equal length.
    pub fn from_columns<N, I>(columns: I) -> TableResult<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<Value>)>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Build a table from an array of JSON objects, one per trial.
    ///
    /// Column order is the order of first appearance across rows; a key
    /// absent from a row reads as null.
    pub fn from_json_rows(rows: serde_json::Value) -> TableResult<Self> {
        let serde_json::Value::Array(rows) = rows else {
            return Err(TableError::MalformedRows("expected an array of objects".into()));
        };

        let mut objects = Vec::with_capacity(rows.len());
        let mut names: Vec<String> = Vec::new();
        for (i, row) in rows.into_iter().enumerate() {
            let serde_json::Value::Object(object) = row else {
                return Err(TableError::MalformedRows(format!("row {} is not an object", i)));
            };
            for key in object.keys() {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
            objects.push(object);
        }

        let mut table = Self {
            columns: Vec::with_capacity(names.len()),
            rows: objects.len(),
        };
        for name in names {
            let values = objects
                .iter_mut()
                .enumerate()
                .map(|(i, object)| match object.remove(&name) {
                    None => Ok(Value::Null),
                    Some(cell) => serde_json::from_value(cell).map_err(|_| {
                        TableError::MalformedRows(format!(
                            "cell '{}' of row {} is not a scalar",
                            name, i
                        ))
                    }),
                })
                .collect::<TableResult<Vec<_>>>()?;
            table.columns.push(Column { name, values });
        }
        Ok(table)
    }

    /// Render as an array of JSON objects, one per trial.
    pub fn to_json_rows(&self) -> serde_json::Value {
        let rows = (0..self.rows)
            .map(|i| {
                let mut object = Map::new();
                for column in &self.columns {
                    let cell = serde_json::to_value(&column.values[i]).unwrap_or(serde_json::Value::Null);
                    object.insert(column.name.clone(), cell);
                }
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(rows)
    }

    /// Number of trials.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.position(name).map(|i| self.columns[i].values.as_slice())
    }

    /// Cell at `row` in column `name`; `None` if either is out of range.
    pub fn cell(&self, name: &str, row: usize) -> Option<&Value> {
        self.column(name).and_then(|values| values.get(row))
    }

    /// Append a new column.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> TableResult<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(TableError::duplicate_column(name));
        }
        if self.columns.is_empty() {
            self.rows = values.len();
        } else if values.len() != self.rows {
            return Err(TableError::column_length(name, self.rows, values.len()));
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Replace every value of a column through `f`.
    ///
    /// Only used to normalize recorded labels of static factors before any
    /// derived column reads them.
    pub fn remap_column(&mut self, name: &str, mut f: impl FnMut(&Value) -> Value) -> TableResult<()> {
        let i = self
            .position(name)
            .ok_or_else(|| TableError::missing_column(name))?;
        for value in &mut self.columns[i].values {
            *value = f(value);
        }
        Ok(())
    }

    /// A new table with exactly the named columns, in the given order.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> TableResult<TrialTable> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let i = self
                .position(name)
                .ok_or_else(|| TableError::missing_column(name))?;
            columns.push(self.columns[i].clone());
        }
        Ok(TrialTable {
            columns,
            rows: self.rows,
        })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
