//! Loader for trial fixtures.
//!
//! A fixture is a pipe-separated table, one trial per line:
//!
//! ```text
//! # stroop, block 1
//! color | word  | rt
//! red   | red   | 512
//! green | blue  | -
//! ```
//!
//! The first non-comment line names the columns. A cell of `-` is null,
//! `true`/`false` are booleans, and numbers become ints or floats.

use trial_core::{TrialTable, Value};

use crate::error::{ScenarioError, ScenarioResult};

/// Parser for trial fixtures.
pub struct Trials;

impl Trials {
    /// Parse a fixture into a trial table.
    pub fn parse(source: &str) -> ScenarioResult<TrialTable> {
        let mut header: Option<Vec<String>> = None;
        let mut columns: Vec<Vec<Value>> = Vec::new();

        for (i, line) in source.lines().enumerate() {
            let line_no = i + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let cells: Vec<&str> = trimmed.split('|').map(str::trim).collect();
            let Some(width) = header.as_ref().map(Vec::len) else {
                if cells.iter().any(|c| c.is_empty()) {
                    return Err(ScenarioError::fixture_parse(line_no, "empty column name"));
                }
                columns = vec![Vec::new(); cells.len()];
                header = Some(cells.into_iter().map(String::from).collect());
                continue;
            };

            if cells.len() != width {
                return Err(ScenarioError::fixture_parse(
                    line_no,
                    format!("expected {} cells, found {}", width, cells.len()),
                ));
            }
            for (column, cell) in columns.iter_mut().zip(cells) {
                column.push(parse_cell(cell));
            }
        }

        let names = header.ok_or_else(|| ScenarioError::fixture_parse(0, "missing header line"))?;
        TrialTable::from_columns(names.into_iter().zip(columns))
            .map_err(|e| ScenarioError::fixture_parse(0, e.to_string()))
    }
}

fn parse_cell(cell: &str) -> Value {
    match cell {
        "-" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(i) = cell.parse::<i64>() {
                Value::Int(i)
            } else if let Ok(f) = cell.parse::<f64>() {
                Value::Float(f)
            } else {
                Value::from(cell)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixture() {
        let source = r#"
# a comment before the header
color | word  | rt
red   | red   | 512
green | blue  | 430.5

# trailing comment
blue  | green | -
"#;

        let table = Trials::parse(source).unwrap();

        assert_eq!(table.column_names(), vec!["color", "word", "rt"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell("word", 2), Some(&Value::from("green")));
        assert_eq!(table.cell("rt", 0), Some(&Value::Int(512)));
        assert_eq!(table.cell("rt", 1), Some(&Value::Float(430.5)));
        assert_eq!(table.cell("rt", 2), Some(&Value::Null));
    }

    #[test]
    fn test_cells_keep_inner_spaces() {
        let table = Trials::parse("task | correct\ncolor naming | true\n").unwrap();
        assert_eq!(table.cell("task", 0), Some(&Value::from("color naming")));
        assert_eq!(table.cell("correct", 0), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_ragged_row() {
        let err = Trials::parse("color | word\nred\n").unwrap_err();
        assert!(matches!(err, ScenarioError::FixtureParse { line: 2, .. }));
    }

    #[test]
    fn test_missing_header() {
        let err = Trials::parse("# nothing here\n").unwrap_err();
        assert!(matches!(err, ScenarioError::FixtureParse { line: 0, .. }));
    }
}
