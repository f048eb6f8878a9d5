//! Schema inference over ingested rows

use serde_json::Value;
use tq_core::{dates, Column, ColumnType, Row, Schema};

/// Maximum rows sampled per column when classifying types.
pub const MAX_SAMPLE_ROWS: usize = 100;

/// Raw values retained per column for prompt context.
pub const SAMPLE_VALUES_PER_COLUMN: usize = 3;

// A type wins when matches/samples >= 4/5. Integer math keeps the 80%
// boundary exact: 80 of 100 qualifies, 79 does not.
const THRESHOLD_NUMERATOR: usize = 4;
const THRESHOLD_DENOMINATOR: usize = 5;

const BOOLEAN_TOKENS: [&str; 4] = ["true", "false", "yes", "no"];

/// Infers a column's semantic type from sampled values.
///
/// Classification order matters: boolean before number so `"true"` never
/// reads as a non-numeric string, number before date so numeric serials
/// never read as epoch dates. Anything ambiguous degrades to string.
pub struct SchemaInferencer {
    sample_rows: usize,
}

impl SchemaInferencer {
    pub fn new() -> Self {
        Self {
            sample_rows: MAX_SAMPLE_ROWS,
        }
    }

    /// Set how many rows are sampled per column.
    pub fn with_sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = rows;
        self
    }

    /// Infer a schema from a snapshot of rows.
    ///
    /// Pure and total: the same input always yields the same schema, and
    /// there is no failure path. Column order follows the first row.
    pub fn infer(&self, rows: &[Row]) -> Schema {
        let Some(first) = rows.first() else {
            return Schema {
                columns: Vec::new(),
                row_count: 0,
            };
        };

        let columns = first
            .keys()
            .map(|name| self.infer_column(name, rows))
            .collect();

        Schema {
            columns,
            row_count: rows.len(),
        }
    }

    fn infer_column(&self, name: &str, rows: &[Row]) -> Column {
        let mut samples: Vec<&Value> = Vec::new();
        for row in rows.iter().take(self.sample_rows) {
            match row.get(name) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) if s.trim().is_empty() => continue,
                Some(value) => samples.push(value),
            }
        }

        let column_type = classify(&samples);
        tracing::trace!(column = name, kind = column_type.as_str(), samples = samples.len(), "classified column");

        Column {
            name: name.to_string(),
            column_type,
            sample_values: samples
                .iter()
                .take(SAMPLE_VALUES_PER_COLUMN)
                .map(|v| (*v).clone())
                .collect(),
        }
    }
}

impl Default for SchemaInferencer {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(samples: &[&Value]) -> ColumnType {
    if samples.is_empty() {
        return ColumnType::String;
    }

    if meets_threshold(count(samples, is_boolean), samples.len()) {
        ColumnType::Boolean
    } else if meets_threshold(count(samples, is_numeric), samples.len()) {
        ColumnType::Number
    } else if meets_threshold(count(samples, is_date), samples.len()) {
        ColumnType::Date
    } else {
        ColumnType::String
    }
}

fn meets_threshold(matches: usize, total: usize) -> bool {
    matches * THRESHOLD_DENOMINATOR >= total * THRESHOLD_NUMERATOR
}

fn count(samples: &[&Value], predicate: fn(&Value) -> bool) -> usize {
    samples.iter().filter(|v| predicate(**v)).count()
}

fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::String(s) => {
            let lower = s.trim().to_lowercase();
            BOOLEAN_TOKENS.contains(&lower.as_str())
        }
        _ => false,
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            // Currency symbols, thousands separators, and percent signs
            // still count as numeric at inference time.
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | '%'))
                .collect();
            !cleaned.is_empty() && cleaned.parse::<f64>().is_ok()
        }
        _ => false,
    }
}

fn is_date(value: &Value) -> bool {
    match value {
        Value::String(s) => dates::looks_date_shaped(s) && dates::parse_date(s).is_some(),
        _ => false,
    }
}
