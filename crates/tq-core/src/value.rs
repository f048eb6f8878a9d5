//! Cell values and the helpers every stage uses to read them

use serde_json::Value;

/// A single table row: an ordered mapping from column name to raw value.
///
/// Column order follows the source file (`serde_json` is built with
/// `preserve_order`), and values stay exactly as ingested - coercion is
/// the reader's decision, not the row's.
pub type Row = serde_json::Map<String, Value>;

/// Coerce a raw cell value to a number.
///
/// Strings are cleaned of currency symbols (`$`) and thousands separators
/// (`,`) before parsing. Returns `None` when nothing numeric remains;
/// callers pick their own fallback (0 for aggregation, drop-the-row for
/// chart payloads).
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ','))
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Look up a field inside a row, following dot-delimited nested paths
/// (`"user.name"`) by iterative descent.
///
/// Missing segments and explicit nulls both yield `None`; the caller
/// supplies its own default instead of this ever failing.
pub fn extract<'a>(row: &'a Row, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = row.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    match current {
        Value::Null => None,
        other => Some(other),
    }
}

/// Render a cell value the way a chart label should read.
///
/// Strings come through verbatim; integral numbers drop the trailing
/// `.0`; everything else falls back to its JSON rendering.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else {
                n.to_string()
            }
        }
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
