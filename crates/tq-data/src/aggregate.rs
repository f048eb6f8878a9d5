//! Plan-driven aggregation over raw rows

use indexmap::IndexMap;
use serde_json::Value;
use tq_core::{coerce_number, display_string, AggregationKind, QueryPlan, Row};

/// Whether an average's divisor counts rows whose value was null or
/// unparseable (they coerce to 0). This is the observed product
/// behavior; flip it here, never at call sites.
pub const AVERAGE_DENOMINATOR_COUNTS_NULLS: bool = true;

/// Name of the synthesized column in `count` output rows.
pub const COUNT_COLUMN: &str = "count";

/// What the engine did with the rows.
///
/// Under-specified plans degrade to a pass-through instead of failing,
/// and callers get to see that explicitly rather than inferring it from
/// row shape.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationOutcome {
    /// The requested reduction was applied.
    Aggregated(Vec<Row>),
    /// Rows passed through unreduced.
    PassThrough {
        rows: Vec<Row>,
        reason: PassThroughReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughReason {
    /// The plan did not ask for a reduction.
    NotRequested,
    /// The plan named fewer columns than the aggregation needs.
    MissingColumns,
}

impl AggregationOutcome {
    pub fn rows(&self) -> &[Row] {
        match self {
            AggregationOutcome::Aggregated(rows) => rows,
            AggregationOutcome::PassThrough { rows, .. } => rows,
        }
    }

    pub fn into_rows(self) -> Vec<Row> {
        match self {
            AggregationOutcome::Aggregated(rows) => rows,
            AggregationOutcome::PassThrough { rows, .. } => rows,
        }
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self, AggregationOutcome::Aggregated(_))
    }
}

enum Reduce {
    Sum,
    Average,
}

/// Apply a plan's aggregation to a snapshot of rows.
///
/// Output groups appear in first-seen order, and group keys are unique.
/// Values coerce through the usual `$`/`,` stripping, with unparseable
/// cells counting as 0.
pub fn aggregate(rows: &[Row], plan: &QueryPlan) -> AggregationOutcome {
    match plan.aggregation {
        AggregationKind::None => AggregationOutcome::PassThrough {
            rows: rows.to_vec(),
            reason: PassThroughReason::NotRequested,
        },
        kind if plan.needed_columns.len() < kind.required_columns() => {
            tracing::warn!(
                kind = kind.as_str(),
                columns = plan.needed_columns.len(),
                "plan names too few columns to aggregate, passing rows through"
            );
            AggregationOutcome::PassThrough {
                rows: rows.to_vec(),
                reason: PassThroughReason::MissingColumns,
            }
        }
        AggregationKind::Count => {
            AggregationOutcome::Aggregated(count_groups(rows, &plan.needed_columns[0]))
        }
        AggregationKind::Sum | AggregationKind::GroupBy => AggregationOutcome::Aggregated(
            reduce_groups(rows, &plan.needed_columns[0], &plan.needed_columns[1], Reduce::Sum),
        ),
        AggregationKind::Average => AggregationOutcome::Aggregated(reduce_groups(
            rows,
            &plan.needed_columns[0],
            &plan.needed_columns[1],
            Reduce::Average,
        )),
    }
}

fn count_groups(rows: &[Row], group_column: &str) -> Vec<Row> {
    let mut groups: IndexMap<String, (Value, usize)> = IndexMap::new();
    for row in rows {
        let label = row.get(group_column).cloned().unwrap_or(Value::Null);
        let entry = groups
            .entry(group_key(&label))
            .or_insert_with(|| (label, 0));
        entry.1 += 1;
    }

    groups
        .into_values()
        .map(|(label, count)| {
            let mut out = Row::new();
            out.insert(group_column.to_string(), label);
            out.insert(COUNT_COLUMN.to_string(), Value::from(count));
            out
        })
        .collect()
}

struct GroupAccumulator {
    label: Value,
    sum: f64,
    rows_seen: usize,
    numeric_seen: usize,
}

fn reduce_groups(rows: &[Row], group_column: &str, value_column: &str, reduce: Reduce) -> Vec<Row> {
    let mut groups: IndexMap<String, GroupAccumulator> = IndexMap::new();
    for row in rows {
        let label = row.get(group_column).cloned().unwrap_or(Value::Null);
        let coerced = row.get(value_column).and_then(coerce_number);
        let entry = groups
            .entry(group_key(&label))
            .or_insert_with(|| GroupAccumulator {
                label,
                sum: 0.0,
                rows_seen: 0,
                numeric_seen: 0,
            });
        entry.sum += coerced.unwrap_or(0.0);
        entry.rows_seen += 1;
        if coerced.is_some() {
            entry.numeric_seen += 1;
        }
    }

    groups
        .into_values()
        .map(|group| {
            let value = match reduce {
                Reduce::Sum => group.sum,
                Reduce::Average => {
                    let denominator = if AVERAGE_DENOMINATOR_COUNTS_NULLS {
                        group.rows_seen
                    } else {
                        group.numeric_seen
                    };
                    if denominator == 0 {
                        0.0
                    } else {
                        group.sum / denominator as f64
                    }
                }
            };
            let mut out = Row::new();
            out.insert(group_column.to_string(), group.label);
            out.insert(value_column.to_string(), Value::from(value));
            out
        })
        .collect()
}

// IndexMap keys must hash; raw JSON values do not, so group identity is
// their label rendering. The original value is kept for output.
fn group_key(label: &Value) -> String {
    match label {
        Value::Null => String::from("\u{0}null"),
        other => display_string(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tq_core::Row;

    fn row(pairs: &[(&str, Value)]) -> Row {
        let mut row = Row::new();
        for (name, value) in pairs {
            row.insert(name.to_string(), value.clone());
        }
        row
    }

    fn plan(kind: AggregationKind, columns: &[&str]) -> QueryPlan {
        QueryPlan {
            intent: String::new(),
            needed_columns: columns.iter().map(|c| c.to_string()).collect(),
            aggregation: kind,
            wants_visualization: true,
        }
    }

    fn sales_rows() -> Vec<Row> {
        vec![
            row(&[("Product", json!("A")), ("Revenue", json!(100))]),
            row(&[("Product", json!("B")), ("Revenue", json!(300))]),
            row(&[("Product", json!("A")), ("Revenue", json!(50))]),
        ]
    }

    #[test]
    fn test_sum_groups_and_totals() {
        let outcome = aggregate(&sales_rows(), &plan(AggregationKind::Sum, &["Product", "Revenue"]));
        let AggregationOutcome::Aggregated(rows) = outcome else {
            panic!("expected aggregation");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Product"], json!("A"));
        assert_eq!(rows[0]["Revenue"], json!(150.0));
        assert_eq!(rows[1]["Product"], json!("B"));
        assert_eq!(rows[1]["Revenue"], json!(300.0));
    }

    #[test]
    fn test_groupby_matches_sum() {
        let sum = aggregate(&sales_rows(), &plan(AggregationKind::Sum, &["Product", "Revenue"]));
        let grouped = aggregate(
            &sales_rows(),
            &plan(AggregationKind::GroupBy, &["Product", "Revenue"]),
        );
        assert_eq!(sum, grouped);
    }

    #[test]
    fn test_first_seen_group_order() {
        let rows: Vec<Row> = ["B", "A", "B", "C", "A"]
            .iter()
            .map(|g| row(&[("Group", json!(*g)), ("N", json!(1))]))
            .collect();
        let outcome = aggregate(&rows, &plan(AggregationKind::Sum, &["Group", "N"]));
        let order: Vec<String> = outcome
            .rows()
            .iter()
            .map(|r| r["Group"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_count_emits_count_column() {
        let outcome = aggregate(&sales_rows(), &plan(AggregationKind::Count, &["Product"]));
        let rows = outcome.rows();
        assert_eq!(rows[0]["Product"], json!("A"));
        assert_eq!(rows[0][COUNT_COLUMN], json!(2));
        assert_eq!(rows[1][COUNT_COLUMN], json!(1));
    }

    #[test]
    fn test_average_counts_null_rows_in_denominator() {
        let rows = vec![
            row(&[("Team", json!("x")), ("Score", json!(10))]),
            row(&[("Team", json!("x")), ("Score", Value::Null)]),
        ];
        let outcome = aggregate(&rows, &plan(AggregationKind::Average, &["Team", "Score"]));
        // Null coerces to 0 but still counts: (10 + 0) / 2.
        assert_eq!(outcome.rows()[0]["Score"], json!(5.0));
    }

    #[test]
    fn test_currency_strings_coerce() {
        let rows = vec![
            row(&[("Region", json!("West")), ("Sales", json!("$1,000"))]),
            row(&[("Region", json!("West")), ("Sales", json!("not a number"))]),
        ];
        let outcome = aggregate(&rows, &plan(AggregationKind::Sum, &["Region", "Sales"]));
        assert_eq!(outcome.rows()[0]["Sales"], json!(1000.0));
    }

    #[test]
    fn test_none_passes_through() {
        let outcome = aggregate(&sales_rows(), &plan(AggregationKind::None, &[]));
        assert_eq!(
            outcome,
            AggregationOutcome::PassThrough {
                rows: sales_rows(),
                reason: PassThroughReason::NotRequested,
            }
        );
    }

    #[test]
    fn test_underspecified_plan_degrades() {
        let outcome = aggregate(&sales_rows(), &plan(AggregationKind::Sum, &["Product"]));
        let AggregationOutcome::PassThrough { rows, reason } = outcome else {
            panic!("expected pass-through");
        };
        assert_eq!(reason, PassThroughReason::MissingColumns);
        assert_eq!(rows, sales_rows());
    }
}
