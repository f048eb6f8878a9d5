//! Deterministic chart selection
//!
//! The chart kind is decided by a fixed rule table over the plan and the
//! inferred schema - never by the completion service. Repeated calls
//! with identical input always pick the same chart.

use serde::{Deserialize, Serialize};
use tq_core::{AggregationKind, ColumnType, QueryPlan, Schema};

/// Raw results longer than this render as a table instead of a bar chart.
const BAR_ROW_LIMIT: usize = 5;

/// Fallback value-column name when the plan names only one column.
const DEFAULT_VALUE_FIELD: &str = "value";

/// Column the aggregation engine synthesizes for count output.
const COUNT_FIELD: &str = "count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Scatter,
    Table,
}

/// Binding from a chart's visual slots to source column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FieldMapping {
    /// Category charts: bar and pie.
    NameValue {
        name_field: String,
        value_field: String,
    },
    /// Axis charts: line and scatter.
    Axes { x_axis: String, y_axis: String },
    /// Tables pass fields through untouched.
    PassThrough,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSelection {
    pub kind: ChartKind,
    pub mapping: FieldMapping,
}

/// Pick a chart for an answered question.
///
/// Returns `None` when the plan opted out of visualization; that check
/// comes before any table lookup. `result_row_count` is the size of the
/// result after aggregation (or pass-through), which decides bar vs
/// table for unaggregated data.
pub fn select_visualization(
    plan: &QueryPlan,
    schema: &Schema,
    result_row_count: usize,
) -> Option<ChartSelection> {
    if !plan.wants_visualization {
        return None;
    }

    let mut kind = match plan.aggregation {
        AggregationKind::Sum
        | AggregationKind::GroupBy
        | AggregationKind::Count
        | AggregationKind::Average => ChartKind::Bar,
        AggregationKind::None => {
            if result_row_count > BAR_ROW_LIMIT {
                ChartKind::Table
            } else {
                ChartKind::Bar
            }
        }
    };

    // A date column along the category axis reads better as a line.
    if kind == ChartKind::Bar && has_date_column(plan, schema) {
        kind = ChartKind::Line;
    }

    let mapping = mapping_for(kind, plan);
    tracing::debug!(kind = ?kind, mapping = ?mapping, "selected visualization");
    Some(ChartSelection { kind, mapping })
}

fn has_date_column(plan: &QueryPlan, schema: &Schema) -> bool {
    plan.needed_columns
        .iter()
        .any(|name| schema.column_type(name) == Some(ColumnType::Date))
}

fn mapping_for(kind: ChartKind, plan: &QueryPlan) -> FieldMapping {
    let first = plan
        .needed_columns
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_VALUE_FIELD.to_string());
    let second = plan
        .needed_columns
        .get(1)
        .cloned()
        .unwrap_or_else(|| match plan.aggregation {
            // Count output carries its total in the synthesized column.
            AggregationKind::Count => COUNT_FIELD.to_string(),
            _ => DEFAULT_VALUE_FIELD.to_string(),
        });

    match kind {
        ChartKind::Bar | ChartKind::Pie => FieldMapping::NameValue {
            name_field: first,
            value_field: second,
        },
        ChartKind::Line | ChartKind::Scatter => FieldMapping::Axes {
            x_axis: first,
            y_axis: second,
        },
        ChartKind::Table => FieldMapping::PassThrough,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tq_core::Column;

    fn schema(columns: &[(&str, ColumnType)]) -> Schema {
        Schema {
            columns: columns
                .iter()
                .map(|(name, column_type)| Column {
                    name: name.to_string(),
                    column_type: *column_type,
                    sample_values: vec![json!("x")],
                })
                .collect(),
            row_count: 100,
        }
    }

    fn plan(kind: AggregationKind, columns: &[&str], wants_visualization: bool) -> QueryPlan {
        QueryPlan {
            intent: String::new(),
            needed_columns: columns.iter().map(|c| c.to_string()).collect(),
            aggregation: kind,
            wants_visualization,
        }
    }

    #[test]
    fn test_groupby_is_bar_with_name_value_mapping() {
        let schema = schema(&[("Region", ColumnType::String), ("Revenue", ColumnType::Number)]);
        let plan = plan(AggregationKind::GroupBy, &["Region", "Revenue"], true);

        let selection = select_visualization(&plan, &schema, 4).unwrap();
        assert_eq!(selection.kind, ChartKind::Bar);
        assert_eq!(
            selection.mapping,
            FieldMapping::NameValue {
                name_field: "Region".to_string(),
                value_field: "Revenue".to_string(),
            }
        );

        // Same input, same output.
        assert_eq!(select_visualization(&plan, &schema, 4), Some(selection));
    }

    #[test]
    fn test_opt_out_skips_selection() {
        let schema = schema(&[("Region", ColumnType::String)]);
        let plan = plan(AggregationKind::Count, &["Region"], false);
        assert_eq!(select_visualization(&plan, &schema, 4), None);
    }

    #[test]
    fn test_unaggregated_size_split() {
        let schema = schema(&[("Name", ColumnType::String)]);
        let plan = plan(AggregationKind::None, &["Name"], true);

        assert_eq!(
            select_visualization(&plan, &schema, 5).unwrap().kind,
            ChartKind::Bar
        );
        assert_eq!(
            select_visualization(&plan, &schema, 6).unwrap().kind,
            ChartKind::Table
        );
    }

    #[test]
    fn test_date_column_overrides_to_line() {
        let schema = schema(&[("Month", ColumnType::Date), ("Sales", ColumnType::Number)]);
        let plan = plan(AggregationKind::Sum, &["Month", "Sales"], true);

        let selection = select_visualization(&plan, &schema, 12).unwrap();
        assert_eq!(selection.kind, ChartKind::Line);
        assert_eq!(
            selection.mapping,
            FieldMapping::Axes {
                x_axis: "Month".to_string(),
                y_axis: "Sales".to_string(),
            }
        );
    }

    #[test]
    fn test_count_maps_value_to_count_column() {
        let schema = schema(&[("City", ColumnType::String)]);
        let plan = plan(AggregationKind::Count, &["City"], true);

        let selection = select_visualization(&plan, &schema, 3).unwrap();
        assert_eq!(
            selection.mapping,
            FieldMapping::NameValue {
                name_field: "City".to_string(),
                value_field: "count".to_string(),
            }
        );
    }
}
