//! End-to-end question answering over an ingested table

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use tq_charts::{generate_spec, select_visualization, ChartSpec};
use tq_core::{QueryPlan, Row, Table, TextCompleter};
use tq_data::aggregate;
use tq_plan::{PlanningError, QueryPlanner, PREVIEW_ROWS};

/// The full answer to one question: the validated plan, the (possibly
/// reduced) result rows, and a chart when the plan asked for one.
#[derive(Debug, Serialize)]
pub struct Answer {
    pub plan: QueryPlan,
    /// Whether the rows below are an aggregation or a pass-through.
    pub aggregated: bool,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSpec>,
}

/// Wires planner, aggregation, selection, and spec generation together.
///
/// Each call works on immutable snapshots; concurrent questions against
/// the same table are independent.
pub struct Pipeline {
    planner: QueryPlanner,
}

impl Pipeline {
    pub fn new(completer: Arc<dyn TextCompleter>) -> Self {
        Self {
            planner: QueryPlanner::new(completer),
        }
    }

    pub async fn answer(&self, table: &Table, question: &str) -> Result<Answer, PlanningError> {
        let plan = self
            .planner
            .plan(question, &table.schema, table.preview(PREVIEW_ROWS))
            .await?;

        let outcome = aggregate(&table.rows, &plan);
        let aggregated = outcome.is_aggregated();
        let rows = outcome.into_rows();

        let chart = select_visualization(&plan, &table.schema, rows.len())
            .map(|selection| generate_spec(selection.kind, &rows, &selection.mapping));

        info!(
            table = %table.name,
            aggregated,
            result_rows = rows.len(),
            chart_kind = ?chart.as_ref().map(|c| c.kind),
            "answered question"
        );

        Ok(Answer {
            plan,
            aggregated,
            rows,
            chart,
        })
    }
}
