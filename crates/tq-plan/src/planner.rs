//! Plan production around the external completion service

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use tq_core::{CompletionError, QueryPlan, Row, Schema, TextCompleter};

use crate::parse::parse_plan;
use crate::prompt::build_prompt;
use crate::PlanningError;

/// Maximum completion attempts per question.
const MAX_ATTEMPTS: u32 = 3;

/// First retry delay; doubles on each subsequent attempt.
const BASE_BACKOFF: Duration = Duration::from_millis(500);

/// Produces validated query plans for user questions.
///
/// Transient completion failures (rate limit, unavailable) are retried
/// with exponential backoff; parse and validation failures are not -
/// a malformed plan is a [`PlanningError`], never something to guess
/// around.
pub struct QueryPlanner {
    completer: Arc<dyn TextCompleter>,
    base_backoff: Duration,
}

impl QueryPlanner {
    pub fn new(completer: Arc<dyn TextCompleter>) -> Self {
        Self {
            completer,
            base_backoff: BASE_BACKOFF,
        }
    }

    /// Override the retry base delay (tests use a near-zero delay).
    pub fn with_base_backoff(mut self, delay: Duration) -> Self {
        self.base_backoff = delay;
        self
    }

    /// Plan one question against one table's schema.
    pub async fn plan(
        &self,
        question: &str,
        schema: &Schema,
        preview: &[Row],
    ) -> Result<QueryPlan, PlanningError> {
        let prompt = build_prompt(question, schema, preview);
        let response = self.complete_with_retry(&prompt).await?;

        let (plan, hint) = parse_plan(&response)?;
        if let Some(hint) = hint {
            // Advisory only; chart choice is the selector's, not the model's.
            debug!(%hint, "completion service suggested a visualization, ignoring");
        }

        let unknown = plan.unknown_columns(schema);
        if !unknown.is_empty() {
            return Err(PlanningError::UnknownColumns(unknown));
        }

        debug!(
            aggregation = plan.aggregation.as_str(),
            columns = ?plan.needed_columns,
            wants_visualization = plan.wants_visualization,
            "planned question"
        );
        Ok(plan)
    }

    async fn complete_with_retry(&self, prompt: &str) -> Result<String, CompletionError> {
        let mut delay = self.base_backoff;
        let mut attempt = 1;
        loop {
            match self.completer.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                    warn!(attempt, error = %err, "transient completion failure, retrying");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use tq_core::{AggregationKind, Column, ColumnType};

    /// Replays a scripted sequence of results, one per call.
    struct SequenceCompleter {
        responses: Mutex<Vec<Result<String, CompletionError>>>,
        calls: Mutex<u32>,
    }

    impl SequenceCompleter {
        fn new(responses: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl TextCompleter for SequenceCompleter {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            *self.calls.lock() += 1;
            self.responses.lock().remove(0)
        }
    }

    fn schema() -> Schema {
        Schema {
            columns: vec![
                Column {
                    name: "Region".to_string(),
                    column_type: ColumnType::String,
                    sample_values: vec![json!("West")],
                },
                Column {
                    name: "Revenue".to_string(),
                    column_type: ColumnType::Number,
                    sample_values: vec![json!(100)],
                },
            ],
            row_count: 10,
        }
    }

    fn planner(completer: Arc<SequenceCompleter>) -> QueryPlanner {
        QueryPlanner::new(completer).with_base_backoff(Duration::from_millis(1))
    }

    const GOOD_PLAN: &str =
        r#"{"intent":"x","neededColumns":["Region","Revenue"],"aggregation":"sum","wantsVisualization":true}"#;

    #[tokio::test]
    async fn test_plan_happy_path() {
        let completer = Arc::new(SequenceCompleter::new(vec![Ok(GOOD_PLAN.to_string())]));
        let plan = planner(completer.clone())
            .plan("revenue by region", &schema(), &[])
            .await
            .unwrap();
        assert_eq!(plan.aggregation, AggregationKind::Sum);
        assert_eq!(completer.calls(), 1);
    }

    #[tokio::test]
    async fn test_transient_failures_retried() {
        let completer = Arc::new(SequenceCompleter::new(vec![
            Err(CompletionError::RateLimited),
            Err(CompletionError::Unavailable("503".to_string())),
            Ok(GOOD_PLAN.to_string()),
        ]));
        let plan = planner(completer.clone())
            .plan("revenue by region", &schema(), &[])
            .await
            .unwrap();
        assert_eq!(plan.needed_columns, vec!["Region", "Revenue"]);
        assert_eq!(completer.calls(), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let completer = Arc::new(SequenceCompleter::new(vec![
            Err(CompletionError::RateLimited),
            Err(CompletionError::RateLimited),
            Err(CompletionError::RateLimited),
        ]));
        let err = planner(completer.clone())
            .plan("q", &schema(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PlanningError::Completion(_)));
        assert_eq!(completer.calls(), 3);
    }

    #[tokio::test]
    async fn test_non_transient_failure_not_retried() {
        let completer = Arc::new(SequenceCompleter::new(vec![Err(CompletionError::Timeout)]));
        let err = planner(completer.clone())
            .plan("q", &schema(), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlanningError::Completion(CompletionError::Timeout)
        ));
        assert_eq!(completer.calls(), 1);
    }

    #[tokio::test]
    async fn test_parse_failure_not_retried() {
        let completer = Arc::new(SequenceCompleter::new(vec![Ok("not json".to_string())]));
        let err = planner(completer.clone())
            .plan("q", &schema(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PlanningError::MalformedResponse(_)));
        assert_eq!(completer.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_column_rejected() {
        let response =
            r#"{"neededColumns":["Profit"],"aggregation":"count","wantsVisualization":true}"#;
        let completer = Arc::new(SequenceCompleter::new(vec![Ok(response.to_string())]));
        let err = planner(completer)
            .plan("q", &schema(), &[])
            .await
            .unwrap_err();
        let PlanningError::UnknownColumns(columns) = err else {
            panic!("expected unknown-columns error");
        };
        assert_eq!(columns, vec!["Profit"]);
    }
}
