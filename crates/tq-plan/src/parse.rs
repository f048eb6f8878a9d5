//! Completion response parsing and validation

use serde_json::Value;
use tq_core::{AggregationKind, QueryPlan};

use crate::PlanningError;

/// Parse a completion response into a plan.
///
/// Accepts the JSON object bare or wrapped in a Markdown code fence.
/// Unknown extra fields are ignored; a `visualization` field, if the
/// model volunteered one, comes back separately so the caller can log it
/// as an advisory hint - it never binds the chart decision.
pub fn parse_plan(response: &str) -> Result<(QueryPlan, Option<Value>), PlanningError> {
    let body = strip_code_fences(response);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| PlanningError::MalformedResponse(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| PlanningError::InvalidPlan("response is not a JSON object".to_string()))?;

    let intent = match object.get("intent") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(PlanningError::InvalidPlan(format!(
                "intent must be a string, got {other}"
            )))
        }
    };

    let needed_columns = match object.get("neededColumns") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    PlanningError::InvalidPlan(format!(
                        "neededColumns entry {item} is not a string"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(PlanningError::InvalidPlan(format!(
                "neededColumns must be an array, got {other}"
            )))
        }
    };

    let aggregation = match object.get("aggregation") {
        None | Some(Value::Null) => AggregationKind::None,
        Some(Value::String(token)) => AggregationKind::parse_token(token).ok_or_else(|| {
            PlanningError::InvalidPlan(format!("unknown aggregation kind '{token}'"))
        })?,
        Some(other) => {
            return Err(PlanningError::InvalidPlan(format!(
                "aggregation must be a string, got {other}"
            )))
        }
    };

    let wants_visualization = match object.get("wantsVisualization") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            return Err(PlanningError::InvalidPlan(format!(
                "wantsVisualization must be a boolean, got {other}"
            )))
        }
    };

    let hint = object.get("visualization").cloned();

    Ok((
        QueryPlan {
            intent,
            needed_columns,
            aggregation,
            wants_visualization,
        },
        hint,
    ))
}

/// Strip a Markdown code fence (with or without a language tag) from
/// around the response body.
fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line, then the closing fence.
    let rest = match rest.split_once('\n') {
        Some((_tag, body)) => body,
        None => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
