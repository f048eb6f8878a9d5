//! Natural-language query planning
//!
//! Turns a user question into a validated [`tq_core::QueryPlan`] by way
//! of an external text-completion service. This crate owns the prompt,
//! the retry policy, and the response validation; the completion call
//! itself stays behind [`tq_core::TextCompleter`].

pub mod parse;
pub mod planner;
pub mod prompt;

use thiserror::Error;
use tq_core::CompletionError;

// Re-exports
pub use parse::parse_plan;
pub use planner::QueryPlanner;
pub use prompt::{build_prompt, PREVIEW_ROWS};

/// Why a question could not be turned into a plan.
#[derive(Error, Debug)]
pub enum PlanningError {
    /// The completion response was not parseable JSON.
    #[error("completion response is not valid JSON: {0}")]
    MalformedResponse(String),

    /// The parsed object violates the plan shape.
    #[error("invalid query plan: {0}")]
    InvalidPlan(String),

    /// The plan referenced columns the schema does not have.
    #[error("plan references unknown columns: {0:?}")]
    UnknownColumns(Vec<String>),

    /// The completion call itself failed, retries included.
    #[error("completion service failed: {0}")]
    Completion(#[from] CompletionError),
}
