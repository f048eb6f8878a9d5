//! The external text-completion capability
//!
//! The planner never talks to a concrete LLM API; it takes anything
//! implementing [`TextCompleter`]. Tests inject canned responses, the
//! demo binary injects a scripted one, and a real deployment wires in an
//! HTTP client.

use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of the completion transport.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service rate limited the request")]
    RateLimited,

    #[error("completion service unavailable: {0}")]
    Unavailable(String),

    #[error("completion request timed out")]
    Timeout,

    #[error("completion request failed: {0}")]
    Other(String),
}

impl CompletionError {
    /// Whether a retry has any chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CompletionError::RateLimited | CompletionError::Unavailable(_)
        )
    }
}

/// Abstract text-completion service: arbitrary prompt in, unstructured
/// text out. Treated as unreliable by every caller.
#[async_trait]
pub trait TextCompleter: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
