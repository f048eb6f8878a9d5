//! Scripted completer for offline demo runs

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tq_core::{CompletionError, TextCompleter};

/// Replays a response captured from a real completion service, so the
/// whole pipeline runs without network access. The prompt still gets
/// built and logged, which is enough to inspect what a live service
/// would have been asked.
pub struct ScriptedCompleter {
    response: String,
}

impl ScriptedCompleter {
    pub fn from_file(path: &Path) -> Result<Self> {
        let response = std::fs::read_to_string(path)
            .with_context(|| format!("reading scripted response from {}", path.display()))?;
        Ok(Self { response })
    }
}

#[async_trait]
impl TextCompleter for ScriptedCompleter {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        tracing::debug!(prompt_len = prompt.len(), "serving scripted completion");
        Ok(self.response.clone())
    }
}
