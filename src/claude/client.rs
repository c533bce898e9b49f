//! Text generation through the Claude CLI.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{GenerationError, PreconditionError};

use super::subprocess::{ClaudeOptions, check_claude_installed, run_claude};

/// Maps a request text to a draft commit message.
///
/// One call per attempt; retries are left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Fails when the backend cannot be reached at all.
    async fn ensure_available(&self) -> Result<(), PreconditionError>;

    async fn generate(&self, request: &str) -> Result<String, GenerationError>;
}

/// [`Generator`] that shells out to the Claude Code CLI.
#[derive(Debug, Clone, Default)]
pub struct ClaudeGenerator {
    options: ClaudeOptions,
}

impl ClaudeGenerator {
    pub fn new(options: ClaudeOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Generator for ClaudeGenerator {
    async fn ensure_available(&self) -> Result<(), PreconditionError> {
        check_claude_installed(&self.options).await
    }

    async fn generate(&self, request: &str) -> Result<String, GenerationError> {
        let response = run_claude(request, &self.options).await?;
        parse_claude_response(&response)
    }
}

/// Claude CLI JSON envelope when using --output-format json
#[derive(Deserialize)]
struct ClaudeCliResponse {
    #[serde(default)]
    result: String,
    #[serde(default)]
    is_error: bool,
    #[serde(default)]
    subtype: Option<String>,
}

/// Unwrap the CLI envelope and clean up the message text.
///
/// Falls back to treating the whole response as the message when it is not
/// an envelope. Blank output after trimming is [`GenerationError::Empty`].
pub fn parse_claude_response(response: &str) -> Result<String, GenerationError> {
    let content = match serde_json::from_str::<ClaudeCliResponse>(response) {
        Ok(envelope) => {
            let failed_subtype = envelope
                .subtype
                .as_deref()
                .filter(|s| s.starts_with("error"));
            if envelope.is_error || failed_subtype.is_some() {
                let reason = if envelope.result.trim().is_empty() {
                    failed_subtype.unwrap_or("unknown error").to_string()
                } else {
                    envelope.result
                };
                return Err(GenerationError::Rejected(reason));
            }
            envelope.result
        }
        Err(_) => {
            debug!("Response is not a CLI envelope, using it verbatim");
            response.to_string()
        }
    };

    let message = strip_code_fence(content.trim()).trim();
    if message.is_empty() {
        return Err(GenerationError::Empty);
    }

    Ok(message.to_string())
}

/// Remove a markdown fence wrapped around the whole message.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some((_, body)) = rest.split_once('\n') else {
        // Single line: ```fix: typo```
        return rest.strip_suffix("```").unwrap_or(rest);
    };
    // Drop the info string (e.g. ```text) along with the opening fence line.
    body.trim_end().strip_suffix("```").unwrap_or(body)
}
