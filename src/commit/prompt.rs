//! Prompt construction for AI-generated commit messages.

use chrono::{DateTime, Local};

/// Rendered in place of an intent the user did not give.
///
/// An empty intent renders as an empty section instead, so the generator can
/// tell "no answer" apart from "answered with nothing".
pub const NO_INTENT_PLACEHOLDER: &str = "(none provided)";

/// Rendered when the repository has no commits to sample.
pub const NO_HISTORY_PLACEHOLDER: &str = "(no previous commits)";

/// The five inputs of one generation attempt.
///
/// [`GenerationRequest::render`] depends on these fields only. `created_at`
/// marks when the attempt was assembled and is used for logging.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub style_directive: String,
    pub history: Vec<String>,
    pub intent: Option<String>,
    pub diff: String,
    pub format_rules: Vec<String>,
    pub created_at: DateTime<Local>,
}

impl GenerationRequest {
    /// Assemble the request text, sections in fixed order.
    pub fn render(&self) -> String {
        let history = if self.history.is_empty() {
            NO_HISTORY_PLACEHOLDER.to_string()
        } else {
            bullet_list(&self.history)
        };

        let intent = self.intent.as_deref().unwrap_or(NO_INTENT_PLACEHOLDER);

        format!(
            "{directive}\n\
             \n\
             ## Recent commit subjects\n\
             {history}\n\
             \n\
             ## Developer intent\n\
             {intent}\n\
             \n\
             ## Staged diff\n\
             {diff}\n\
             \n\
             ## Output rules\n\
             {rules}\n",
            directive = self.style_directive,
            diff = self.diff,
            rules = bullet_list(&self.format_rules),
        )
    }
}

/// Build a fresh request for one generation attempt.
pub fn build_request(
    style_directive: &str,
    history: &[String],
    intent: Option<&str>,
    budgeted_diff: &str,
    format_rules: &[&str],
) -> GenerationRequest {
    GenerationRequest {
        style_directive: style_directive.to_string(),
        history: history.to_vec(),
        intent: intent.map(String::from),
        diff: budgeted_diff.to_string(),
        format_rules: format_rules.iter().map(|r| r.to_string()).collect(),
        created_at: Local::now(),
    }
}

fn bullet_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
