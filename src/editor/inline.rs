//! Edit a draft on a single prompt line.
//!
//! Newlines are shown as a literal `\n` so the whole message fits on one
//! line; they are turned back into real newlines on submit. Backslashes are
//! doubled so a `\n` already in the message survives the round trip.

use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;

use crate::error::EditorError;

use super::EditorBridge;

/// Line-prompt backend for terminals without a usable editor.
#[derive(Debug, Clone)]
pub struct InlineEditor {
    prompt: String,
}

impl InlineEditor {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl EditorBridge for InlineEditor {
    fn edit(&self, initial: &str) -> Result<Option<String>, EditorError> {
        let line: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(&self.prompt)
            .with_initial_text(encode_newlines(initial))
            .allow_empty(true)
            .interact_text()?;

        Ok(decode_edit(&line, initial))
    }
}

/// Render a multi-line message on one line.
pub fn encode_newlines(message: &str) -> String {
    message.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Inverse of [`encode_newlines`]. A backslash before anything other than
/// `n` or `\` is kept as typed.
fn decode_newlines(line: &str) -> String {
    let mut decoded = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => {
                chars.next();
                decoded.push('\n');
            }
            Some('\\') => {
                chars.next();
                decoded.push('\\');
            }
            _ => decoded.push('\\'),
        }
    }
    decoded
}

/// Turn an edited line back into a message.
///
/// `None` when the result is blank or identical to the draft.
pub fn decode_edit(line: &str, initial: &str) -> Option<String> {
    let message = decode_newlines(line);
    let trimmed = message.trim();
    if trimmed.is_empty() || trimmed == initial.trim() {
        return None;
    }
    Some(trimmed.to_string())
}
