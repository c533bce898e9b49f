//! Letting the user rewrite a draft.
//!
//! Two interchangeable backends implement [`EditorBridge`]: [`ExternalEditor`]
//! hands the draft to `$VISUAL` / `$EDITOR`, [`InlineEditor`] edits it on a
//! single prompt line. [`editor_for`] picks one from the configured mode.

pub mod external;
pub mod inline;

use crate::config::EditMode;
use crate::error::EditorError;
use crate::locale::Messages;

pub use external::ExternalEditor;
pub use inline::InlineEditor;

/// Capture an edited version of a draft.
#[cfg_attr(test, mockall::automock)]
pub trait EditorBridge: Send + Sync {
    /// Returns the new message, or `None` when the user made no real edit
    /// (nothing saved, or the result is blank).
    fn edit(&self, initial: &str) -> Result<Option<String>, EditorError>;
}

/// Build the editor backend for an edit mode.
pub fn editor_for(mode: EditMode, messages: &Messages) -> Box<dyn EditorBridge> {
    match mode {
        EditMode::External => Box::new(ExternalEditor::from_env()),
        EditMode::Inline => Box::new(InlineEditor::new(messages.edit_prompt)),
    }
}
