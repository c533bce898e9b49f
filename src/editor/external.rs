//! Edit a draft in the user's configured editor.

use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, SystemTime};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::EditorError;

use super::EditorBridge;

#[cfg(windows)]
const DEFAULT_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const DEFAULT_EDITOR: &str = "vi";

/// Editor launched as a child process with the terminal handed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    program: String,
    args: Vec<String>,
}

impl ExternalEditor {
    /// Parse an editor command such as `code --wait`.
    pub fn new(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next().unwrap_or_else(|| DEFAULT_EDITOR.to_string());
        Self {
            program,
            args: parts.collect(),
        }
    }

    /// Editor from `VISUAL`, then `EDITOR`, then the platform default.
    pub fn from_env() -> Self {
        Self::new(&resolve_editor_command(
            env::var("VISUAL").ok(),
            env::var("EDITOR").ok(),
        ))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn display_name(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Pick the editor command from the environment values.
pub fn resolve_editor_command(visual: Option<String>, editor: Option<String>) -> String {
    visual
        .filter(|v| !v.trim().is_empty())
        .or_else(|| editor.filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

impl EditorBridge for ExternalEditor {
    /// The buffer is a temporary file that is removed on every exit path,
    /// including an editor crash. An edit counts only when the file's
    /// modification time moved forward and the trimmed content is non-empty.
    fn edit(&self, initial: &str) -> Result<Option<String>, EditorError> {
        let mut buffer = tempfile::Builder::new()
            .prefix("gitscribe-edit-")
            .suffix(".txt")
            .tempfile()
            .map_err(EditorError::Buffer)?;

        buffer
            .write_all(initial.as_bytes())
            .and_then(|()| buffer.flush())
            .map_err(EditorError::Buffer)?;

        // Backdate the buffer so a save within the filesystem's timestamp
        // resolution still registers as newer.
        let backdated = SystemTime::now()
            .checked_sub(Duration::from_secs(2))
            .unwrap_or(SystemTime::UNIX_EPOCH);
        buffer
            .as_file()
            .set_modified(backdated)
            .map_err(EditorError::Buffer)?;

        let before = modified_at(buffer.path()).map_err(EditorError::Buffer)?;

        debug!("Launching editor {} on {}", self.display_name(), buffer.path().display());
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(buffer.path())
            .status()
            .map_err(|source| EditorError::Launch {
                editor: self.display_name(),
                source,
            })?;

        if !status.success() {
            return Err(EditorError::Exited {
                editor: self.display_name(),
                code: status.code(),
            });
        }

        read_if_edited(&buffer, before)
    }
}

fn read_if_edited(buffer: &NamedTempFile, before: SystemTime) -> Result<Option<String>, EditorError> {
    // Editors that save via rename leave a new file at the same path, so
    // everything below goes through the path rather than the open handle.
    let after = modified_at(buffer.path()).map_err(EditorError::Read)?;
    if after <= before {
        debug!("Editor buffer untouched");
        return Ok(None);
    }

    let content = fs::read_to_string(buffer.path()).map_err(EditorError::Read)?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        debug!("Editor buffer emptied");
        return Ok(None);
    }

    Ok(Some(trimmed.to_string()))
}

fn modified_at(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}
