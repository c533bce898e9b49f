//! Claude CLI spawning.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::error::{GenerationError, PreconditionError};

/// Name of the Claude Code CLI executable.
pub const CLAUDE_BIN: &str = "claude";

/// How to invoke the Claude CLI.
#[derive(Debug, Clone)]
pub struct ClaudeOptions {
    pub program: PathBuf,
    /// Passed as `--model`; a small model keeps startup and latency down.
    pub model: Option<String>,
    pub timeout: Duration,
}

impl Default for ClaudeOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from(CLAUDE_BIN),
            model: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Check if Claude Code CLI is installed and accessible.
///
/// Uses the `which` crate for cross-platform executable detection, then
/// verifies the binary actually runs.
pub async fn check_claude_installed(options: &ClaudeOptions) -> Result<(), PreconditionError> {
    if which::which(&options.program).is_err() {
        return Err(PreconditionError::GeneratorNotInstalled);
    }

    let version_check = Command::new(&options.program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|_| PreconditionError::GeneratorNotInstalled)?;

    if !version_check.status.success() {
        return Err(PreconditionError::GeneratorNotInstalled);
    }

    Ok(())
}

/// Run Claude CLI with a prompt and return its raw stdout.
///
/// Uses print mode (`-p`) with `--output-format json`. A missing binary or
/// an expired timeout is [`GenerationError::Unavailable`]; a non-zero exit is
/// [`GenerationError::Rejected`] carrying whatever the CLI reported.
pub async fn run_claude(prompt: &str, options: &ClaudeOptions) -> Result<String, GenerationError> {
    let mut command = Command::new(&options.program);
    command
        .arg("-p")
        .arg(prompt)
        .arg("--output-format")
        .arg("json");
    if let Some(model) = &options.model {
        command.arg("--model").arg(model);
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(
        "Running {} with a {} char prompt",
        options.program.display(),
        prompt.len()
    );

    let output = timeout(options.timeout, command.output())
        .await
        .map_err(|_| {
            GenerationError::Unavailable(format!(
                "timed out after {} seconds",
                options.timeout.as_secs()
            ))
        })?
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => GenerationError::Unavailable(format!(
                "{} not found on PATH",
                options.program.display()
            )),
            _ => GenerationError::Unavailable(format!("failed to start: {e}")),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        // The CLI reports some failures (e.g. auth) on stdout.
        let detail = if stderr.is_empty() {
            stdout.trim().to_string()
        } else {
            stderr
        };
        return Err(GenerationError::Rejected(format!(
            "exited with code {code}: {detail}"
        )));
    }

    Ok(stdout)
}
