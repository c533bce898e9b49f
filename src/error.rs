//! Error types for gitscribe modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
///
/// `NotARepository` and `NoUpstream` are kept apart from the generic
/// failures because callers branch on them.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository. Run gitscribe from within a git repository.")]
    NotARepository,

    #[error("Branch '{branch}' has no upstream configured")]
    NoUpstream { branch: String },

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Failed to run git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] git2::Error),
}

/// Errors from the text generation backend.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Claude Code CLI is not reachable: {0}")]
    Unavailable(String),

    #[error("Claude Code CLI reported an error: {0}")]
    Rejected(String),

    #[error("Claude Code CLI returned an empty message")]
    Empty,
}

impl GenerationError {
    /// Actionable hint shown next to the error.
    pub fn guidance(&self) -> &'static str {
        match self {
            GenerationError::Unavailable(_) => {
                "Check that `claude` is installed and on PATH, and that you are online. \
                 Install with: npm install -g @anthropic-ai/claude-code"
            }
            GenerationError::Rejected(reason) if looks_like_auth_failure(reason) => {
                "Run `claude` once interactively and log in, then try again."
            }
            GenerationError::Rejected(_) => {
                "Check your network connection and Claude account status, then try again."
            }
            GenerationError::Empty => "Try again, or add more context about the change.",
        }
    }

    /// Whether this failure looks like missing or expired credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, GenerationError::Rejected(reason) if looks_like_auth_failure(reason))
    }
}

fn looks_like_auth_failure(text: &str) -> bool {
    let lower = text.to_lowercase();
    ["login", "log in", "api key", "authenticat", "unauthorized", "401"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Errors from handing a draft to an editor.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to prepare the edit buffer: {0}")]
    Buffer(#[source] std::io::Error),

    #[error("Failed to launch editor '{editor}': {source}")]
    Launch {
        editor: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Editor '{editor}' exited with {}", code.map_or("a signal".to_string(), |c| format!("code {c}")))]
    Exited { editor: String, code: Option<i32> },

    #[error("Failed to read the edited message: {0}")]
    Read(#[source] std::io::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Errors from creating the commit.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to write commit message file: {0}")]
    MessageFile(#[source] std::io::Error),

    #[error("Failed to create commit: {0}")]
    Git(#[from] GitError),
}

/// Conditions that stop the run before anything is staged.
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("Claude Code CLI not found. Install with: npm install -g @anthropic-ai/claude-code")]
    GeneratorNotInstalled,

    #[error("Not a git repository. Run gitscribe from within a git repository.")]
    NotARepository,
}

/// Fatal errors from a commit session.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("{source}\n  hint: {}", source.guidance())]
    Generation {
        #[from]
        source: GenerationError,
    },

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error("Prompt failed: {0}")]
    Terminal(#[from] dialoguer::Error),
}
