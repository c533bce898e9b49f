//! gitscribe - stage everything and commit it with a message drafted by Claude.
//!
//! # Overview
//!
//! gitscribe stages all working-tree changes, summarizes them, asks the
//! Claude Code CLI for a Conventional Commits message in the chosen language,
//! and lets the user commit, regenerate, edit or cancel. Commits are refused
//! while the branch is behind or diverged from its upstream.

pub mod claude;
pub mod commit;
pub mod config;
pub mod editor;
pub mod error;
pub mod git;
pub mod locale;
pub mod ui;
pub mod workflow;

// Re-export commonly used types
pub use claude::{ClaudeGenerator, ClaudeOptions, Generator};
pub use config::{Config, EditMode};
pub use editor::{EditorBridge, editor_for};
pub use error::{CommitError, EditorError, GenerationError, GitError, PreconditionError, WorkflowError};
pub use git::{BranchRelation, GitCli, RepositoryGateway};
pub use locale::{Language, Messages};
pub use workflow::{CommitSession, MenuChoice, Outcome};
