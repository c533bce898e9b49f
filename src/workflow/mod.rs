//! The interactive commit workflow.

pub mod engine;
pub mod menu;

pub use engine::{CommitSession, LoopState, Outcome, check_preconditions};
pub use menu::MenuChoice;
