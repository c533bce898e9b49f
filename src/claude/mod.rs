//! Claude CLI integration.

pub mod client;
pub mod subprocess;

pub use client::{ClaudeGenerator, Generator, parse_claude_response};
pub use subprocess::{CLAUDE_BIN, ClaudeOptions, check_claude_installed, run_claude};
