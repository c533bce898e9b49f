//! Run configuration: defaults, environment overrides, CLI overrides.
//!
//! Precedence is CLI flag, then environment variable, then default. The
//! resulting [`Config`] is built once in `main` and passed by reference.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use tracing::warn;

use crate::locale::Language;

/// Default character budget for the staged diff sent to the generator.
pub const DEFAULT_MAX_DIFF_CHARS: usize = 3500;

/// Default number of recent commit subjects sampled for style.
pub const DEFAULT_HISTORY_LEN: usize = 10;

/// Default timeout for the generator subprocess (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Lockfile-like artifacts kept out of the diff.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "Gemfile.lock",
    "composer.lock",
    "poetry.lock",
    "go.sum",
    "*.min.js",
    "*.map",
];

pub const TIMEOUT_ENV_VAR: &str = "GITSCRIBE_CLAUDE_TIMEOUT";
pub const MAX_DIFF_ENV_VAR: &str = "GITSCRIBE_MAX_DIFF_CHARS";
pub const EDIT_MODE_ENV_VAR: &str = "GITSCRIBE_EDIT_MODE";
pub const MODEL_ENV_VAR: &str = "GITSCRIBE_MODEL";

/// How the Edit menu action captures a new message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EditMode {
    /// Hand the draft to `$VISUAL` / `$EDITOR`.
    #[default]
    External,
    /// Edit the draft on a single prompt line.
    Inline,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::External => f.write_str("external"),
            EditMode::Inline => f.write_str("inline"),
        }
    }
}

impl FromStr for EditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <EditMode as ValueEnum>::from_str(s, true)
    }
}

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Language for prompts and the generated message; asked for when `None`.
    pub language: Option<Language>,
    /// Intent supplied up front; the user is prompted when `None`.
    pub intent: Option<String>,
    pub history_len: usize,
    pub max_diff_chars: usize,
    pub excludes: Vec<String>,
    pub edit_mode: EditMode,
    pub model: Option<String>,
    pub timeout: Duration,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            intent: None,
            history_len: DEFAULT_HISTORY_LEN,
            max_diff_chars: DEFAULT_MAX_DIFF_CHARS,
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            edit_mode: EditMode::default(),
            model: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            show_progress: true,
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            timeout: Duration::from_secs(env_or(TIMEOUT_ENV_VAR, DEFAULT_TIMEOUT_SECS)),
            max_diff_chars: env_or(MAX_DIFF_ENV_VAR, defaults.max_diff_chars),
            edit_mode: env_or(EDIT_MODE_ENV_VAR, defaults.edit_mode),
            model: env::var(MODEL_ENV_VAR).ok().filter(|m| !m.trim().is_empty()),
            ..defaults
        }
    }

    /// Add extra exclusion globs on top of the defaults.
    pub fn with_extra_excludes<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for glob in extra {
            let glob = glob.into();
            if !self.excludes.contains(&glob) {
                self.excludes.push(glob);
            }
        }
        self
    }
}

/// Read and parse an environment variable, falling back to `default`.
///
/// Logs a warning if the variable is set but cannot be parsed.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => match v.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid {} value '{}', using default {}", name, v, default);
                default
            }
        },
        _ => default,
    }
}
