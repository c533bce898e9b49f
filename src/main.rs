//! gitscribe - CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use gitscribe::claude::{ClaudeGenerator, ClaudeOptions};
use gitscribe::config::{Config, DEFAULT_HISTORY_LEN, EditMode};
use gitscribe::editor::editor_for;
use gitscribe::git::GitCli;
use gitscribe::locale::Language;
use gitscribe::ui::{ConsoleTerminal, Terminal};
use gitscribe::workflow::{CommitSession, Outcome, check_preconditions};

/// Stage all changes and commit them with a message drafted by Claude.
#[derive(Parser, Debug)]
#[command(name = "gitscribe")]
#[command(about = "Stage all changes and commit them with a message drafted by Claude")]
#[command(version)]
struct Cli {
    /// Language for prompts and the commit message (asked for when omitted)
    #[arg(long, value_enum)]
    lang: Option<Language>,

    /// Intent of the change, sent to Claude instead of prompting
    #[arg(long)]
    context: Option<String>,

    /// Number of recent commit subjects used as style examples
    #[arg(long, default_value_t = DEFAULT_HISTORY_LEN)]
    history: usize,

    /// Maximum diff characters sent to Claude [env: GITSCRIBE_MAX_DIFF_CHARS]
    #[arg(long)]
    max_diff_chars: Option<usize>,

    /// Extra path glob to leave out of the diff (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    excludes: Vec<String>,

    /// How the Edit action lets you change the message [env: GITSCRIBE_EDIT_MODE]
    #[arg(long, value_enum)]
    edit_mode: Option<EditMode>,

    /// Claude model to use [env: GITSCRIBE_MODEL]
    #[arg(long)]
    model: Option<String>,

    /// Don't show the progress spinner
    #[arg(long)]
    no_progress: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Layer the flags over the environment-derived configuration.
    fn into_config(self) -> Config {
        let base = Config::from_env().with_extra_excludes(self.excludes);
        Config {
            language: self.lang,
            intent: self.context,
            history_len: self.history,
            max_diff_chars: self.max_diff_chars.unwrap_or(base.max_diff_chars),
            edit_mode: self.edit_mode.unwrap_or(base.edit_mode),
            model: self.model.or(base.model.clone()),
            show_progress: !self.no_progress,
            ..base
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(outcome) => {
            debug!("Session finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<Outcome> {
    let config = cli.into_config();
    debug!("Configuration: {:?}", config);

    let gateway = GitCli::from_current_dir()?;
    let generator = ClaudeGenerator::new(ClaudeOptions {
        model: config.model.clone(),
        timeout: config.timeout,
        ..Default::default()
    });
    check_preconditions(&gateway, &generator).await?;

    let terminal = ConsoleTerminal::new();
    let language = match config.language {
        Some(language) => language,
        None => terminal
            .select_language()
            .context("Failed to read the language choice")?,
    };
    let messages = language.messages();
    let editor = editor_for(config.edit_mode, messages);

    let session = CommitSession::new(
        &gateway,
        &generator,
        editor.as_ref(),
        &terminal,
        &config,
        messages,
    );

    Ok(session.run_checked().await?)
}
