//! Line-based prompts and status output.

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use crate::locale::{Language, Messages};
use crate::workflow::MenuChoice;

/// Everything the commit session reads from or writes to the user.
///
/// Kept behind a trait so sessions can be driven by a script in tests.
pub trait Terminal: Send + Sync {
    fn select_language(&self) -> Result<Language, dialoguer::Error>;

    /// Optional free-text intent. `None` when the user skips it.
    fn read_intent(&self, messages: &Messages) -> Result<Option<String>, dialoguer::Error>;

    fn show_draft(&self, messages: &Messages, draft: &str);

    /// Print the numbered menu and return the raw answer.
    fn read_menu_input(&self, messages: &Messages) -> Result<String, dialoguer::Error>;

    fn info(&self, text: &str);
    fn warn(&self, text: &str);
    fn success(&self, text: &str);
}

/// [`Terminal`] on the process's stdin/stdout.
#[derive(Debug, Default)]
pub struct ConsoleTerminal;

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl Terminal for ConsoleTerminal {
    fn select_language(&self) -> Result<Language, dialoguer::Error> {
        let labels: Vec<&str> = Language::ALL.iter().map(Language::label).collect();
        let index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Language / 语言 / Idioma")
            .items(&labels)
            .default(0)
            .interact()?;
        Ok(Language::ALL
            .get(index)
            .copied()
            .unwrap_or(Language::English))
    }

    fn read_intent(&self, messages: &Messages) -> Result<Option<String>, dialoguer::Error> {
        let intent: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(messages.intent_prompt)
            .allow_empty(true)
            .interact_text()?;
        let intent = intent.trim();
        Ok((!intent.is_empty()).then(|| intent.to_string()))
    }

    fn show_draft(&self, messages: &Messages, draft: &str) {
        println!();
        println!("{}", style(messages.draft_header).bold());
        println!("{}", style("─".repeat(50)).dim());
        println!("{draft}");
        println!("{}", style("─".repeat(50)).dim());
    }

    fn read_menu_input(&self, messages: &Messages) -> Result<String, dialoguer::Error> {
        println!();
        println!("{}", messages.menu_title);
        for choice in MenuChoice::ALL {
            println!(
                "  {}. {}",
                style(choice.number()).cyan(),
                menu_label(messages, choice)
            );
        }

        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(messages.menu_prompt)
            .allow_empty(true)
            .interact_text()
    }

    fn info(&self, text: &str) {
        println!("{} {text}", style("•").cyan());
    }

    fn warn(&self, text: &str) {
        eprintln!("{} {text}", style("!").yellow().bold());
    }

    fn success(&self, text: &str) {
        println!("{} {text}", style("✔").green());
    }
}

fn menu_label(messages: &Messages, choice: MenuChoice) -> &'static str {
    match choice {
        MenuChoice::Commit => messages.menu_commit,
        MenuChoice::Regenerate => messages.menu_regenerate,
        MenuChoice::Edit => messages.menu_edit,
        MenuChoice::Cancel => messages.menu_cancel,
    }
}
