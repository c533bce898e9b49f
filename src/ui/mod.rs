//! Terminal presentation: prompts, status lines and the progress spinner.

pub mod progress;
pub mod terminal;

pub use progress::{ProgressIndicator, format_duration, track};
pub use terminal::{ConsoleTerminal, Terminal};
