//! Spinner shown while a long operation is pending.

use std::future::Future;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner ticks every 80ms; the label check runs once a second.
const TICK_INTERVAL: Duration = Duration::from_millis(80);
const LABEL_INTERVAL: Duration = Duration::from_secs(1);

/// After this long the label switches to the "still working" text.
pub const SLOW_AFTER: Duration = Duration::from_secs(20);

/// A terminal spinner with elapsed time and an updatable label.
///
/// Stopping it with [`succeed`](Self::succeed) or [`fail`](Self::fail) leaves
/// a ✔/✖ line with the total duration. Dropping it unfinished clears the line
/// and stops the ticker.
pub struct ProgressIndicator {
    bar: ProgressBar,
    started: Instant,
}

impl ProgressIndicator {
    pub fn start(label: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"]),
        );
        bar.set_message(label.to_string());
        bar.enable_steady_tick(TICK_INTERVAL);
        Self {
            bar,
            started: Instant::now(),
        }
    }

    /// Indicator that draws nothing, for non-interactive runs and tests.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            started: Instant::now(),
        }
    }

    pub fn set_label(&self, label: &str) {
        self.bar.set_message(label.to_string());
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn succeed(self, label: &str) -> Duration {
        let glyph = style("✔").green().to_string();
        self.finish(&glyph, label)
    }

    pub fn fail(self, label: &str) -> Duration {
        let glyph = style("✖").red().to_string();
        self.finish(&glyph, label)
    }

    fn finish(&self, glyph: &str, label: &str) -> Duration {
        let elapsed = self.elapsed();
        self.bar.set_style(
            ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        self.bar
            .finish_with_message(format!("{glyph} {label} {}", format_duration(elapsed)));
        elapsed
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Await `operation` while keeping the indicator's label current.
///
/// The label switches to `slow_label` once [`SLOW_AFTER`] has passed. The
/// operation itself is never cancelled.
pub async fn track<F, T>(progress: &ProgressIndicator, slow_label: &str, operation: F) -> T
where
    F: Future<Output = T>,
{
    tokio::pin!(operation);
    let mut ticker = tokio::time::interval(LABEL_INTERVAL);
    let mut slow = false;

    loop {
        tokio::select! {
            output = &mut operation => return output,
            _ = ticker.tick() => {
                if !slow && progress.elapsed() >= SLOW_AFTER {
                    progress.set_label(slow_label);
                    slow = true;
                }
            }
        }
    }
}

/// `12.3s` under a minute, `1m 05s` above.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}
