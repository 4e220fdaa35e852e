//! Operator-facing notifications

use colored::Colorize;
use tracing::debug;

/// Sink for messages meant for the person running the CLI.
///
/// Passed explicitly to whatever needs it; there is no process-wide instance.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Only shown in verbose mode
    fn verbose(&self, message: &str);
}

/// Prints notifications to the terminal
#[derive(Debug, Clone, Default)]
pub struct ScreenNotifier {
    verbose_mode: bool,
}

impl ScreenNotifier {
    pub fn new(verbose_mode: bool) -> Self {
        Self { verbose_mode }
    }
}

impl Notifier for ScreenNotifier {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        println!("{}", message.bright_yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message.bright_red());
    }

    fn verbose(&self, message: &str) {
        debug!("{}", message);
        if self.verbose_mode {
            println!("{}", message.bright_black());
        }
    }
}
