//! Step runner

use std::sync::Arc;

use colored::Colorize;
use tracing::debug;

use crate::errors::CliError;
use crate::notify::Notifier;
use crate::steps::Step;

/// Runs steps strictly in order, halting at the first failure
pub struct StepRunner {
    notifier: Arc<dyn Notifier>,
}

impl StepRunner {
    /// Create a new runner reporting progress to `notifier`
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Run the steps one after another.
    ///
    /// A failing step stops the run; its error is returned wrapped with the
    /// step's name and no later step is executed.
    pub async fn run(&self, steps: &mut [&mut dyn Step]) -> Result<(), CliError> {
        for step in steps.iter_mut() {
            let name = step.name().to_string();
            self.notifier
                .info(&format!("Executing {}...", name.bright_cyan()));

            if let Err(e) = step.exec().await {
                debug!("Step {:?} failed: {}", name, e);
                return Err(CliError::StepFailed {
                    name,
                    source: Box::new(e),
                });
            }

            self.notifier
                .info(&format!("{} Complete", "✔".bright_green()));
        }

        Ok(())
    }
}
