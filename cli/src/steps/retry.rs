//! Retrying step

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::CliError;
use crate::notify::Notifier;
use crate::steps::Step;

type StepFactory = Box<dyn Fn() -> Box<dyn Step> + Send + Sync>;
type ShouldRetryFn = Box<dyn Fn(&CliError) -> bool + Send + Sync>;

/// Retry policy that retries every error
pub fn always_retry(_err: &CliError) -> bool {
    true
}

/// Executes a freshly created step until it succeeds, the error is not
/// retryable, or `max_attempts` is reached
pub struct RetryStep {
    name: String,
    factory: StepFactory,
    first_step: Option<Box<dyn Step>>,
    current_step: Option<Box<dyn Step>>,
    max_attempts: u32,
    attempts: u32,
    should_retry: ShouldRetryFn,
    sleep_interval: Duration,
    notifier: Option<Arc<dyn Notifier>>,
}

impl RetryStep {
    /// Create a retry step.
    ///
    /// `factory` is called once per attempt. The step built here for the
    /// name is kept and used as the first attempt, so the factory is invoked
    /// exactly as many times as there are attempts.
    pub fn new<F, R>(factory: F, max_attempts: u32, should_retry: R) -> Self
    where
        F: Fn() -> Box<dyn Step> + Send + Sync + 'static,
        R: Fn(&CliError) -> bool + Send + Sync + 'static,
    {
        let first_step = factory();
        Self {
            name: first_step.name().to_string(),
            factory: Box::new(factory),
            first_step: Some(first_step),
            current_step: None,
            max_attempts: max_attempts.max(1),
            attempts: 0,
            should_retry: Box::new(should_retry),
            sleep_interval: Duration::from_secs(1),
            notifier: None,
        }
    }

    /// Override the pause between attempts
    pub fn with_sleep_interval(mut self, sleep_interval: Duration) -> Self {
        self.sleep_interval = sleep_interval;
        self
    }

    /// Report retries as verbose notifications
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Number of attempts made by the last execution
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

#[async_trait]
impl Step for RetryStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exec(&mut self) -> Result<(), CliError> {
        self.attempts = 0;

        loop {
            let mut step = match self.first_step.take() {
                Some(step) => step,
                None => (self.factory)(),
            };
            self.attempts += 1;

            let result = step.exec().await;
            self.current_step = Some(step);

            let err = match result {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };

            if self.attempts >= self.max_attempts || !(self.should_retry)(&err) {
                return Err(CliError::RetryExhausted {
                    attempts: self.attempts,
                    source: Box::new(err),
                });
            }

            let message = format!(
                "Step {:?} failed and will be retried. Error: {}",
                self.name, err
            );
            match &self.notifier {
                Some(notifier) => notifier.verbose(&message),
                None => debug!("{}", message),
            }

            tokio::time::sleep(self.sleep_interval).await;
        }
    }

    fn state(&self, key: &str) -> Option<&Value> {
        self.current_step.as_ref().and_then(|step| step.state(key))
    }
}
