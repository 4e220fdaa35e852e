//! Sequential step execution
//!
//! Multi-step external operations (mostly process invocations) are modelled as
//! [`Step`]s and run in order by a [`StepRunner`]. A step may expose captured
//! output through [`Step::state`] so that later steps can read it.

pub mod exec;
pub mod func;
pub mod retry;
pub mod runner;

pub use exec::ExecStep;
pub use func::FuncStep;
pub use retry::{always_retry, RetryStep};
pub use runner::StepRunner;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CliError;

/// A named unit of work.
///
/// Step instances are single use: create a fresh one for every execution.
#[async_trait]
pub trait Step: Send {
    /// Name used for progress output and error context
    fn name(&self) -> &str;

    /// Execute the step
    async fn exec(&mut self) -> Result<(), CliError>;

    /// Output captured by [`Step::exec`]. `None` before execution or for unknown keys.
    fn state(&self, key: &str) -> Option<&Value>;
}
