//! Closure-backed step

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CliError;
use crate::steps::Step;

/// Wraps a closure as a step. Exposes no state.
pub struct FuncStep {
    name: String,
    func: Box<dyn FnMut() -> Result<(), CliError> + Send>,
}

impl FuncStep {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: FnMut() -> Result<(), CliError> + Send + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

#[async_trait]
impl Step for FuncStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exec(&mut self) -> Result<(), CliError> {
        (self.func)()
    }

    fn state(&self, _key: &str) -> Option<&Value> {
        None
    }
}
