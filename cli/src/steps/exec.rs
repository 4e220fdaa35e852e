//! External process steps

use std::collections::HashMap;
use std::ffi::OsStr;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use crate::errors::CliError;
use crate::steps::Step;

/// Runs an external command, capturing `stdout` and `stderr` into state
pub struct ExecStep {
    name: String,
    program: String,
    command: Command,
    state: HashMap<String, Value>,
}

impl ExecStep {
    pub fn new<I, S>(name: impl Into<String>, program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command.args(args);

        Self {
            name: name.into(),
            program: program.to_string(),
            command,
            state: HashMap::new(),
        }
    }

    /// Run a command string through `sh -c`.
    ///
    /// Not portable to platforms without a POSIX shell.
    pub fn shell(name: impl Into<String>, shell_cmd: &str) -> Self {
        Self::new(name, "sh", ["-c", shell_cmd])
    }

    /// Captured stdout, once executed
    pub fn stdout(&self) -> Option<&str> {
        self.state.get("stdout").and_then(Value::as_str)
    }

    /// Captured stderr, once executed
    pub fn stderr(&self) -> Option<&str> {
        self.state.get("stderr").and_then(Value::as_str)
    }
}

#[async_trait]
impl Step for ExecStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exec(&mut self) -> Result<(), CliError> {
        debug!("Running {} for step {:?}", self.program, self.name);

        let output = match self.command.output().await {
            Ok(output) => output,
            Err(e) => {
                self.state.insert("stdout".to_string(), Value::String(String::new()));
                self.state.insert("stderr".to_string(), Value::String(String::new()));
                return Err(CliError::CommandFailed {
                    message: format!("Failed to run {}: {}", self.program, e),
                    stderr: String::new(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        self.state.insert("stdout".to_string(), Value::String(stdout));
        self.state
            .insert("stderr".to_string(), Value::String(stderr.clone()));

        if !output.status.success() {
            return Err(CliError::CommandFailed {
                message: output.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }

    fn state(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }
}
