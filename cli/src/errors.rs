//! Error types for the riser CLI

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

/// Main error type for the riser CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Non-2xx response from the riser server
    #[error("{}", format_api_error(.status, .message, .validation_errors))]
    Api {
        status: u16,
        message: String,
        validation_errors: BTreeMap<String, String>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// External process exited unsuccessfully
    #[error("{message}. Stderr: {}", format_stderr(.stderr))]
    CommandFailed { message: String, stderr: String },

    #[error("Error executing step \"{name}\": {source}")]
    StepFailed {
        name: String,
        #[source]
        source: Box<CliError>,
    },

    #[error("failed after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<CliError>,
    },

    #[error("Revision status is {0:?}")]
    RevisionNotReady(String),

    #[error(
        "Timeout of {timeout:?} exceeded waiting for the new revision to become ready{}",
        format_cause(.last)
    )]
    WaitTimeout {
        timeout: Duration,
        #[source]
        last: Option<Box<CliError>>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_api_error(status: &u16, message: &str, validation_errors: &BTreeMap<String, String>) -> String {
    if validation_errors.is_empty() {
        let reason = reqwest::StatusCode::from_u16(*status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown");
        return format!("Received HTTP {} ({}) {}", status, reason, message);
    }

    let mut out = format!("{}:\n", message);
    for (field, error) in validation_errors {
        out.push_str(&format!(" • {}: {}\n", field, error));
    }
    out
}

fn format_cause(last: &Option<Box<CliError>>) -> String {
    match last {
        Some(cause) => format!(": {}", cause),
        None => String::new(),
    }
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        "<nil>".to_string()
    } else {
        format!("\n{}", stderr)
    }
}
