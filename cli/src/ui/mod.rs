//! Terminal views

pub mod deploy_view;
pub mod resource_view;
pub mod status_view;
pub mod table;

use std::str::FromStr;

use serde::Serialize;

use crate::errors::CliError;

/// How command output is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(CliError::ValidationError(format!(
                "Unknown output format {:?}. Must be one of \"human\" or \"json\"",
                s
            ))),
        }
    }
}

/// Pretty-printed JSON followed by a newline
pub fn render_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
