//! Settings file management

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CliError;
use crate::logs::LogLevel;

/// CLI settings
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Show verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Name of the context used for API calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,

    /// Known riser servers
    #[serde(default)]
    pub contexts: Vec<Context>,

    /// Default for `deploy --wait-seconds`
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_wait_seconds() -> u64 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            verbose: false,
            current_context: None,
            contexts: Vec::new(),
            wait_seconds: default_wait_seconds(),
        }
    }
}

/// Connection settings for one riser server
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub name: String,

    pub server_url: String,

    #[serde(serialize_with = "serialize_secret", deserialize_with = "deserialize_secret")]
    pub apikey: SecretString,

    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub secure: bool,
}

fn serialize_secret<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl Settings {
    /// The context selected by `current_context`
    pub fn current_context(&self) -> Result<&Context, CliError> {
        let name = self.current_context.as_deref().ok_or_else(|| {
            CliError::ConfigError(
                "Unable to load current context: no context set. Use \"riser context current <contextName>\" to set the context"
                    .to_string(),
            )
        })?;

        self.contexts
            .iter()
            .find(|context| context.name == name)
            .ok_or_else(|| {
                CliError::ConfigError(format!(
                    "Unable to load current context: context {:?} does not exist",
                    name
                ))
            })
    }

    /// Select an existing context
    pub fn set_current_context(&mut self, name: &str) -> Result<(), CliError> {
        if !self.contexts.iter().any(|context| context.name == name) {
            return Err(CliError::NotFound(format!("Context {:?} does not exist", name)));
        }
        self.current_context = Some(name.to_string());
        Ok(())
    }

    /// Add or replace a context and make it current
    pub fn save_context(&mut self, context: Context) {
        let name = context.name.clone();
        match self.contexts.iter_mut().find(|existing| existing.name == name) {
            Some(existing) => *existing = context,
            None => self.contexts.push(context),
        }
        self.current_context = Some(name);
    }

    /// Remove a context, clearing the selection when it was current
    pub fn remove_context(&mut self, name: &str) -> Result<(), CliError> {
        let index = self
            .contexts
            .iter()
            .position(|context| context.name == name)
            .ok_or_else(|| {
                CliError::NotFound(format!("a context with the name {:?} does not exist", name))
            })?;

        self.contexts.remove(index);
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        Ok(())
    }
}
