//! Storage layout configuration

use std::path::PathBuf;

use crate::errors::CliError;
use crate::filesys::file::File;
use crate::storage::settings::Settings;

/// Overrides the configuration directory
pub const CONFIG_DIR_ENV_VAR: &str = "RISER_CONFIG_DIR";

/// Storage layout for the CLI
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Base directory for all storage
    pub base_dir: PathBuf,
}

impl StorageLayout {
    /// Create a new storage layout
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve the layout from `$RISER_CONFIG_DIR`, falling back to `$HOME/.riser`
    pub fn from_env() -> Result<Self, CliError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV_VAR).filter(|d| !d.is_empty()) {
            return Ok(Self::new(dir));
        }

        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                CliError::ConfigError(
                    "the $HOME environment variable must be set to a writeable directory"
                        .to_string(),
                )
            })?;

        Ok(Self::new(PathBuf::from(home).join(".riser")))
    }

    /// Get the settings file path
    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }

    /// Load the settings, or the defaults when no settings file exists yet
    pub async fn load_settings(&self) -> Result<Settings, CliError> {
        let file = self.settings_file();
        if !file.exists().await {
            return Ok(Settings::default());
        }
        file.read_json().await
    }

    /// Persist the settings, readable by the owner only
    pub async fn save_settings(&self, settings: &Settings) -> Result<(), CliError> {
        let file = self.settings_file();
        file.write_json(settings).await?;
        file.set_permissions_600().await
    }
}
