//! Loading and saving of `config.toml`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::trace_operation;
use crate::tracing::span_names;

use super::settings::Settings;

/// Name of the settings file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding `directory.access_token`
pub const DIRECTORY_TOKEN_ENV: &str = "CONTACTSYNC_DIRECTORY_TOKEN";

/// Resolves and persists application settings
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the platform config directory
    /// (`~/.config/contactsync` on Linux)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has none.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join("contactsync")))
    }

    /// Creates a manager rooted at `config_dir`
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Returns the config directory
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the path of the settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads settings, falling back to defaults when the file is missing.
    ///
    /// `CONTACTSYNC_DIRECTORY_TOKEN` overrides the stored access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load_settings(&self) -> ConfigResult<Settings> {
        let _span = trace_operation!(span_names::CONFIG_LOAD).entered();
        let mut settings = self.load_file()?;
        if let Some(token) = std::env::var(DIRECTORY_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
        {
            debug!("Directory access token taken from environment");
            settings.directory.access_token = Some(token);
        }
        settings.validate()?;
        Ok(settings)
    }

    fn load_file(&self) -> ConfigResult<Settings> {
        let path = self.settings_path();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };
        toml::from_str(&text).map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))
    }

    /// Writes settings, creating the config directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or cannot be written.
    pub fn save_settings(&self, settings: &Settings) -> ConfigResult<()> {
        settings.validate()?;
        let text =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::write(self.settings_path(), text)?;
        debug!(path = %self.settings_path().display(), "Settings saved");
        Ok(())
    }
}
