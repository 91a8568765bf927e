//! Application settings stored in `config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::import::DEFAULT_TABULAR_EXTENSIONS;
use crate::import::directory::{DEFAULT_API_BASE, DIRECTORY_READONLY_SCOPE, MAX_PAGE_SIZE};
use crate::models::Classification;
use crate::session::SessionOptions;
use crate::store::IdentityStrategy;

/// Root settings document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Contact backend
    #[serde(default)]
    pub backend: BackendSettings,
    /// Remote contact directory
    #[serde(default)]
    pub directory: DirectorySettings,
    /// Import behavior
    #[serde(default)]
    pub import: ImportSettings,
    /// Logging
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Checks values that serde cannot
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(invalid("backend.base_url", "must not be empty"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.directory.page_size) {
            return Err(invalid(
                "directory.page_size",
                &format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        if self.directory.scope.trim().is_empty() {
            return Err(invalid("directory.scope", "must not be empty"));
        }
        if self.import.tabular_extensions.is_empty() {
            return Err(invalid("import.tabular_extensions", "must list at least one extension"));
        }
        Ok(())
    }

    /// Builds session options from the import section
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            identity_strategy: self.import.identity_strategy,
            classification: self.import.default_classification,
            tabular_extensions: self.import.tabular_extensions.clone(),
        }
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// `[backend]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the contact backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// `[directory]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySettings {
    /// Listing host
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Scope requested for the token
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Listing page size (1-1000)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Pre-obtained access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_scope() -> String {
    DIRECTORY_READONLY_SCOPE.to_string()
}

const fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            scope: default_scope(),
            page_size: default_page_size(),
            access_token: None,
        }
    }
}

/// `[import]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Dedup key for accumulated records
    #[serde(default)]
    pub identity_strategy: IdentityStrategy,
    /// Classification preselected for new sessions
    #[serde(default)]
    pub default_classification: Classification,
    /// Extensions accepted for spreadsheet uploads
    #[serde(default = "default_tabular_extensions")]
    pub tabular_extensions: Vec<String>,
}

fn default_tabular_extensions() -> Vec<String> {
    DEFAULT_TABULAR_EXTENSIONS
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            identity_strategy: IdentityStrategy::default(),
            default_classification: Classification::default(),
            tabular_extensions: default_tabular_extensions(),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "default_level")]
    pub level: String,
    /// Extra `EnvFilter` directives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Write logs to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            filter: None,
            file: None,
        }
    }
}
