//! Shared utility functions used across command modules.

use std::path::Path;
use std::sync::Arc;

use contactsync_core::config::{ConfigManager, Settings};
use contactsync_core::import::directory::{AccessToken, PeopleApiClient, StaticTokenProvider};
use contactsync_core::import::{ContactPicker, JsonFilePicker};
use contactsync_core::models::OutcomeReport;
use contactsync_core::session::{DirectoryCollaborators, SessionCollaborators};
use contactsync_core::HttpBackend;

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads validated settings for the selected config directory
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, CliError> {
    create_config_manager(config_path)?
        .load_settings()
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))
}

/// Builds a runtime for one command's async work
pub fn create_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Io)
}

/// Wires the HTTP backend, the optional picker file and the directory
/// client from settings.
pub fn build_collaborators(
    settings: &Settings,
    picker: Option<&Path>,
) -> Result<SessionCollaborators, CliError> {
    let backend = Arc::new(HttpBackend::new(settings.backend.base_url.as_str())?);

    let directory = &settings.directory;
    let provider = Arc::new(StaticTokenProvider::new(
        directory.access_token.as_deref().map(AccessToken::new),
    ));
    let api = Arc::new(
        PeopleApiClient::new(directory.api_base.as_str())
            .map_err(|e| CliError::Directory(e.to_string()))?,
    );
    let mut directory_collaborators = DirectoryCollaborators::new(provider, api);
    directory_collaborators.scope.clone_from(&directory.scope);
    directory_collaborators.page_size = directory.page_size;

    Ok(SessionCollaborators {
        bulk_import: backend.clone(),
        file_import: backend,
        picker: picker.map(|p| Arc::new(JsonFilePicker::new(p)) as Arc<dyn ContactPicker>),
        directory: Some(directory_collaborators),
    })
}

/// Prints an outcome report to stdout
pub fn print_report(report: &OutcomeReport) {
    println!("{}", report.summary());
    for error in &report.errors {
        println!("  - {error}");
    }
}
