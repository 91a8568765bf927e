//! Configuration management for `ContactSync`
//!
//! Settings live in a single TOML file loaded through [`ConfigManager`].

mod manager;
mod settings;

pub use manager::{CONFIG_FILE_NAME, ConfigManager, DIRECTORY_TOKEN_ENV};
pub use settings::{
    BackendSettings, DirectorySettings, ImportSettings, LoggingSettings, Settings,
};
