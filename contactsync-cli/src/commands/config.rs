//! Settings file commands.

use std::path::Path;

use contactsync_core::config::Settings;

use crate::cli::ConfigCommands;
use crate::error::CliError;
use crate::util::{create_config_manager, load_settings};

/// Config command handler
pub fn cmd_config(config_path: Option<&Path>, subcmd: ConfigCommands) -> Result<(), CliError> {
    match subcmd {
        ConfigCommands::Path => {
            let manager = create_config_manager(config_path)?;
            println!("{}", manager.settings_path().display());
            Ok(())
        }
        ConfigCommands::Show => cmd_show(config_path),
        ConfigCommands::Init { force } => cmd_init(config_path, force),
    }
}

fn cmd_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let mut settings = load_settings(config_path)?;
    if settings.directory.access_token.is_some() {
        settings.directory.access_token = Some("<redacted>".to_string());
    }
    let text = toml::to_string_pretty(&settings)
        .map_err(|e| CliError::Config(format!("Failed to render settings: {e}")))?;
    print!("{text}");
    Ok(())
}

fn cmd_init(config_path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let manager = create_config_manager(config_path)?;
    let path = manager.settings_path();
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    manager.save_settings(&Settings::default())?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}
