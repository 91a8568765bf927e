//! Command handler modules for the CLI.

mod completions;
mod config;
mod export;
mod import;
mod upload;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Import {
            cards,
            picker,
            directory,
            exclude,
            deselect,
            classification,
            dry_run,
            format,
        } => import::cmd_import(
            config_path,
            import::ImportParams {
                cards: &cards,
                picker: picker.as_deref(),
                directory,
                exclude: &exclude,
                deselect: &deselect,
                classification: classification.map(Into::into),
                dry_run,
                format,
            },
        ),
        Commands::Upload { file } => upload::cmd_upload(config_path, &file),
        Commands::Export { output } => export::cmd_export(config_path, &output),
        Commands::Config(subcmd) => config::cmd_config(config_path, subcmd),
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
