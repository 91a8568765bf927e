//! `ContactSync` CLI - Command-line interface for `ContactSync`
//!
//! Provides commands for gathering contacts from vCard files, a picker
//! export and the remote directory, uploading spreadsheets, downloading
//! the contact export and managing the settings file.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use contactsync_core::tracing::{TracingConfig, TracingLevel, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    // Settings errors surface again when the command loads them
    let mut tracing_config = util::load_settings(config_path)
        .map(|s| TracingConfig::from_settings(&s.logging))
        .unwrap_or_default();
    // Flags override the configured level and filter, never the destination
    if cli.quiet || cli.verbose > 0 {
        let level = if cli.quiet {
            TracingLevel::Error
        } else {
            TracingLevel::Warn.raised(cli.verbose)
        };
        tracing_config.filter = None;
        tracing_config = tracing_config.with_level(level);
    }
    if let Err(e) = init_tracing(&tracing_config.with_no_color(cli.no_color))
        && !cli.quiet
    {
        eprintln!("Warning: {e}");
    }

    let result = commands::dispatch(config_path, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
