//! Contact export download command.

use std::path::Path;

use contactsync_core::{HttpBackend, request_export};

use crate::error::CliError;
use crate::util::{create_runtime, load_settings};

/// Export command handler
pub fn cmd_export(config_path: Option<&Path>, output: &Path) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let backend = HttpBackend::new(settings.backend.base_url.as_str())?;

    let bytes = create_runtime()?
        .block_on(request_export(&backend, output))
        .map_err(|e| CliError::Export(e.to_string()))?;

    println!("Wrote {bytes} bytes to {}", output.display());
    Ok(())
}
