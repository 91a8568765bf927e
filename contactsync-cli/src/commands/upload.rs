//! Spreadsheet upload command.

use std::path::Path;

use crate::error::CliError;
use crate::util::{build_collaborators, create_runtime, load_settings, print_report};
use contactsync_core::session::ImportSession;

/// Upload command handler
pub fn cmd_upload(config_path: Option<&Path>, file: &Path) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let mut session = ImportSession::new(
        build_collaborators(&settings, None)?,
        settings.session_options(),
    );

    let report = create_runtime()?.block_on(session.import_tabular(file))?;
    print_report(&report);
    Ok(())
}
