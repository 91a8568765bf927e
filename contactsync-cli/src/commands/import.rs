//! Multi-source import command.
//!
//! Runs one session: every requested source populates the shared working
//! set in order, the operator's `--exclude` and `--deselect` lists curate
//! it, and the selected rows are submitted in a single call. A failing
//! source is reported and skipped; the command only fails when nothing
//! was collected at all.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use contactsync_core::error::{ImportError, ImportResult};
use contactsync_core::models::{Classification, ContactRecord};
use contactsync_core::session::ImportSession;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::{build_collaborators, create_runtime, load_settings, print_report};

/// Parameters for the import command
pub struct ImportParams<'a> {
    pub cards: &'a [PathBuf],
    pub picker: Option<&'a Path>,
    pub directory: bool,
    pub exclude: &'a [String],
    pub deselect: &'a [String],
    pub classification: Option<Classification>,
    pub dry_run: bool,
    pub format: OutputFormat,
}

/// Import command handler
pub fn cmd_import(config_path: Option<&Path>, params: ImportParams<'_>) -> Result<(), CliError> {
    if params.cards.is_empty() && params.picker.is_none() && !params.directory {
        return Err(CliError::Import(
            "No source given; use --cards, --picker or --directory".to_string(),
        ));
    }

    let settings = load_settings(config_path)?;
    let mut session = ImportSession::new(
        build_collaborators(&settings, params.picker)?,
        settings.session_options(),
    );
    let runtime = create_runtime()?;

    let mut failures = Vec::new();
    for path in params.cards {
        let outcome = runtime.block_on(session.populate_card_file(path));
        note_outcome(&path.display().to_string(), outcome, &mut failures);
    }
    if params.picker.is_some() {
        let outcome = runtime.block_on(session.populate_picker());
        note_outcome("Picker", outcome, &mut failures);
    }
    if params.directory {
        let outcome = runtime.block_on(session.populate_directory());
        note_outcome("Directory", outcome, &mut failures);
    }
    if session.records().is_empty()
        && let Some(first) = failures.into_iter().next()
    {
        return Err(first.into());
    }

    curate(&mut session, params.exclude, params.deselect);
    if let Some(classification) = params.classification {
        session.set_classification(classification);
    }

    match params.format {
        OutputFormat::Table => print!("{}", render_table(session.records())),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(session.records())
                .map_err(|e| CliError::Import(format!("Failed to serialize records: {e}")))?;
            println!("{json}");
        }
    }

    if params.dry_run {
        return Ok(());
    }

    match runtime.block_on(session.submit()) {
        Some(report) => {
            print_report(&report);
            if report.imported_count == 0 && report.skipped_count == 0 && report.has_errors() {
                return Err(CliError::Backend(report.errors.join("; ")));
            }
        }
        None => println!("Nothing selected; no submission made"),
    }
    Ok(())
}

/// Reports one source's outcome on stderr; failures do not stop the remaining sources
fn note_outcome(label: &str, outcome: ImportResult<usize>, failures: &mut Vec<ImportError>) {
    match outcome {
        Ok(added) => eprintln!("{label}: {added} new"),
        Err(e) => {
            if let Some(message) = e.user_message() {
                eprintln!("{label}: {message}");
            }
            warn!(source = %label, error = %e, "Source failed; continuing");
            failures.push(e);
        }
    }
}

/// Applies the exclusion and deselection lists by identity.
///
/// A name matches every record carrying it, so both lists act on all of
/// them when the identity strategy keeps same-name records apart.
fn curate(session: &mut ImportSession, exclude: &[String], deselect: &[String]) {
    for name in exclude {
        let indices = session.store().positions(name);
        if indices.is_empty() {
            warn!(identity = %name, "Excluded name not in working set");
        }
        for index in indices.into_iter().rev() {
            session.remove_one(index);
        }
    }
    for name in deselect {
        let indices = session.store().positions(name);
        if indices.is_empty() {
            warn!(identity = %name, "Deselected name not in working set");
        }
        for index in indices {
            if session.records()[index].selected {
                session.toggle_one(index);
            }
        }
    }
}

fn render_table(records: &[ContactRecord]) -> String {
    if records.is_empty() {
        return "No contacts in working set\n".to_string();
    }

    let name_width = records
        .iter()
        .map(|r| r.identity.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    let email_width = records
        .iter()
        .filter_map(|r| r.email.as_ref().map(|e| e.chars().count()))
        .max()
        .unwrap_or(0)
        .max(5);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "SEL  {:<name_width$}  {:<email_width$}  PHONE",
        "NAME", "EMAIL"
    );
    let _ = writeln!(out, "{}", "-".repeat(name_width + email_width + 16));
    for record in records {
        let _ = writeln!(
            out,
            "[{}]  {:<name_width$}  {:<email_width$}  {}",
            if record.selected { "x" } else { " " },
            record.identity,
            record.email.as_deref().unwrap_or("-"),
            record.phone.as_deref().unwrap_or("-"),
        );
    }
    let selected = records.iter().filter(|r| r.selected).count();
    let _ = writeln!(out, "\n{selected} of {} selected", records.len());
    out
}
