//! Tabular file importer.
//!
//! Spreadsheet uploads are validated by the backend, so this importer does
//! not look at columns. It checks the extension, reads the file and relays
//! the backend's tri-part result. The records never enter the accumulation
//! store.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::endpoint::FileImportEndpoint;
use crate::error::{ImportError, ImportResult};
use crate::models::{GENERIC_FAILURE_MESSAGE, OutcomeReport};

use super::traits::{SourceKind, read_import_bytes};

/// Default allowed extensions for tabular uploads
pub const DEFAULT_TABULAR_EXTENSIONS: &[&str] = &["csv"];

/// Importer that forwards a structured file to the backend
pub struct TabularFileImporter {
    endpoint: Arc<dyn FileImportEndpoint>,
    allowed_extensions: Vec<String>,
}

impl TabularFileImporter {
    /// Creates an importer accepting the default extensions
    #[must_use]
    pub fn new(endpoint: Arc<dyn FileImportEndpoint>) -> Self {
        Self {
            endpoint,
            allowed_extensions: DEFAULT_TABULAR_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Replaces the allowed extensions (compared case-insensitively, no dot)
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Checks `path` against the allowed extensions
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedExtension` if the extension is missing or not allowed.
    pub fn check_extension(&self, path: &Path) -> ImportResult<()> {
        let allowed = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.allowed_extensions
                    .iter()
                    .any(|a| a.eq_ignore_ascii_case(ext))
            });
        if allowed {
            Ok(())
        } else {
            Err(ImportError::UnsupportedExtension {
                path: path.to_path_buf(),
                expected: self.allowed_extensions.join(", "),
            })
        }
    }

    /// Uploads the file and returns the backend outcome.
    ///
    /// Local problems (wrong extension, unreadable file) are errors. A failed
    /// backend call is folded into a failure report.
    #[instrument(skip(self), fields(source = "tabular", path = %path.display()))]
    pub async fn produce(&self, path: &Path) -> ImportResult<OutcomeReport> {
        self.check_extension(path)?;
        let contents = read_import_bytes(path, SourceKind::Tabular.display_name()).await?;
        let file_name = file_name_of(path);

        match self.endpoint.import_file(&file_name, contents).await {
            Ok(report) => {
                info!(summary = %report.summary(), "Tabular import finished");
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Tabular import failed");
                Ok(OutcomeReport::failure(GENERIC_FAILURE_MESSAGE))
            }
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
