//! Tri-part result of a submission attempt.

use serde::{Deserialize, Serialize};

/// Message used when the collaborator could not be reached at all
pub const GENERIC_FAILURE_MESSAGE: &str = "The import could not be completed. Please try again.";

/// Result of one bulk or file import.
///
/// Field names follow the backend's response. Both camelCase and PascalCase
/// spellings are accepted when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeReport {
    /// Records created by the backend
    #[serde(alias = "ImportedCount", alias = "imported_count")]
    pub imported_count: usize,
    /// Records the backend ignored (e.g. already present)
    #[serde(alias = "SkippedCount", alias = "skipped_count")]
    pub skipped_count: usize,
    /// Per-row or global error messages
    #[serde(default, alias = "Errors")]
    pub errors: Vec<String>,
}

impl OutcomeReport {
    /// Creates a report from backend counts
    #[must_use]
    pub const fn new(imported_count: usize, skipped_count: usize, errors: Vec<String>) -> Self {
        Self {
            imported_count,
            skipped_count,
            errors,
        }
    }

    /// Creates the report used when the collaborator call itself failed
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(0, 0, vec![message.into()])
    }

    /// Returns true if any errors were reported
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns a summary string of the report
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Imported: {}, Skipped: {}, Errors: {}",
            self.imported_count,
            self.skipped_count,
            self.errors.len()
        )
    }
}
