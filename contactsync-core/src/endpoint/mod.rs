//! Backend collaborators consumed by the import pipeline.
//!
//! The core only depends on the traits here. [`HttpBackend`] implements all
//! three against a JSON HTTP API.

mod http;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::error::{ContactSyncError, SubmissionResult};
use crate::models::{Classification, ContactRecord, OutcomeReport};
use crate::trace_operation;
use crate::tracing::span_names;

pub use http::HttpBackend;
pub(crate) use http::truncate;

/// One row of a bulk import request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportRow {
    /// Display name
    pub identity: String,
    /// Shared classification of the submission
    pub classification: Classification,
    /// Optional email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Optional phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl BulkImportRow {
    /// Builds a row from a record and the shared classification
    #[must_use]
    pub fn from_record(record: &ContactRecord, classification: Classification) -> Self {
        Self {
            identity: record.identity.clone(),
            classification,
            email: record.email.clone(),
            phone: record.phone.clone(),
        }
    }
}

/// Accepts curated contact rows
#[async_trait]
pub trait BulkImportEndpoint: Send + Sync {
    /// Imports `rows` in one operation
    async fn bulk_import(&self, rows: &[BulkImportRow]) -> SubmissionResult<OutcomeReport>;
}

/// Accepts a raw structured file and validates it server-side
#[async_trait]
pub trait FileImportEndpoint: Send + Sync {
    /// Imports the file contents
    async fn import_file(&self, file_name: &str, contents: Vec<u8>)
    -> SubmissionResult<OutcomeReport>;
}

/// Produces a downloadable structured-file export
#[async_trait]
pub trait ExportEndpoint: Send + Sync {
    /// Returns the export blob
    async fn export(&self) -> SubmissionResult<Vec<u8>>;
}

/// Downloads the export blob and writes it to `destination`.
///
/// Returns the number of bytes written.
pub async fn request_export(
    endpoint: &dyn ExportEndpoint,
    destination: &Path,
) -> Result<usize, ContactSyncError> {
    let blob = endpoint
        .export()
        .instrument(trace_operation!(span_names::EXPORT_DOWNLOAD))
        .await?;
    tokio::fs::write(destination, &blob).await?;
    tracing::info!(
        bytes = blob.len(),
        path = %destination.display(),
        "Export written"
    );
    Ok(blob.len())
}
