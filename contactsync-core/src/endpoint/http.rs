//! JSON-over-HTTP implementation of the backend collaborators.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{SubmissionError, SubmissionResult};
use crate::models::OutcomeReport;

use super::{BulkImportEndpoint, BulkImportRow, ExportEndpoint, FileImportEndpoint};

const BULK_IMPORT_PATH: &str = "contacts/bulk-import";
const FILE_IMPORT_PATH: &str = "contacts/import-file";
const EXPORT_PATH: &str = "contacts/export";

/// Longest response body kept in error messages
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize)]
struct BulkImportRequest<'a> {
    rows: &'a [BulkImportRow],
}

/// HTTP client for the contact backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a backend client rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> SubmissionResult<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a backend over an existing client
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn check_status(response: reqwest::Response) -> SubmissionResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SubmissionError::Rejected {
            status: status.as_u16(),
            body: truncate(&body),
        })
    }

    async fn decode_outcome(response: reqwest::Response) -> SubmissionResult<OutcomeReport> {
        let response = Self::check_status(response).await?;
        response
            .json::<OutcomeReport>()
            .await
            .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl BulkImportEndpoint for HttpBackend {
    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    async fn bulk_import(&self, rows: &[BulkImportRow]) -> SubmissionResult<OutcomeReport> {
        let response = self
            .client
            .post(self.url(BULK_IMPORT_PATH))
            .json(&BulkImportRequest { rows })
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        let report = Self::decode_outcome(response).await?;
        debug!(summary = %report.summary(), "Bulk import answered");
        Ok(report)
    }
}

#[async_trait]
impl FileImportEndpoint for HttpBackend {
    #[instrument(skip(self, contents), fields(bytes = contents.len()))]
    async fn import_file(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> SubmissionResult<OutcomeReport> {
        let response = self
            .client
            .post(self.url(FILE_IMPORT_PATH))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .header("X-File-Name", file_name)
            .body(contents)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        Self::decode_outcome(response).await
    }
}

#[async_trait]
impl ExportEndpoint for HttpBackend {
    #[instrument(skip(self))]
    async fn export(&self) -> SubmissionResult<Vec<u8>> {
        let response = self
            .client
            .get(self.url(EXPORT_PATH))
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        let response = Self::check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

pub(crate) fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
