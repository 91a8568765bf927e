//! Remote contact directory importer.
//!
//! An import runs the authorization sub-flow first and then sweeps every
//! page of the connections listing. Nothing is returned until the last page
//! has arrived, so a failed sweep never yields a partial batch.

mod auth;
mod people;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{Instrument, debug, info, instrument, warn};

use crate::error::{DirectoryError, ImportError, ImportResult};
use crate::models::ContactRecord;
use crate::progress::{NoOpProgressReporter, ProgressReporter};
use crate::trace_operation;
use crate::tracing::span_names;

use super::traits::{ContactSource, SourceKind};

pub use auth::{
    AccessToken, AuthorizationProvider, AuthorizationState, CONSENT_PROMPT,
    DIRECTORY_READONLY_SCOPE, DirectoryAuthorizer, StaticTokenProvider, TokenClient,
    TokenRequest, TokenResponder,
};
pub use people::{
    ConnectionsApi, ConnectionsPage, DEFAULT_API_BASE, FieldMetadata, ListRequest, MAX_PAGE_SIZE,
    NameField, PERSON_FIELDS, PeopleApiClient, Person, ValueField,
};

/// Importer for the OAuth-gated contact directory
pub struct DirectoryImporter {
    authorizer: DirectoryAuthorizer,
    api: Arc<dyn ConnectionsApi>,
    page_size: u32,
    progress: Arc<dyn ProgressReporter>,
}

impl DirectoryImporter {
    /// Creates an importer requesting the read-only scope
    #[must_use]
    pub fn new(provider: Arc<dyn AuthorizationProvider>, api: Arc<dyn ConnectionsApi>) -> Self {
        Self {
            authorizer: DirectoryAuthorizer::new(provider, DIRECTORY_READONLY_SCOPE),
            api,
            page_size: MAX_PAGE_SIZE,
            progress: Arc::new(NoOpProgressReporter),
        }
    }

    /// Overrides the requested scope
    #[must_use]
    pub fn with_scope(self, scope: impl Into<String>) -> Self {
        let provider = self.authorizer.provider();
        Self {
            authorizer: DirectoryAuthorizer::new(provider, scope),
            ..self
        }
    }

    /// Sets the page size, clamped to `1..=MAX_PAGE_SIZE`
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Sets the reporter notified after every page
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Returns the configured page size
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the authorization helper
    #[must_use]
    pub const fn authorizer(&self) -> &DirectoryAuthorizer {
        &self.authorizer
    }

    /// Returns a snapshot of the authorization state
    #[must_use]
    pub fn state(&self) -> AuthorizationState {
        self.authorizer.state()
    }

    /// Follows continuation tokens until the listing is exhausted
    async fn sweep(&self, token: &AccessToken) -> Result<Vec<ContactRecord>, DirectoryError> {
        let mut records = Vec::new();
        let mut seen_tokens = HashSet::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            if self.progress.is_cancelled() {
                return Err(DirectoryError::Transport("sweep cancelled".to_string()));
            }

            let request = ListRequest {
                fields: PERSON_FIELDS.to_string(),
                page_size: self.page_size,
                page_token: page_token.take(),
            };
            let page = self.api.list_connections(token, &request).await?;
            pages += 1;

            let before = records.len();
            records.extend(page.connections.iter().filter_map(Person::to_record));
            debug!(
                page = pages,
                entries = page.connections.len(),
                kept = records.len() - before,
                "Directory page processed"
            );
            self.progress.report(pages, 0, &format!("Fetched page {pages}"));

            match page.next_token() {
                Some(next) => {
                    if !seen_tokens.insert(next.to_string()) {
                        return Err(DirectoryError::InvalidResponse(format!(
                            "continuation token repeated after page {pages}"
                        )));
                    }
                    page_token = Some(next.to_string());
                }
                None => break,
            }
        }

        info!(pages, records = records.len(), "Directory sweep complete");
        Ok(records)
    }
}

#[async_trait]
impl ContactSource for DirectoryImporter {
    fn kind(&self) -> SourceKind {
        SourceKind::Directory
    }

    #[instrument(skip(self), fields(source = "directory", page_size = self.page_size))]
    async fn produce(&self) -> ImportResult<Vec<ContactRecord>> {
        let source_name = SourceKind::Directory.display_name();
        let Some(_guard) = self.authorizer.busy().try_acquire() else {
            return Err(ImportError::Busy(source_name.to_string()));
        };
        self.authorizer.set_last_error(None);

        let token = match self
            .authorizer
            .authorize()
            .instrument(trace_operation!(span_names::DIRECTORY_AUTHORIZE))
            .await
        {
            Ok(token) => token,
            Err(e) => {
                self.authorizer.set_last_error(Some(e.to_string()));
                return Err(ImportError::AuthorizationDenied(e.to_string()));
            }
        };

        let records = match self
            .sweep(&token)
            .instrument(trace_operation!(span_names::DIRECTORY_SWEEP, page_size = self.page_size))
            .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Directory sweep failed");
                self.authorizer.set_last_error(Some(e.to_string()));
                return Err(ImportError::FetchFailed(e.to_string()));
            }
        };

        if records.is_empty() {
            return Err(ImportError::empty(source_name));
        }
        Ok(records)
    }
}

impl std::fmt::Debug for DirectoryImporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryImporter")
            .field("authorizer", &self.authorizer)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
