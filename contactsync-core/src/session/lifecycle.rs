//! Import session lifecycle.
//!
//! [`ImportSession`] owns everything that lives for one import dialog: the
//! accumulation store, the shared classification, the lazily created
//! directory importer and the final outcome report. Switching to the other
//! source tab, closing the session or dismissing the outcome discards all of
//! it.
//!
//! Population is split into [`ImportSession::begin_populating`] and
//! [`ImportSession::accept_batch`] so a shell can run several sources at once
//! without holding the session across the await. Tickets issued before a
//! reset are stale and their batches are dropped.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::endpoint::{BulkImportEndpoint, FileImportEndpoint};
use crate::error::{ImportError, ImportResult};
use crate::import::directory::{
    AuthorizationProvider, AuthorizationState, ConnectionsApi, DIRECTORY_READONLY_SCOPE,
    MAX_PAGE_SIZE,
};
use crate::import::{
    CardTextImporter, ContactPicker, ContactSource, DEFAULT_TABULAR_EXTENSIONS,
    DirectoryImporter, PickerImporter, SourceKind, TabularFileImporter,
};
use crate::models::{Classification, ContactRecord, OutcomeReport};
use crate::progress::ProgressReporter;
use crate::store::{AccumulationStore, IdentityStrategy};

use super::submission::SubmissionController;

/// Where the session currently is in the import flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No source chosen
    #[default]
    Idle,
    /// A source is chosen but nothing has been loaded
    SourceSelected,
    /// At least one source is producing a batch
    Populating,
    /// The store holds records ready for curation
    Populated,
    /// The last population attempt failed
    SourceError,
    /// A submission is running
    Submitting,
    /// An outcome report replaced the interactive view
    Result,
}

/// Source tabs of the import dialog.
///
/// Sources on the same tab share the accumulation store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTab {
    /// Spreadsheet upload
    File,
    /// Cards, device picker and directory
    Contacts,
}

impl SourceTab {
    /// Returns the tab a source lives on
    #[must_use]
    pub const fn of(kind: SourceKind) -> Self {
        if kind.accumulates() {
            Self::Contacts
        } else {
            Self::File
        }
    }
}

/// Directory collaborators and tuning
#[derive(Clone)]
pub struct DirectoryCollaborators {
    /// OAuth provider integration
    pub provider: Arc<dyn AuthorizationProvider>,
    /// Connections listing
    pub api: Arc<dyn ConnectionsApi>,
    /// Scope requested for the token
    pub scope: String,
    /// Listing page size
    pub page_size: u32,
    /// Optional page progress observer
    pub progress: Option<Arc<dyn ProgressReporter>>,
}

impl DirectoryCollaborators {
    /// Creates directory collaborators with the read-only scope and largest page
    #[must_use]
    pub fn new(provider: Arc<dyn AuthorizationProvider>, api: Arc<dyn ConnectionsApi>) -> Self {
        Self {
            provider,
            api,
            scope: DIRECTORY_READONLY_SCOPE.to_string(),
            page_size: MAX_PAGE_SIZE,
            progress: None,
        }
    }
}

impl std::fmt::Debug for DirectoryCollaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryCollaborators")
            .field("scope", &self.scope)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

/// External collaborators used by a session
#[derive(Clone)]
pub struct SessionCollaborators {
    /// Receives curated rows
    pub bulk_import: Arc<dyn BulkImportEndpoint>,
    /// Receives raw spreadsheet uploads
    pub file_import: Arc<dyn FileImportEndpoint>,
    /// Native picker, if the host has one
    pub picker: Option<Arc<dyn ContactPicker>>,
    /// Remote directory, if configured
    pub directory: Option<DirectoryCollaborators>,
}

/// Per-session behavior switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Dedup key used by the store
    pub identity_strategy: IdentityStrategy,
    /// Initial shared classification
    pub classification: Classification,
    /// Extensions accepted for spreadsheet uploads
    pub tabular_extensions: Vec<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            identity_strategy: IdentityStrategy::default(),
            classification: Classification::default(),
            tabular_extensions: DEFAULT_TABULAR_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Handle for one population round-trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a batch is only merged through accept_batch"]
pub struct PopulateTicket {
    generation: u64,
    kind: SourceKind,
}

impl PopulateTicket {
    /// Returns the source this ticket was issued for
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }
}

/// State of one import dialog
pub struct ImportSession {
    collaborators: SessionCollaborators,
    options: SessionOptions,
    phase: SessionPhase,
    tab: Option<SourceTab>,
    active_source: Option<SourceKind>,
    store: AccumulationStore,
    classification: Classification,
    directory: Option<Arc<DirectoryImporter>>,
    submission: SubmissionController,
    generation: u64,
    pending: usize,
    last_error: Option<String>,
    outcome: Option<OutcomeReport>,
}

impl ImportSession {
    /// Creates an idle session
    #[must_use]
    pub fn new(collaborators: SessionCollaborators, options: SessionOptions) -> Self {
        let submission = SubmissionController::new(Arc::clone(&collaborators.bulk_import));
        Self {
            store: AccumulationStore::with_strategy(options.identity_strategy),
            classification: options.classification,
            collaborators,
            options,
            phase: SessionPhase::Idle,
            tab: None,
            active_source: None,
            directory: None,
            submission,
            generation: 0,
            pending: 0,
            last_error: None,
            outcome: None,
        }
    }

    // ---------------------------------------------------------------------
    // Source control
    // ---------------------------------------------------------------------

    /// Makes `kind` the active source.
    ///
    /// Moving to a different tab discards the store, the directory state and
    /// any report. Moving between sources on the same tab keeps the store.
    pub fn select_source(&mut self, kind: SourceKind) {
        let tab = SourceTab::of(kind);
        if self.tab.is_some_and(|current| current != tab) {
            info!(from = ?self.tab, to = ?tab, "Source tab switched, resetting session");
            self.reset();
        }
        self.tab = Some(tab);
        self.active_source = Some(kind);
        self.last_error = None;
        if self.pending == 0 && self.outcome.is_none() {
            self.phase = self.settled_phase();
        }
    }

    /// Closes the dialog and discards all session state
    pub fn close(&mut self) {
        info!("Import session closed");
        self.reset();
    }

    /// Dismisses the outcome report and returns to idle
    pub fn dismiss_outcome(&mut self) {
        if self.outcome.is_some() {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.store.clear();
        self.directory = None;
        self.outcome = None;
        self.last_error = None;
        self.tab = None;
        self.active_source = None;
        self.pending = 0;
        self.generation = self.generation.wrapping_add(1);
        self.phase = SessionPhase::Idle;
    }

    fn settled_phase(&self) -> SessionPhase {
        if self.active_source.is_none() {
            SessionPhase::Idle
        } else if self.store.is_empty() {
            SessionPhase::SourceSelected
        } else {
            SessionPhase::Populated
        }
    }

    // ---------------------------------------------------------------------
    // Population
    // ---------------------------------------------------------------------

    /// Starts a population round-trip for `kind`
    pub fn begin_populating(&mut self, kind: SourceKind) -> PopulateTicket {
        if self.outcome.is_some() {
            self.reset();
        }
        if self.active_source != Some(kind) {
            self.select_source(kind);
        }
        self.last_error = None;
        self.pending += 1;
        self.phase = SessionPhase::Populating;
        debug!(source = kind.source_id(), pending = self.pending, "Population started");
        PopulateTicket {
            generation: self.generation,
            kind,
        }
    }

    /// Merges a produced batch, or records its failure.
    ///
    /// Returns how many records were added. Batches from tickets issued
    /// before the last reset are dropped and count as zero. A failure never
    /// touches records already in the store.
    pub fn accept_batch(
        &mut self,
        ticket: PopulateTicket,
        result: ImportResult<Vec<ContactRecord>>,
    ) -> ImportResult<usize> {
        if ticket.generation != self.generation {
            debug!(source = ticket.kind.source_id(), "Dropping batch from a reset session");
            return Ok(0);
        }
        self.pending = self.pending.saturating_sub(1);

        let outcome = match result {
            Ok(batch) => {
                self.last_error = None;
                let added = self.store.merge_batch(batch);
                info!(
                    source = ticket.kind.source_id(),
                    added,
                    total = self.store.len(),
                    "Batch merged"
                );
                Ok(added)
            }
            Err(e) if e.is_silent() => {
                debug!(source = ticket.kind.source_id(), "Population cancelled");
                Ok(0)
            }
            Err(e) => {
                warn!(source = ticket.kind.source_id(), error = %e, "Population failed");
                self.last_error = e.user_message();
                Err(e)
            }
        };

        if self.pending == 0 {
            self.phase = if self.last_error.is_some() {
                SessionPhase::SourceError
            } else {
                self.settled_phase()
            };
        }
        outcome
    }

    async fn populate_from(&mut self, source: &dyn ContactSource) -> ImportResult<usize> {
        let ticket = self.begin_populating(source.kind());
        let result = source.produce().await;
        self.accept_batch(ticket, result)
    }

    /// Loads contacts from vCard text
    pub async fn populate_card_text(&mut self, text: impl Into<String>) -> ImportResult<usize> {
        self.populate_from(&CardTextImporter::from_text(text)).await
    }

    /// Loads contacts from a vCard file
    pub async fn populate_card_file(&mut self, path: &Path) -> ImportResult<usize> {
        self.populate_from(&CardTextImporter::from_path(path)).await
    }

    /// Returns an importer over the host picker
    ///
    /// # Errors
    ///
    /// Returns `CapabilityUnavailable` if the host has no picker.
    pub fn picker_source(&self) -> ImportResult<PickerImporter> {
        self.collaborators
            .picker
            .as_ref()
            .map(|picker| PickerImporter::new(Arc::clone(picker)))
            .ok_or_else(|| {
                ImportError::CapabilityUnavailable(SourceKind::Picker.display_name().to_string())
            })
    }

    /// Loads contacts chosen in the native picker
    pub async fn populate_picker(&mut self) -> ImportResult<usize> {
        let picker = match self.picker_source() {
            Ok(picker) => picker,
            Err(e) => return self.reject(SourceKind::Picker, e),
        };
        self.populate_from(&picker).await
    }

    /// Returns the session's directory importer, creating it on first use.
    ///
    /// The importer and its authorization state live until the next reset.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityUnavailable` if no directory is configured.
    pub fn directory_handle(&mut self) -> ImportResult<Arc<DirectoryImporter>> {
        if let Some(directory) = &self.directory {
            return Ok(Arc::clone(directory));
        }
        let config = self.collaborators.directory.as_ref().ok_or_else(|| {
            ImportError::CapabilityUnavailable(SourceKind::Directory.display_name().to_string())
        })?;

        let mut importer =
            DirectoryImporter::new(Arc::clone(&config.provider), Arc::clone(&config.api))
                .with_scope(config.scope.clone())
                .with_page_size(config.page_size);
        if let Some(progress) = &config.progress {
            importer = importer.with_progress(Arc::clone(progress));
        }
        let importer = Arc::new(importer);
        self.directory = Some(Arc::clone(&importer));
        Ok(importer)
    }

    /// Authorizes against the directory and loads every connection
    pub async fn populate_directory(&mut self) -> ImportResult<usize> {
        let directory = match self.directory_handle() {
            Ok(directory) => directory,
            Err(e) => return self.reject(SourceKind::Directory, e),
        };
        self.populate_from(directory.as_ref()).await
    }

    fn reject(&mut self, kind: SourceKind, error: ImportError) -> ImportResult<usize> {
        let ticket = self.begin_populating(kind);
        self.accept_batch(ticket, Err(error))
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Flips `selected` on the record at `index`
    pub fn toggle_one(&mut self, index: usize) -> bool {
        self.store.toggle_one(index)
    }

    /// Selects all records, or deselects all if every record is selected
    pub fn toggle_all(&mut self) {
        self.store.toggle_all();
    }

    /// Removes the record at `index`
    pub fn remove_one(&mut self, index: usize) -> Option<ContactRecord> {
        let removed = self.store.remove_one(index);
        if removed.is_some() && self.pending == 0 && self.phase == SessionPhase::Populated {
            self.phase = self.settled_phase();
        }
        removed
    }

    /// Sets the classification applied to every submitted record
    pub fn set_classification(&mut self, classification: Classification) {
        self.classification = classification;
    }

    /// Returns the shared classification
    #[must_use]
    pub const fn classification(&self) -> Classification {
        self.classification
    }

    // ---------------------------------------------------------------------
    // Submission
    // ---------------------------------------------------------------------

    /// Submits the selected records.
    ///
    /// Returns `None` (and makes no call) when nothing is selected or a
    /// report is already showing.
    pub async fn submit(&mut self) -> Option<OutcomeReport> {
        if self.outcome.is_some() {
            return None;
        }
        let previous = self.phase;
        self.phase = SessionPhase::Submitting;

        match self
            .submission
            .submit(self.store.records(), self.classification)
            .await
        {
            Some(report) => {
                self.outcome = Some(report.clone());
                self.phase = SessionPhase::Result;
                Some(report)
            }
            None => {
                self.phase = previous;
                None
            }
        }
    }

    /// Uploads a spreadsheet and shows the backend outcome.
    ///
    /// # Errors
    ///
    /// Returns an error for local problems such as a wrong extension or a
    /// missing file. Backend failures become a failure report instead.
    pub async fn import_tabular(&mut self, path: &Path) -> ImportResult<OutcomeReport> {
        self.select_source(SourceKind::Tabular);
        if self.outcome.is_some() {
            self.reset();
            self.select_source(SourceKind::Tabular);
        }
        let importer = TabularFileImporter::new(Arc::clone(&self.collaborators.file_import))
            .with_extensions(self.options.tabular_extensions.clone());

        self.phase = SessionPhase::Submitting;
        match importer.produce(path).await {
            Ok(report) => {
                self.outcome = Some(report.clone());
                self.phase = SessionPhase::Result;
                Ok(report)
            }
            Err(e) => {
                self.last_error = e.user_message();
                self.phase = SessionPhase::SourceError;
                Err(e)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Returns the current phase
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns the active source
    #[must_use]
    pub const fn active_source(&self) -> Option<SourceKind> {
        self.active_source
    }

    /// Returns the active tab
    #[must_use]
    pub const fn tab(&self) -> Option<SourceTab> {
        self.tab
    }

    /// Returns the accumulation store
    #[must_use]
    pub const fn store(&self) -> &AccumulationStore {
        &self.store
    }

    /// Returns the accumulated records in insertion order
    #[must_use]
    pub fn records(&self) -> &[ContactRecord] {
        self.store.records()
    }

    /// Returns the user-facing message of the last failure
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the outcome report, if one is showing
    #[must_use]
    pub const fn outcome(&self) -> Option<&OutcomeReport> {
        self.outcome.as_ref()
    }

    /// Returns the directory authorization state, if the directory was used
    #[must_use]
    pub fn authorization_state(&self) -> Option<AuthorizationState> {
        self.directory.as_ref().map(|d| d.state())
    }

    /// Returns the session options
    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }
}

impl std::fmt::Debug for ImportSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportSession")
            .field("phase", &self.phase)
            .field("active_source", &self.active_source)
            .field("records", &self.store.len())
            .field("classification", &self.classification)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
