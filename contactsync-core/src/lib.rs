//! `ContactSync` Core Library
//!
//! Multi-source contact reconciliation: contacts arrive from spreadsheet
//! uploads, vCard text, the device contact picker and an OAuth-gated remote
//! directory, are deduplicated into one working set, curated by an operator
//! and submitted to the backend in a single bulk call.
//!
//! # Crate Structure
//!
//! - [`models`] - Canonical contact record, classification and outcome report
//! - [`import`] - Source adapters (tabular, vCard, picker, directory)
//! - [`store`] - Accumulation store, merge and selection
//! - [`session`] - Import session lifecycle and submission
//! - [`endpoint`] - Backend collaborator traits and the HTTP implementation
//! - [`config`] - Settings and persistence
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod endpoint;
pub mod error;
pub mod import;
pub mod models;
pub mod progress;
pub mod session;
pub mod store;
pub mod tracing;

pub use config::{ConfigManager, Settings};
pub use endpoint::{
    BulkImportEndpoint, BulkImportRow, ExportEndpoint, FileImportEndpoint, HttpBackend,
    request_export,
};
pub use error::{
    AuthorizationError, ConfigError, ConfigResult, ContactSyncError, DirectoryError, ImportError,
    ImportResult, SubmissionError, SubmissionResult,
};
pub use import::directory::{
    AccessToken, AuthorizationProvider, AuthorizationState, ConnectionsApi, PeopleApiClient,
    StaticTokenProvider,
};
pub use import::{
    CardTextImporter, ContactPicker, ContactSource, DirectoryImporter, JsonFilePicker,
    PickerImporter, SourceKind, TabularFileImporter,
};
pub use models::{Classification, ContactRecord, GENERIC_FAILURE_MESSAGE, OutcomeReport};
pub use progress::{
    BusyFlag, BusyGuard, CallbackProgressReporter, NoOpProgressReporter, ProgressReporter,
};
pub use session::{
    DirectoryCollaborators, ImportSession, SessionCollaborators, SessionOptions, SessionPhase,
    SourceTab, SubmissionController,
};
pub use store::{AccumulationStore, IdentityStrategy, merge, merge_with};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, init_tracing,
};
