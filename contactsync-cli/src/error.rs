//! CLI error types and exit codes.

use contactsync_core::error::{ConfigError, ContactSyncError, ImportError, SubmissionError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or input errors
    pub const GENERAL_ERROR: i32 = 1;
    /// Remote failure - the directory or the backend could not be used
    pub const REMOTE_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Import error
    #[error("Import error: {0}")]
    Import(String),

    /// Directory authorization or listing error
    #[error("Directory error: {0}")]
    Directory(String),

    /// Backend error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Export error
    #[error("Export error: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ContactSyncError> for CliError {
    fn from(err: ContactSyncError) -> Self {
        match err {
            ContactSyncError::Config(e) => e.into(),
            ContactSyncError::Import(e) => e.into(),
            ContactSyncError::Submission(e) => e.into(),
            ContactSyncError::Io(e) => Self::Io(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ImportError> for CliError {
    fn from(err: ImportError) -> Self {
        if err.is_remote() {
            Self::Directory(err.to_string())
        } else {
            Self::Import(err.to_string())
        }
    }
}

impl From<SubmissionError> for CliError {
    fn from(err: SubmissionError) -> Self {
        Self::Backend(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, input, IO)
    /// - 2: Remote failure (directory or backend)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Directory(_) | Self::Backend(_) | Self::Export(_) => exit_codes::REMOTE_FAILURE,
            Self::Config(_) | Self::Import(_) | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
