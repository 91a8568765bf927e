//! Error types for `ContactSync`
//!
//! Each concern owns a `thiserror` enum. Adapter failures use [`ImportError`],
//! whose variants mirror the user-visible failure taxonomy: parse failures,
//! empty results, silent cancellations, authorization denials and fetch
//! failures. None of them is fatal to the session.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `ContactSync` core
#[derive(Debug, Error)]
pub enum ContactSyncError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Import error from one of the source adapters
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Bulk submission collaborator error
    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by source adapters
#[derive(Debug, Error)]
pub enum ImportError {
    /// Input could not be read or is malformed beyond recovery
    #[error("Failed to parse {source_name}: {reason}")]
    ParseFailure {
        /// Human-readable name of the source
        source_name: String,
        /// Why parsing failed
        reason: String,
    },

    /// The source succeeded but produced no usable entries
    #[error("No entries found in {source_name}")]
    EmptyResult {
        /// Human-readable name of the source
        source_name: String,
    },

    /// The operator dismissed the native picker
    #[error("Contact selection was cancelled")]
    UserCancelled,

    /// The directory provider refused or failed the token request
    #[error("Authorization failed: {0}")]
    AuthorizationDenied(String),

    /// The directory listing failed after a valid token was granted
    #[error("Failed to fetch directory contacts: {0}")]
    FetchFailed(String),

    /// The source file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The source file extension is not in the allow-list
    #[error("Unsupported file extension for {path}; expected one of: {expected}")]
    UnsupportedExtension {
        /// Offending path
        path: PathBuf,
        /// Comma-separated allowed extensions
        expected: String,
    },

    /// The host does not advertise the native contact capability
    #[error("{0} is not available on this device")]
    CapabilityUnavailable(String),

    /// Another import for the same source is still running
    #[error("An import from {0} is already in progress")]
    Busy(String),
}

impl ImportError {
    /// Creates a parse failure for the named source
    pub fn parse(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseFailure {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an empty-result error for the named source
    pub fn empty(source_name: impl Into<String>) -> Self {
        Self::EmptyResult {
            source_name: source_name.into(),
        }
    }

    /// Returns true for failures that must not be surfaced to the operator
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }

    /// Returns true when the failure came from the remote directory
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::AuthorizationDenied(_) | Self::FetchFailed(_))
    }

    /// Short message suitable for display next to the active source.
    ///
    /// Returns `None` for silent failures.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::UserCancelled => None,
            Self::ParseFailure { source_name, .. } => {
                Some(format!("Could not read the {source_name} input"))
            }
            Self::EmptyResult { source_name } => Some(format!("No contacts found in {source_name}")),
            Self::AuthorizationDenied(_) => {
                Some("Access to the contact directory was not granted".to_string())
            }
            Self::FetchFailed(_) => Some("Contacts could not be loaded from the directory".to_string()),
            other => Some(other.to_string()),
        }
    }
}

/// Errors raised by the bulk-import, file-import and export collaborators
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The request could not be delivered
    #[error("Transport error: {0}")]
    Transport(String),

    /// The collaborator answered with a non-success status
    #[error("Backend rejected the request with HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while listing the remote directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The request could not be delivered
    #[error("Transport error: {0}")]
    Transport(String),

    /// The bearer token was rejected
    #[error("Directory rejected the access token (HTTP {0})")]
    Unauthorized(u16),

    /// Any other non-success status
    #[error("Directory returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// The listing body did not match the expected shape
    #[error("Invalid directory response: {0}")]
    InvalidResponse(String),
}

/// Errors raised by the directory authorization provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// The provider client library could not be loaded
    #[error("Failed to load authorization client: {0}")]
    ClientLoad(String),

    /// The provider reported an error code (e.g. `access_denied`)
    #[error("Provider returned error: {0}")]
    Provider(String),

    /// The response handler was dropped before delivering a result
    #[error("Authorization response was never delivered")]
    NoResponse,
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {reason}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Reason for validation failure
        reason: String,
    },

    /// The platform config directory could not be determined
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// IO error while reading or writing configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for import operations
pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for collaborator calls
pub type SubmissionResult<T> = std::result::Result<T, SubmissionError>;
