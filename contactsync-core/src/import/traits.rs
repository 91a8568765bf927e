//! Contact source trait and shared helpers.
//!
//! Every source that yields canonical records implements [`ContactSource`].
//! Sources never touch the accumulation store themselves; the session merges
//! whatever `produce` returns.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{ImportError, ImportResult};
use crate::models::ContactRecord;

/// Origin of a batch of contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Structured tabular file handed to the backend as-is
    Tabular,
    /// vCard text
    CardText,
    /// Native device contact picker
    Picker,
    /// OAuth-gated remote directory
    Directory,
}

impl SourceKind {
    /// Returns the stable identifier used in logs
    #[must_use]
    pub const fn source_id(&self) -> &'static str {
        match self {
            Self::Tabular => "tabular",
            Self::CardText => "card_text",
            Self::Picker => "picker",
            Self::Directory => "directory",
        }
    }

    /// Returns a human-readable name for this source
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Tabular => "spreadsheet file",
            Self::CardText => "contact cards",
            Self::Picker => "device contacts",
            Self::Directory => "contact directory",
        }
    }

    /// Returns true if the source feeds the accumulation store
    #[must_use]
    pub const fn accumulates(&self) -> bool {
        !matches!(self, Self::Tabular)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A source that produces canonical contact records.
///
/// `produce` distinguishes "nothing found" ([`ImportError::EmptyResult`]) from
/// failure. An `Ok` with an empty batch means the operator backed out and
/// nothing should be reported.
#[async_trait]
pub trait ContactSource: Send + Sync {
    /// Returns which kind of source this is
    fn kind(&self) -> SourceKind;

    /// Produces one batch of records
    ///
    /// # Errors
    ///
    /// Returns an error if the source could not be read or yielded nothing.
    async fn produce(&self) -> ImportResult<Vec<ContactRecord>>;
}

/// Reads a whole import file with consistent error mapping.
///
/// A missing file maps to [`ImportError::FileNotFound`]; any other IO error
/// is a parse failure for `source_name`.
pub async fn read_import_bytes(path: &Path, source_name: &str) -> ImportResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ImportError::FileNotFound(path.to_path_buf())
        } else {
            ImportError::parse(
                source_name,
                format!("Failed to read {}: {}", path.display(), e),
            )
        }
    })
}

/// Reads an import file as UTF-8 text
pub async fn read_import_file(path: &Path, source_name: &str) -> ImportResult<String> {
    let bytes = read_import_bytes(path, source_name).await?;
    String::from_utf8(bytes).map_err(|e| {
        ImportError::parse(
            source_name,
            format!("{} is not valid UTF-8: {}", path.display(), e),
        )
    })
}
