//! Native device contact picker importer.
//!
//! The host exposes its contact store through [`ContactPicker`]. The importer
//! asks for a multi-select of name, email and phone, keeps the first value of
//! each property and drops entries without a name. Dismissing the picker
//! yields [`ImportError::UserCancelled`], which callers treat as silent.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::error::{ImportError, ImportResult};
use crate::models::ContactRecord;

use super::traits::{ContactSource, SourceKind, read_import_file};

/// Contact properties a picker can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactProperty {
    /// Display name
    Name,
    /// Email address
    Email,
    /// Telephone number
    Tel,
}

/// Properties requested by [`PickerImporter`]
pub const PICKER_PROPERTIES: &[ContactProperty] =
    &[ContactProperty::Name, ContactProperty::Email, ContactProperty::Tel];

/// One contact as returned by the device picker.
///
/// Each property may carry several values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContact {
    /// Name values
    #[serde(default)]
    pub name: Vec<String>,
    /// Email values
    #[serde(default)]
    pub email: Vec<String>,
    /// Telephone values
    #[serde(default)]
    pub tel: Vec<String>,
}

impl RawContact {
    /// Maps the first non-blank value of each property to a record.
    ///
    /// Returns `None` when there is no non-blank name.
    #[must_use]
    pub fn to_record(&self) -> Option<ContactRecord> {
        fn first(values: &[String]) -> Option<&str> {
            values
                .iter()
                .map(String::as_str)
                .find(|v| !v.trim().is_empty())
        }
        Some(
            ContactRecord::new(first(&self.name)?)?
                .with_email(first(&self.email))
                .with_phone(first(&self.tel)),
        )
    }
}

/// Failure reported by the host picker
#[derive(Debug, Error)]
pub enum PickerError {
    /// The operator dismissed the picker
    #[error("Picker dismissed")]
    Cancelled,
    /// The host failed to provide contacts
    #[error("Picker failed: {0}")]
    Failed(String),
}

/// Host capability giving access to on-device contacts
#[async_trait]
pub trait ContactPicker: Send + Sync {
    /// Returns true if the host advertises the contact picker
    fn has_feature(&self) -> bool;

    /// Lets the operator pick contacts.
    ///
    /// An empty list is how some hosts report a dismissed picker.
    async fn select(
        &self,
        properties: &[ContactProperty],
        multiple: bool,
    ) -> Result<Vec<RawContact>, PickerError>;
}

/// Importer over a host [`ContactPicker`]
pub struct PickerImporter {
    picker: Arc<dyn ContactPicker>,
}

impl PickerImporter {
    /// Creates an importer over `picker`
    #[must_use]
    pub fn new(picker: Arc<dyn ContactPicker>) -> Self {
        Self { picker }
    }

    /// Returns true if the host advertises the capability
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.picker.has_feature()
    }
}

#[async_trait]
impl ContactSource for PickerImporter {
    fn kind(&self) -> SourceKind {
        SourceKind::Picker
    }

    #[instrument(skip(self), fields(source = "picker"))]
    async fn produce(&self) -> ImportResult<Vec<ContactRecord>> {
        let source_name = SourceKind::Picker.display_name();
        if !self.is_available() {
            return Err(ImportError::CapabilityUnavailable(source_name.to_string()));
        }

        let picked = match self.picker.select(PICKER_PROPERTIES, true).await {
            Ok(picked) => picked,
            Err(PickerError::Cancelled) => {
                info!("Contact picker dismissed");
                return Err(ImportError::UserCancelled);
            }
            Err(PickerError::Failed(reason)) => return Err(ImportError::parse(source_name, reason)),
        };

        if picked.is_empty() {
            info!("Contact picker returned no selection");
            return Err(ImportError::UserCancelled);
        }

        let records: Vec<ContactRecord> = picked.iter().filter_map(RawContact::to_record).collect();
        debug!(picked = picked.len(), kept = records.len(), "Mapped picked contacts");

        if records.is_empty() {
            return Err(ImportError::empty(source_name));
        }
        Ok(records)
    }
}

/// Picker backed by a JSON file of [`RawContact`] entries.
///
/// Stands in for a device contact store where none is reachable. The
/// capability is advertised only when the file exists.
#[derive(Debug, Clone)]
pub struct JsonFilePicker {
    path: PathBuf,
}

impl JsonFilePicker {
    /// Creates a picker reading `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContactPicker for JsonFilePicker {
    fn has_feature(&self) -> bool {
        self.path.is_file()
    }

    async fn select(
        &self,
        _properties: &[ContactProperty],
        _multiple: bool,
    ) -> Result<Vec<RawContact>, PickerError> {
        let text = read_import_file(&self.path, SourceKind::Picker.display_name())
            .await
            .map_err(|e| PickerError::Failed(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| PickerError::Failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPicker {
        available: bool,
        result: fn() -> Result<Vec<RawContact>, PickerError>,
    }

    #[async_trait]
    impl ContactPicker for FixedPicker {
        fn has_feature(&self) -> bool {
            self.available
        }

        async fn select(
            &self,
            properties: &[ContactProperty],
            multiple: bool,
        ) -> Result<Vec<RawContact>, PickerError> {
            assert_eq!(properties, PICKER_PROPERTIES);
            assert!(multiple);
            (self.result)()
        }
    }

    fn raw(name: &[&str], email: &[&str], tel: &[&str]) -> RawContact {
        let owned = |v: &[&str]| v.iter().map(ToString::to_string).collect();
        RawContact {
            name: owned(name),
            email: owned(email),
            tel: owned(tel),
        }
    }

    fn importer(available: bool, result: fn() -> Result<Vec<RawContact>, PickerError>) -> PickerImporter {
        PickerImporter::new(Arc::new(FixedPicker { available, result }))
    }

    #[tokio::test]
    async fn first_value_per_property_is_used() {
        let records = importer(true, || {
            Ok(vec![raw(
                &["Ann Lee", "Annie"],
                &["ann@a.example", "ann@b.example"],
                &["111", "222"],
            )])
        })
        .produce()
        .await
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity, "Ann Lee");
        assert_eq!(records[0].email.as_deref(), Some("ann@a.example"));
        assert_eq!(records[0].phone.as_deref(), Some("111"));
    }

    #[tokio::test]
    async fn nameless_entries_are_dropped() {
        let records = importer(true, || {
            Ok(vec![raw(&[], &["x@example.com"], &[]), raw(&["Bo"], &[], &[])])
        })
        .produce()
        .await
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity, "Bo");
    }

    #[tokio::test]
    async fn cancellation_is_silent() {
        let err = importer(true, || Err(PickerError::Cancelled))
            .produce()
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::UserCancelled));
        assert!(err.is_silent());

        let err = importer(true, || Ok(Vec::new())).produce().await.unwrap_err();
        assert!(err.is_silent());
    }

    #[test]
    fn blank_leading_values_are_skipped() {
        let record = raw(&["", "Ann Lee"], &["  ", "ann@example.com"], &[])
            .to_record()
            .unwrap();
        assert_eq!(record.identity, "Ann Lee");
        assert_eq!(record.email.as_deref(), Some("ann@example.com"));
        assert_eq!(record.phone, None);
    }

    #[tokio::test]
    async fn only_nameless_entries_is_empty_result() {
        let err = importer(true, || Ok(vec![raw(&[" "], &["a@b.c"], &[])]))
            .produce()
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::EmptyResult { .. }));
    }

    #[tokio::test]
    async fn missing_capability_is_reported() {
        let err = importer(false, || Ok(Vec::new())).produce().await.unwrap_err();
        assert!(matches!(err, ImportError::CapabilityUnavailable(_)));
    }

    #[tokio::test]
    async fn json_file_picker_reads_contacts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");
        std::fs::write(
            &path,
            r#"[{"name":["Dee"],"tel":["+1 555 0101"]},{"email":["no-name@example.com"]}]"#,
        )
        .unwrap();

        let picker = JsonFilePicker::new(&path);
        assert!(picker.has_feature());
        let records = PickerImporter::new(Arc::new(picker)).produce().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].phone.as_deref(), Some("+1 555 0101"));
    }

    #[test]
    fn json_file_picker_without_file_is_unavailable() {
        assert!(!JsonFilePicker::new("/nonexistent/device.json").has_feature());
    }
}
