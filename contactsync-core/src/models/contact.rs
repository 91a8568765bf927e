//! Canonical contact record shared by every import source.

use serde::{Deserialize, Serialize};

/// A person record normalized from any import source.
///
/// `identity` is the display name as parsed or picked and is never empty.
/// Every adapter creates records with `selected` set to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Full display name, used as the deduplication key
    pub identity: String,
    /// Email address as provided by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number as provided by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Whether the record takes part in the next submission
    #[serde(default = "default_selected")]
    pub selected: bool,
}

const fn default_selected() -> bool {
    true
}

impl ContactRecord {
    /// Creates a selected record with only a display name.
    ///
    /// Returns `None` when the trimmed name is empty.
    #[must_use]
    pub fn new(identity: impl AsRef<str>) -> Option<Self> {
        let identity = identity.as_ref().trim();
        if identity.is_empty() {
            return None;
        }
        Some(Self {
            identity: identity.to_string(),
            email: None,
            phone: None,
            selected: true,
        })
    }

    /// Sets the email, ignoring blank values
    #[must_use]
    pub fn with_email(mut self, email: Option<impl AsRef<str>>) -> Self {
        self.email = non_blank(email);
        self
    }

    /// Sets the phone, ignoring blank values
    #[must_use]
    pub fn with_phone(mut self, phone: Option<impl AsRef<str>>) -> Self {
        self.phone = non_blank(phone);
        self
    }
}

fn non_blank(value: Option<impl AsRef<str>>) -> Option<String> {
    value
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
}
