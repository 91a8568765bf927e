//! Classification tag applied to every submitted contact.

use serde::{Deserialize, Serialize};

/// Category shared by all records of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Customer or client contact
    #[default]
    Customer,
    /// Supplier or vendor contact
    Supplier,
    /// Business partner
    Partner,
    /// Internal staff member
    Employee,
    /// Anything else
    Other,
}

impl Classification {
    /// Returns all classifications in display order
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Customer,
            Self::Supplier,
            Self::Partner,
            Self::Employee,
            Self::Other,
        ]
    }

    /// Returns the wire value sent to the bulk-import backend
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
            Self::Partner => "partner",
            Self::Employee => "employee",
            Self::Other => "other",
        }
    }

    /// Returns the display name for this classification
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Supplier => "Supplier",
            Self::Partner => "Partner",
            Self::Employee => "Employee",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown classification: {s}"))
    }
}
