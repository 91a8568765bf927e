//! Session working set and the merge that feeds it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::ContactRecord;

/// How two records are recognized as the same person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStrategy {
    /// Exact, case-sensitive display name.
    ///
    /// Two different people sharing a name collide and the later one is
    /// dropped.
    #[default]
    Name,
    /// Display name plus lowercased email and digits-only phone
    NameAndContact,
}

impl IdentityStrategy {
    /// Builds the dedup key for `record`
    #[must_use]
    pub fn key(&self, record: &ContactRecord) -> String {
        match self {
            Self::Name => record.identity.clone(),
            Self::NameAndContact => {
                let email = record
                    .email
                    .as_deref()
                    .map(|e| e.trim().to_lowercase())
                    .unwrap_or_default();
                let phone: String = record
                    .phone
                    .as_deref()
                    .unwrap_or_default()
                    .chars()
                    .filter(char::is_ascii_digit)
                    .collect();
                format!("{}\u{1f}{email}\u{1f}{phone}", record.identity)
            }
        }
    }
}

impl std::str::FromStr for IdentityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "name_and_contact" | "name-and-contact" => Ok(Self::NameAndContact),
            other => Err(format!("unknown identity strategy: {other}")),
        }
    }
}

/// Merges `incoming` into `existing` by display name.
///
/// Existing records keep their position, fields and `selected` state. Incoming
/// records whose identity is already present (including earlier in the same
/// batch) are dropped; the rest are appended in batch order.
#[must_use]
pub fn merge(existing: &[ContactRecord], incoming: Vec<ContactRecord>) -> Vec<ContactRecord> {
    merge_with(existing, incoming, IdentityStrategy::Name)
}

/// Same as [`merge`] with an explicit identity strategy
#[must_use]
pub fn merge_with(
    existing: &[ContactRecord],
    incoming: Vec<ContactRecord>,
    strategy: IdentityStrategy,
) -> Vec<ContactRecord> {
    let mut seen: HashSet<String> = existing.iter().map(|r| strategy.key(r)).collect();
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());
    merged.extend_from_slice(existing);

    for record in incoming {
        if seen.insert(strategy.key(&record)) {
            merged.push(record);
        }
    }

    merged
}

/// Ordered, deduplicated set of records collected during one session
#[derive(Debug, Clone, Default)]
pub struct AccumulationStore {
    pub(super) records: Vec<ContactRecord>,
    strategy: IdentityStrategy,
}

impl AccumulationStore {
    /// Creates an empty store keyed by display name
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given identity strategy
    #[must_use]
    pub fn with_strategy(strategy: IdentityStrategy) -> Self {
        Self {
            records: Vec::new(),
            strategy,
        }
    }

    /// Returns the identity strategy in use
    #[must_use]
    pub const fn strategy(&self) -> IdentityStrategy {
        self.strategy
    }

    /// Merges a batch and returns how many records were added
    pub fn merge_batch(&mut self, incoming: Vec<ContactRecord>) -> usize {
        let before = self.records.len();
        self.records = merge_with(&self.records, incoming, self.strategy);
        let added = self.records.len() - before;
        tracing::debug!(added, total = self.records.len(), "Merged contact batch");
        added
    }

    /// Returns all records in insertion order
    #[must_use]
    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    /// Returns the number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
