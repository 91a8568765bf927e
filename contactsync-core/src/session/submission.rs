//! Submission controller.
//!
//! Turns the selected subset of the store into one bulk-import call. The
//! controller never propagates a collaborator failure; it folds it into a
//! failure report instead.

use std::sync::Arc;

use tracing::{Instrument, info, instrument, warn};

use crate::endpoint::{BulkImportEndpoint, BulkImportRow};
use crate::models::{Classification, ContactRecord, GENERIC_FAILURE_MESSAGE, OutcomeReport};
use crate::progress::BusyFlag;
use crate::trace_operation;
use crate::tracing::span_names;

/// Submits curated records to the bulk-import collaborator
pub struct SubmissionController {
    endpoint: Arc<dyn BulkImportEndpoint>,
    busy: BusyFlag,
}

impl SubmissionController {
    /// Creates a controller over `endpoint`
    #[must_use]
    pub fn new(endpoint: Arc<dyn BulkImportEndpoint>) -> Self {
        Self {
            endpoint,
            busy: BusyFlag::new(),
        }
    }

    /// Returns true while a submission is in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Builds one row per selected record
    #[must_use]
    pub fn rows<'a>(
        records: impl IntoIterator<Item = &'a ContactRecord>,
        classification: Classification,
    ) -> Vec<BulkImportRow> {
        records
            .into_iter()
            .filter(|r| r.selected)
            .map(|r| BulkImportRow::from_record(r, classification))
            .collect()
    }

    /// Submits the selected records.
    ///
    /// Returns `None` without calling the endpoint when nothing is selected
    /// or a submission is already running. Otherwise returns exactly one
    /// report; a failed call yields the generic failure report.
    #[instrument(skip(self, records), fields(classification = %classification))]
    pub async fn submit(
        &self,
        records: &[ContactRecord],
        classification: Classification,
    ) -> Option<OutcomeReport> {
        let rows = Self::rows(records, classification);
        if rows.is_empty() {
            info!("Nothing selected, submission skipped");
            return None;
        }

        let Some(_guard) = self.busy.try_acquire() else {
            warn!("Submission already in progress");
            return None;
        };

        let report = match self
            .endpoint
            .bulk_import(&rows)
            .instrument(trace_operation!(span_names::SUBMISSION_SUBMIT, rows = rows.len()))
            .await
        {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, rows = rows.len(), "Bulk import failed");
                OutcomeReport::failure(GENERIC_FAILURE_MESSAGE)
            }
        };
        info!(rows = rows.len(), summary = %report.summary(), "Submission finished");
        Some(report)
    }
}

impl std::fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionController")
            .field("busy", &self.busy)
            .finish_non_exhaustive()
    }
}
