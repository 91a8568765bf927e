//! Import session state and submission.
//!
//! An [`ImportSession`] walks through
//! `Idle -> SourceSelected -> Populating -> Populated | SourceError -> Submitting -> Result`
//! and is discarded in full on tab switch, close, or when the outcome is
//! dismissed.

mod lifecycle;
mod submission;

pub use lifecycle::{
    DirectoryCollaborators, ImportSession, PopulateTicket, SessionCollaborators, SessionOptions,
    SessionPhase, SourceTab,
};
pub use submission::SubmissionController;
