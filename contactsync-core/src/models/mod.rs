//! Core data structures shared across the import pipeline.

mod classification;
mod contact;
mod outcome;

pub use classification::Classification;
pub use contact::ContactRecord;
pub use outcome::{GENERIC_FAILURE_MESSAGE, OutcomeReport};
