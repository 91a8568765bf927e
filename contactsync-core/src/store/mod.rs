//! Accumulation store and selection controller.
//!
//! Every adapter batch enters the session through [`merge`] (or
//! [`AccumulationStore::merge_batch`]); the operator then curates the working
//! set with `toggle_one`, `toggle_all` and `remove_one`.

mod accumulation;
mod selection;

pub use accumulation::{AccumulationStore, IdentityStrategy, merge, merge_with};
