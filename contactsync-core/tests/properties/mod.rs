//! Property test modules

mod merge_tests;
mod selection_tests;
mod vcard_tests;
