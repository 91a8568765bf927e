//! Integration test modules

mod directory_tests;
mod fakes;
mod session_tests;
