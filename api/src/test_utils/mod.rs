//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - The repositories are plain key-value stores, so an in-memory map is
//!   simpler than scripting expectations
//! - Manual mocks are more explicit and easier to debug
//! - Tests can inspect what was written after the call

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
