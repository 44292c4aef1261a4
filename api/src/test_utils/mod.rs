//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - Several services take more than one repository and need them to agree
//!   on shared state (deleting a flair must clear it from posts)
//! - A single in-memory store keeps cascades and uniqueness in one place
//! - We control exactly what they return without macro magic
//!
//! Router-level tests live in `integration_tests` and only cover paths that
//! never reach the database.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
