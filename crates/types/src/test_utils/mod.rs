//! Test utilities: fixture data and scriptable collaborator doubles
//!
//! Enabled for this crate's own tests and, through the `test-utils` feature,
//! for the tests of downstream crates.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
