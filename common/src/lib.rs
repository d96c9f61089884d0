pub mod config;

/// Shared plumbing for the tarifa workspace.
///
/// This crate holds the pieces both the `pricing` engine and the
/// `acquiring` binding need: the YAML configuration model consumed by the
/// executables, and the test helpers shared across crate test suites.

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{generate_unique_id, test_config};
