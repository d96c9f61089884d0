/// Shared Test Helpers for Cross-Crate Use
///
/// Centralized test utilities used by both the `pricing` and `acquiring`
/// test suites to avoid code duplication.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{CommonConfig, Config, DataConfig, ProcessorConfig};

// Global counter for truly unique test identifiers across parallel tests
static GLOBAL_TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate globally unique test identifiers that won't conflict across
/// parallel tests.
///
/// # Arguments
/// * `prefix` - A string prefix to identify the test type (e.g., "MERCHANT")
///
/// # Returns
/// A unique string in the format: "{prefix}-{timestamp}-{counter}"
pub fn generate_unique_id(prefix: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    let counter = GLOBAL_TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}-{}", prefix, timestamp, counter)
}

/// A fully populated configuration for tests that exercise the executables'
/// wiring without reading a file from disk.
pub fn test_config() -> Config {
    Config {
        common: CommonConfig {
            project_name: "tarifa-test".to_string(),
        },
        processor: ProcessorConfig {
            workers: 2,
            log_level: "debug".to_string(),
        },
        data: DataConfig::default(),
    }
}
