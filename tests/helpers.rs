// Shared test helpers for pacer construction.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::path::Path;
use std::time::Duration;

use request_pacer::PacerConfig;

/// Config with millisecond-scale delays so timing tests run fast.
#[allow(dead_code)] // Used by other test files
pub fn fast_config(dir: &Path) -> PacerConfig {
    PacerConfig {
        min_delay: Duration::from_millis(40),
        max_dynamic_delay: Duration::from_millis(400),
        batch_delay: Duration::from_millis(200),
        error_delay: Duration::from_millis(100),
        rate_limit_delay: Duration::from_millis(300),
        snapshot_path: dir.join("rate_analysis.json"),
        ..Default::default()
    }
}

/// Default config rooted at a temporary snapshot path.
#[allow(dead_code)] // Used by other test files
pub fn default_config(dir: &Path) -> PacerConfig {
    PacerConfig {
        snapshot_path: dir.join("rate_analysis.json"),
        ..Default::default()
    }
}
