//! Outcome and error type definitions.
//!
//! This module defines the outcome taxonomy fed into the pacing controller
//! and the error enums used throughout the crate.

use std::time::Duration;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// The outcome of one external request attempt.
///
/// All four kinds feed the same consecutive counters; `RateLimited` is
/// distinguished from a generic `Error` only by its effect on the sticky
/// rate-limit flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum Outcome {
    /// The request completed normally.
    Success,
    /// The remote service signaled throttling (e.g. HTTP 429).
    RateLimited,
    /// A transient or unspecified failure.
    Error,
    /// The request exceeded its deadline.
    Timeout,
}

impl Outcome {
    /// Returns the wire name used in the persisted snapshot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::RateLimited => "rate_limit",
            Outcome::Error => "error",
            Outcome::Timeout => "timeout",
        }
    }

    /// Parses a snapshot wire name back into an outcome.
    ///
    /// Returns `None` for names this version does not know, so a snapshot
    /// written by a newer version degrades to skipped events instead of a
    /// load failure.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "success" => Some(Outcome::Success),
            "rate_limit" => Some(Outcome::RateLimited),
            "error" => Some(Outcome::Error),
            "timeout" => Some(Outcome::Timeout),
            _ => None,
        }
    }

    /// True for every kind that increments the failure counter.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Outcome::Success)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `success_reduction` must shrink the delay.
    #[error("success_reduction must be in (0, 1), got {0}")]
    SuccessReductionOutOfRange(f64),

    /// `failure_increase` must grow the delay.
    #[error("failure_increase must be > 1, got {0}")]
    FailureIncreaseOutOfRange(f64),

    /// A zero batch size would make every count a batch boundary.
    #[error("batch_size must be nonzero")]
    ZeroBatchSize,

    /// The delay floor must not exceed the ceiling.
    #[error("min_delay {min:?} exceeds max_dynamic_delay {max:?}")]
    DelayBoundsInverted {
        /// Configured floor.
        min: Duration,
        /// Configured ceiling.
        max: Duration,
    },
}

/// Error types for snapshot persistence.
///
/// These never propagate to callers of the pacer; they are logged as
/// warnings and the in-memory state stays authoritative.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file exists but is not valid snapshot JSON.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}
