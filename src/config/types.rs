//! Configuration types and CLI options.
//!
//! This module defines the pacing configuration struct and the enums used
//! for command-line argument parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::*;
use crate::error_handling::ConfigError;

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Pacing configuration, fixed for the lifetime of a pacer instance.
///
/// All fields are read after construction only; the controller never
/// mutates its configuration.
///
/// # Examples
///
/// ```
/// use request_pacer::PacerConfig;
/// use std::time::Duration;
///
/// let config = PacerConfig {
///     min_delay: Duration::from_secs(1),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PacerConfig {
    /// Minimum delay between requests; also the starting delay.
    pub min_delay: Duration,

    /// Ceiling for the dynamically adjusted delay.
    pub max_dynamic_delay: Duration,

    /// Items to process before a longer batch break.
    pub batch_size: u32,

    /// Base duration of a batch break.
    pub batch_delay: Duration,

    /// Cooldown callers apply after a generic error.
    pub error_delay: Duration,

    /// Cooldown callers apply after a confirmed rate limit.
    pub rate_limit_delay: Duration,

    /// Delay multiplier after a run of successes (must be < 1).
    pub success_reduction: f64,

    /// Delay multiplier after a run of failures (must be > 1).
    pub failure_increase: f64,

    /// Location of the persisted snapshot.
    pub snapshot_path: PathBuf,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            min_delay: DEFAULT_MIN_DELAY,
            max_dynamic_delay: DEFAULT_MAX_DYNAMIC_DELAY,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            error_delay: DEFAULT_ERROR_DELAY,
            rate_limit_delay: DEFAULT_RATE_LIMIT_DELAY,
            success_reduction: DEFAULT_SUCCESS_REDUCTION,
            failure_increase: DEFAULT_FAILURE_INCREASE,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
        }
    }
}

impl PacerConfig {
    /// Checks the configuration for values the adjustment algorithm cannot
    /// work with.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `success_reduction` is not in `(0, 1)`,
    /// `failure_increase` is not `> 1`, `batch_size` is zero, or
    /// `min_delay` exceeds `max_dynamic_delay`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.success_reduction > 0.0 && self.success_reduction < 1.0) {
            return Err(ConfigError::SuccessReductionOutOfRange(
                self.success_reduction,
            ));
        }
        if self.failure_increase <= 1.0 {
            return Err(ConfigError::FailureIncreaseOutOfRange(
                self.failure_increase,
            ));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.min_delay > self.max_dynamic_delay {
            return Err(ConfigError::DelayBoundsInverted {
                min: self.min_delay,
                max: self.max_dynamic_delay,
            });
        }
        Ok(())
    }
}
