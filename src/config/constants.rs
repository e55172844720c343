//! Pacing constants.
//!
//! This module defines the fixed constants used by the pacing controller:
//! default delays, adjustment factors, and snapshot parameters. All of them
//! are compile-time defaults; per-instance values live in [`PacerConfig`].
//!
//! [`PacerConfig`]: crate::config::PacerConfig

use std::time::Duration;

/// Minimum delay between requests.
/// Also the starting value of `current_delay` for a fresh controller.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(3);
/// Ceiling for the dynamically adjusted delay.
pub const DEFAULT_MAX_DYNAMIC_DELAY: Duration = Duration::from_secs(30);

/// Items to process before a longer batch break.
pub const DEFAULT_BATCH_SIZE: u32 = 10;
/// Break between batches (5 minutes).
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(300);
/// Cooldown callers apply after a generic error (1 minute).
pub const DEFAULT_ERROR_DELAY: Duration = Duration::from_secs(60);
/// Cooldown callers apply after a confirmed rate limit (15 minutes).
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(900);

/// Multiplier applied to `current_delay` after a run of successes.
pub const DEFAULT_SUCCESS_REDUCTION: f64 = 0.9;
/// Multiplier applied to `current_delay` after a run of failures.
pub const DEFAULT_FAILURE_INCREASE: f64 = 1.5;

/// Consecutive successes required before the delay is reduced.
pub const SUCCESS_STREAK_THRESHOLD: u32 = 5;
/// Consecutive failures required before the delay is increased.
pub const FAILURE_STREAK_THRESHOLD: u32 = 2;
/// Extra multiplier applied while a rate limit is in effect and failures
/// are still accumulating.
pub const RATE_LIMIT_DELAY_MULTIPLIER: f64 = 2.0;

// Jitter bounds for next_delay(). A uniform draw in this range defeats
// request-interval pattern detection by the remote service.
/// Lower jitter bound.
pub const JITTER_MIN: f64 = 0.8;
/// Upper jitter bound.
pub const JITTER_MAX: f64 = 1.2;

/// Batch delay multiplier while a rate limit is in effect.
pub const BATCH_RATE_LIMIT_FACTOR: f64 = 1.5;
/// Batch delay multiplier after a long run of successes.
pub const BATCH_SUCCESS_FACTOR: f64 = 0.8;
/// Consecutive successes required for the batch delay reduction.
pub const BATCH_SUCCESS_STREAK: u32 = 20;

/// Window of events considered by the status reporter.
pub const STATUS_WINDOW: Duration = Duration::from_secs(3600);
/// Success rate above which the session is classified as optimal.
pub const OPTIMAL_SUCCESS_RATE: f64 = 0.9;
/// Success rate above which the session is classified as cautious.
pub const CAUTIOUS_SUCCESS_RATE: f64 = 0.7;

/// Default location of the persisted snapshot (one file per process).
pub const DEFAULT_SNAPSHOT_PATH: &str = "./rate_analysis.json";
/// Snapshots older than this are discarded on load.
pub const SNAPSHOT_MAX_AGE: Duration = Duration::from_secs(24 * 3600);
/// Maximum number of events kept in the snapshot and in memory after a save.
pub const SNAPSHOT_EVENT_CAP: usize = 100;
/// The controller persists every time the event count reaches a multiple
/// of this value.
pub const SNAPSHOT_SAVE_INTERVAL: usize = 10;

/// Waits longer than this emit per-tick progress updates.
pub const PROGRESS_DISPLAY_THRESHOLD: Duration = Duration::from_secs(5);
/// Granularity of progress updates during a long wait.
pub const PROGRESS_TICK: Duration = Duration::from_secs(1);
