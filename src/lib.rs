//! request_pacer library: adaptive pacing for rate-limited clients
//!
//! This library paces a client that repeatedly issues requests against a
//! remote service with an undocumented, dynamic rate limit. A
//! [`RequestPacer`] observes every request outcome and continuously
//! retunes the delay applied before the next request: runs of successes
//! shrink it, runs of failures grow it, and a confirmed rate-limit signal
//! escalates it further. State survives restarts through a JSON snapshot
//! with a 24-hour staleness cutoff.
//!
//! # Example
//!
//! ```no_run
//! use request_pacer::{Outcome, PacerConfig, RequestPacer};
//! use std::time::Instant;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut pacer = RequestPacer::new(PacerConfig::default());
//! let cancel = CancellationToken::new();
//!
//! for processed in 0..100u32 {
//!     if pacer.should_take_break(processed) {
//!         pacer.wait(pacer.batch_delay(), "Batch cooldown", &cancel).await;
//!     }
//!
//!     let delay = pacer.next_delay();
//!     pacer.wait(delay, "Rate limiting", &cancel).await;
//!
//!     let started = Instant::now();
//!     let outcome = Outcome::Success; // perform the real request here
//!     pacer.record_outcome(outcome, delay, started.elapsed(), "");
//! }
//!
//! println!("{}", pacer.status_report().message);
//! # }
//! ```
//!
//! # Requirements
//!
//! The wait methods require a Tokio runtime; everything else is
//! runtime-agnostic.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
pub mod initialization;
mod pacer;
mod snapshot;

// Re-export public API
pub use config::{LogFormat, LogLevel, PacerConfig};
pub use error_handling::{
    categorize_reqwest_error, categorize_status, ConfigError, InitializationError, Outcome,
    SnapshotError,
};
pub use pacer::{HealthStatus, RequestPacer, StatusReport, WaitProgress, WaitResult};
