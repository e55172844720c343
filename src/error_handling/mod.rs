//! Outcome taxonomy and error handling.
//!
//! This module provides:
//! - The [`Outcome`] kinds reported back to the pacing controller
//! - Typed errors for configuration, snapshot persistence, and
//!   initialization
//! - Categorization of HTTP failures into outcome kinds

mod categorization;
mod types;

pub use categorization::{categorize_reqwest_error, categorize_status};
pub use types::{ConfigError, InitializationError, Outcome, SnapshotError};
