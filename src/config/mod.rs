//! Pacer configuration and constants.
//!
//! This module provides:
//! - Pacing constants (delays, adjustment factors, snapshot parameters)
//! - The [`PacerConfig`] struct and CLI option types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, PacerConfig};
