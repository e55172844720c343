//! Application initialization.
//!
//! This module provides the logger bootstrap used by the CLI binary and
//! by embedding applications that want the same log formatting.

mod logger;

pub use logger::init_logger_with;
