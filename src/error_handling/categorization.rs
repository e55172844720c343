//! HTTP error categorization.
//!
//! This module maps HTTP-level failures onto the outcome taxonomy so that
//! callers driving `reqwest` can report request results without
//! re-implementing the 429/timeout distinction.

use reqwest::StatusCode;

use super::types::Outcome;

/// Categorizes an HTTP status code into an [`Outcome`].
///
/// Success statuses map to `Success`, 429 and 503 map to `RateLimited`
/// (both are used by throttling front-ends), 408 and 504 to `Timeout`,
/// and every other error status to `Error`.
pub fn categorize_status(status: StatusCode) -> Outcome {
    match status.as_u16() {
        429 | 503 => Outcome::RateLimited,
        408 | 504 => Outcome::Timeout,
        _ if status.is_client_error() || status.is_server_error() => Outcome::Error,
        _ => Outcome::Success,
    }
}

/// Categorizes a `reqwest::Error` into an [`Outcome`].
///
/// Checks the embedded HTTP status first, then the transport error kind.
/// Anything that is neither a throttling signal nor a timeout is a generic
/// `Error`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> Outcome {
    if let Some(status) = error.status() {
        return categorize_status(status);
    }

    if error.is_timeout() {
        Outcome::Timeout
    } else {
        Outcome::Error
    }
}
