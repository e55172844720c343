//! Health classification over the recent event window.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::config::{CAUTIOUS_SUCCESS_RATE, OPTIMAL_SUCCESS_RATE, STATUS_WINDOW};
use crate::error_handling::Outcome;
use crate::pacer::controller::RequestPacer;

/// Health classification of the pacing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// No events in the last hour.
    NoData,
    /// A rate limit is currently in effect.
    RateLimited,
    /// Success rate above 90%.
    Optimal,
    /// Success rate above 70%.
    Cautious,
    /// Success rate at or below 70%.
    Problematic,
}

impl HealthStatus {
    /// Returns the snake_case name also used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::NoData => "no_data",
            HealthStatus::RateLimited => "rate_limited",
            HealthStatus::Optimal => "optimal",
            HealthStatus::Cautious => "cautious",
            HealthStatus::Problematic => "problematic",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot of the pacing situation.
///
/// Produced by [`RequestPacer::status_report`]; computing it never mutates
/// controller state. Serializes with durations as float seconds.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Health classification.
    pub status: HealthStatus,
    /// Human-readable summary of the classification.
    pub message: String,
    /// Share of successful events in the window; absent without data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    /// The current learned delay.
    #[serde(serialize_with = "serialize_secs")]
    pub current_delay: Duration,
    /// Mean delay used across the window; absent without data.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_secs"
    )]
    pub avg_delay: Option<Duration>,
    /// Length of the current success run.
    pub consecutive_successes: u32,
    /// Length of the current failure run.
    pub consecutive_failures: u32,
    /// Whether a rate limit is currently in effect.
    pub rate_limit_detected: bool,
    /// Number of events inside the one-hour window.
    pub events_last_hour: usize,
}

fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

fn serialize_opt_secs<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_f64(d.as_secs_f64()),
        None => s.serialize_none(),
    }
}

impl RequestPacer {
    /// Derives a health classification from the last hour of events.
    ///
    /// Classification priority: an active rate limit always wins, then
    /// success-rate thresholds. An empty window reports `NoData` with the
    /// current delay and no rate-limit claim.
    pub fn status_report(&self) -> StatusReport {
        let recent = self.events().recent(STATUS_WINDOW);

        if recent.is_empty() {
            return StatusReport {
                status: HealthStatus::NoData,
                message: "No recent activity to analyze".to_string(),
                success_rate: None,
                current_delay: self.current_delay(),
                avg_delay: None,
                consecutive_successes: self.consecutive_successes(),
                consecutive_failures: self.consecutive_failures(),
                rate_limit_detected: false,
                events_last_hour: 0,
            };
        }

        let successes = recent
            .iter()
            .filter(|e| e.outcome == Outcome::Success)
            .count();
        let success_rate = successes as f64 / recent.len() as f64;
        let avg_delay = recent.iter().map(|e| e.delay_used).sum::<Duration>()
            / recent.len() as u32;

        let (status, message) = if self.rate_limit_detected() {
            (
                HealthStatus::RateLimited,
                "Rate limiting detected - using conservative delays",
            )
        } else if success_rate > OPTIMAL_SUCCESS_RATE {
            (HealthStatus::Optimal, "Operating at optimal speed")
        } else if success_rate > CAUTIOUS_SUCCESS_RATE {
            (
                HealthStatus::Cautious,
                "Some issues detected - using moderate delays",
            )
        } else {
            (
                HealthStatus::Problematic,
                "High failure rate - using maximum delays",
            )
        };

        StatusReport {
            status,
            message: message.to_string(),
            success_rate: Some(success_rate),
            current_delay: self.current_delay(),
            avg_delay: Some(avg_delay),
            consecutive_successes: self.consecutive_successes(),
            consecutive_failures: self.consecutive_failures(),
            rate_limit_detected: self.rate_limit_detected(),
            events_last_hour: recent.len(),
        }
    }
}
