//! Append-only log of request outcomes.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error_handling::Outcome;

/// One recorded request outcome.
///
/// Events are immutable once created and are only ever removed in bulk,
/// when the log is trimmed on persistence or rebuilt on load.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeEvent {
    /// When the outcome was recorded.
    pub timestamp: DateTime<Utc>,
    /// What happened to the request.
    pub outcome: Outcome,
    /// The delay that was applied before the request.
    pub delay_used: Duration,
    /// How long the request itself took.
    pub response_time: Duration,
    /// Free-form detail, usually an error message.
    pub message: String,
}

/// In-memory sequence of outcome events, exclusively owned by the pacer.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<OutcomeEvent>,
}

impl EventLog {
    pub(crate) fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    /// Appends an event stamped with the current time.
    pub(crate) fn record(
        &mut self,
        outcome: Outcome,
        delay_used: Duration,
        response_time: Duration,
        message: &str,
    ) {
        self.record_at(Utc::now(), outcome, delay_used, response_time, message);
    }

    /// Appends an event with an explicit timestamp. Used when rebuilding
    /// the log from a snapshot.
    pub(crate) fn record_at(
        &mut self,
        timestamp: DateTime<Utc>,
        outcome: Outcome,
        delay_used: Duration,
        response_time: Duration,
        message: &str,
    ) {
        self.events.push(OutcomeEvent {
            timestamp,
            outcome,
            delay_used,
            response_time,
            message: message.to_string(),
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    /// All events, oldest first.
    pub(crate) fn events(&self) -> &[OutcomeEvent] {
        &self.events
    }

    /// Events newer than `now - window`, oldest first. A window too large
    /// to represent includes everything.
    pub(crate) fn recent(&self, window: Duration) -> Vec<&OutcomeEvent> {
        let cutoff = chrono::TimeDelta::from_std(window)
            .ok()
            .and_then(|d| Utc::now().checked_sub_signed(d));
        self.events
            .iter()
            .filter(|e| cutoff.is_none_or(|c| e.timestamp > c))
            .collect()
    }

    /// Drops everything but the most recent `n` events.
    pub(crate) fn retain_last(&mut self, n: usize) {
        if self.events.len() > n {
            self.events.drain(..self.events.len() - n);
        }
    }
}
