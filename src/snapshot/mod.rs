//! Snapshot persistence for controller state.
//!
//! The pacer periodically writes its state and the tail of the event log
//! to a single well-known JSON file so a restarted process resumes with
//! the delay it had already learned instead of probing the remote service
//! from scratch. Snapshots older than [`SNAPSHOT_MAX_AGE`] describe a
//! rate-limit situation that no longer exists and are discarded on load.
//!
//! All persistence failures are non-fatal: the in-memory state is the
//! source of truth and the pacer keeps working with the filesystem
//! entirely unavailable.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::SNAPSHOT_MAX_AGE;
use crate::error_handling::{Outcome, SnapshotError};
use crate::pacer::OutcomeEvent;

/// Persisted form of the controller state plus the recent event tail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PacerSnapshot {
    /// Learned delay, in float seconds.
    pub(crate) current_delay: f64,
    pub(crate) consecutive_successes: u32,
    pub(crate) consecutive_failures: u32,
    pub(crate) rate_limit_detected: bool,
    /// Unix epoch seconds at save time.
    pub(crate) last_updated: f64,
    #[serde(default)]
    pub(crate) recent_events: Vec<SnapshotEvent>,
}

/// Persisted form of one outcome event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SnapshotEvent {
    /// Unix epoch seconds.
    pub(crate) timestamp: f64,
    pub(crate) event_type: String,
    pub(crate) delay_used: f64,
    pub(crate) response_time: f64,
    #[serde(default)]
    pub(crate) error_message: String,
}

impl SnapshotEvent {
    pub(crate) fn from_event(event: &OutcomeEvent) -> Self {
        SnapshotEvent {
            timestamp: epoch_seconds(event.timestamp),
            event_type: event.outcome.as_str().to_string(),
            delay_used: event.delay_used.as_secs_f64(),
            response_time: event.response_time.as_secs_f64(),
            error_message: event.message.clone(),
        }
    }

    /// Rebuilds the in-memory event. Returns `None` for events with an
    /// unknown kind or an unrepresentable timestamp; those are skipped on
    /// load rather than failing the whole snapshot.
    pub(crate) fn to_event(&self) -> Option<OutcomeEvent> {
        let outcome = Outcome::from_wire(&self.event_type)?;
        let timestamp = from_epoch_seconds(self.timestamp)?;
        Some(OutcomeEvent {
            timestamp,
            outcome,
            delay_used: Duration::try_from_secs_f64(self.delay_used).ok()?,
            response_time: Duration::try_from_secs_f64(self.response_time).ok()?,
            message: self.error_message.clone(),
        })
    }
}

/// Loads and saves snapshots at a fixed path.
#[derive(Debug)]
pub(crate) struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the snapshot, creating parent directories as needed.
    ///
    /// Callers log the error and continue; a save failure never aborts
    /// outcome recording.
    pub(crate) fn save(&self, snapshot: &PacerSnapshot) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Reads the snapshot if one is present, parseable, and fresh.
    ///
    /// Missing, malformed, and stale files all yield `None`; malformed
    /// data is additionally logged as a warning.
    pub(crate) fn load(&self) -> Option<PacerSnapshot> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Could not read snapshot {}: {}", self.path.display(), e);
                return None;
            }
        };

        let snapshot: PacerSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    "Ignoring malformed snapshot {}: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        let age = epoch_seconds(Utc::now()) - snapshot.last_updated;
        if age > SNAPSHOT_MAX_AGE.as_secs_f64() {
            debug!(
                "Ignoring stale snapshot {} ({:.0}s old)",
                self.path.display(),
                age
            );
            return None;
        }

        Some(snapshot)
    }
}

pub(crate) fn epoch_seconds(t: DateTime<Utc>) -> f64 {
    t.timestamp_micros() as f64 / 1e6
}

pub(crate) fn from_epoch_seconds(s: f64) -> Option<DateTime<Utc>> {
    if !s.is_finite() {
        return None;
    }
    DateTime::from_timestamp_micros((s * 1e6) as i64)
}
