//! Adaptive delay controller.

use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info, warn};
use rand::Rng;

use crate::config::{
    PacerConfig, BATCH_RATE_LIMIT_FACTOR, BATCH_SUCCESS_FACTOR, BATCH_SUCCESS_STREAK,
    FAILURE_STREAK_THRESHOLD, JITTER_MAX, JITTER_MIN, RATE_LIMIT_DELAY_MULTIPLIER,
    SNAPSHOT_EVENT_CAP, SNAPSHOT_SAVE_INTERVAL, SUCCESS_STREAK_THRESHOLD,
};
use crate::error_handling::Outcome;
use crate::pacer::event_log::EventLog;
use crate::snapshot::{epoch_seconds, PacerSnapshot, SnapshotEvent, SnapshotStore};

/// Mutable controller state, exclusively owned by the pacer.
///
/// Mutated only through [`RequestPacer::record_outcome`] and the wait path;
/// callers never write these fields directly. After every adjustment
/// `min_delay <= current_delay <= max_dynamic_delay` holds, and at most one
/// of the two consecutive counters is nonzero.
#[derive(Debug)]
pub(crate) struct ControllerState {
    pub(crate) current_delay: Duration,
    pub(crate) consecutive_successes: u32,
    pub(crate) consecutive_failures: u32,
    pub(crate) rate_limit_detected: bool,
    pub(crate) last_request_at: Option<Instant>,
}

impl ControllerState {
    fn fresh(config: &PacerConfig) -> Self {
        ControllerState {
            current_delay: config.min_delay,
            consecutive_successes: 0,
            consecutive_failures: 0,
            rate_limit_detected: false,
            last_request_at: None,
        }
    }
}

/// Adaptive request pacer.
///
/// Observes the outcome of every request attempt and retunes the delay
/// applied before the next one: runs of successes shrink it, runs of
/// failures grow it, and a confirmed rate-limit signal escalates it
/// beyond the generic failure response. One instance per logical client
/// session owns all pacing state.
pub struct RequestPacer {
    config: PacerConfig,
    state: ControllerState,
    events: EventLog,
    store: SnapshotStore,
}

impl RequestPacer {
    /// Creates a pacer, resuming from the snapshot at
    /// `config.snapshot_path` when one is present and fresh.
    ///
    /// Without a usable snapshot the pacer starts at `min_delay` with zero
    /// counters and an empty event log.
    pub fn new(config: PacerConfig) -> Self {
        let store = SnapshotStore::new(&config.snapshot_path);
        let mut state = ControllerState::fresh(&config);
        let mut events = EventLog::new();

        if let Some(snapshot) = store.load() {
            state.current_delay = Duration::try_from_secs_f64(snapshot.current_delay)
                .unwrap_or(config.min_delay)
                .clamp(config.min_delay, config.max_dynamic_delay);
            state.consecutive_successes = snapshot.consecutive_successes;
            state.consecutive_failures = snapshot.consecutive_failures;
            // The counters are mutually exclusive; a snapshot that claims
            // otherwise keeps only the failure streak.
            if state.consecutive_failures > 0 {
                state.consecutive_successes = 0;
            }
            state.rate_limit_detected = snapshot.rate_limit_detected;

            for wire in &snapshot.recent_events {
                match wire.to_event() {
                    Some(e) => {
                        events.record_at(e.timestamp, e.outcome, e.delay_used, e.response_time, &e.message)
                    }
                    None => debug!("Skipping snapshot event of unknown kind '{}'", wire.event_type),
                }
            }

            info!(
                "Resumed pacing state from {} (delay {:.1}s, {} events)",
                store.path().display(),
                state.current_delay.as_secs_f64(),
                events.len()
            );
        }

        RequestPacer {
            config,
            state,
            events,
            store,
        }
    }

    /// Records the outcome of one request attempt and retunes the delay.
    ///
    /// Never fails: snapshot I/O errors on the periodic save are logged
    /// and swallowed.
    pub fn record_outcome(
        &mut self,
        outcome: Outcome,
        delay_used: Duration,
        response_time: Duration,
        message: &str,
    ) {
        self.events
            .record(outcome, delay_used, response_time, message);

        if outcome.is_failure() {
            self.state.consecutive_failures += 1;
            self.state.consecutive_successes = 0;
            if outcome == Outcome::RateLimited {
                self.state.rate_limit_detected = true;
            }
        } else {
            self.state.consecutive_successes += 1;
            self.state.consecutive_failures = 0;
            self.state.rate_limit_detected = false;
        }

        self.adjust_delay();

        if self.events.len() % SNAPSHOT_SAVE_INTERVAL == 0 {
            self.persist();
        }
    }

    /// Retunes `current_delay` from the consecutive counters, clamping
    /// after each step.
    fn adjust_delay(&mut self) {
        let before = self.state.current_delay;

        if self.state.consecutive_successes >= SUCCESS_STREAK_THRESHOLD {
            self.state.current_delay = self
                .state
                .current_delay
                .mul_f64(self.config.success_reduction)
                .max(self.config.min_delay);
        } else if self.state.consecutive_failures >= FAILURE_STREAK_THRESHOLD {
            self.state.current_delay = self
                .state
                .current_delay
                .mul_f64(self.config.failure_increase)
                .min(self.config.max_dynamic_delay);
        }

        // A confirmed rate limit escalates on top of the generic failure
        // response, clamped independently.
        if self.state.rate_limit_detected && self.state.consecutive_failures >= 1 {
            self.state.current_delay = self
                .state
                .current_delay
                .mul_f64(RATE_LIMIT_DELAY_MULTIPLIER)
                .min(self.config.max_dynamic_delay);
        }

        if self.state.current_delay != before {
            debug!(
                "Adjusted delay {:.1}s -> {:.1}s (successes={}, failures={}, rate_limited={})",
                before.as_secs_f64(),
                self.state.current_delay.as_secs_f64(),
                self.state.consecutive_successes,
                self.state.consecutive_failures,
                self.state.rate_limit_detected
            );
        }
    }

    /// Recommended delay before the next request.
    ///
    /// Applies uniform jitter so request intervals do not form a pattern
    /// the remote service can key on, doubles while a rate limit is in
    /// effect, and never exceeds `max_dynamic_delay`. Does not mutate
    /// state.
    pub fn next_delay(&self) -> Duration {
        let jitter = rand::rng().random_range(JITTER_MIN..=JITTER_MAX);
        let mut delay = self.state.current_delay.mul_f64(jitter);

        if self.state.rate_limit_detected {
            delay = delay.mul_f64(RATE_LIMIT_DELAY_MULTIPLIER);
        }

        delay.min(self.config.max_dynamic_delay)
    }

    /// True after every `batch_size` processed items.
    pub fn should_take_break(&self, items_processed: u32) -> bool {
        items_processed > 0 && items_processed % self.config.batch_size == 0
    }

    /// Duration of a batch break.
    ///
    /// Extended while a rate limit is in effect, shortened after a long
    /// run of successes; the rate-limit extension takes precedence.
    pub fn batch_delay(&self) -> Duration {
        if self.state.rate_limit_detected {
            self.config.batch_delay.mul_f64(BATCH_RATE_LIMIT_FACTOR)
        } else if self.state.consecutive_successes > BATCH_SUCCESS_STREAK {
            self.config.batch_delay.mul_f64(BATCH_SUCCESS_FACTOR)
        } else {
            self.config.batch_delay
        }
    }

    /// Writes the snapshot now and trims the in-memory log to the
    /// persisted cap. I/O failures are logged and swallowed.
    pub fn persist(&mut self) {
        let snapshot = self.capture_snapshot();
        if let Err(e) = self.store.save(&snapshot) {
            warn!(
                "Could not save pacing snapshot to {}: {}",
                self.store.path().display(),
                e
            );
        }
        self.events.retain_last(SNAPSHOT_EVENT_CAP);
    }

    fn capture_snapshot(&self) -> PacerSnapshot {
        let start = self.events.len().saturating_sub(SNAPSHOT_EVENT_CAP);
        PacerSnapshot {
            current_delay: self.state.current_delay.as_secs_f64(),
            consecutive_successes: self.state.consecutive_successes,
            consecutive_failures: self.state.consecutive_failures,
            rate_limit_detected: self.state.rate_limit_detected,
            last_updated: epoch_seconds(Utc::now()),
            recent_events: self.events.events()[start..]
                .iter()
                .map(SnapshotEvent::from_event)
                .collect(),
        }
    }

    /// The configuration this pacer was built with.
    pub fn config(&self) -> &PacerConfig {
        &self.config
    }

    /// The current learned delay (without jitter).
    pub fn current_delay(&self) -> Duration {
        self.state.current_delay
    }

    /// Whether the most recent failure run included a rate-limit signal.
    pub fn rate_limit_detected(&self) -> bool {
        self.state.rate_limit_detected
    }

    /// Length of the current success run.
    pub fn consecutive_successes(&self) -> u32 {
        self.state.consecutive_successes
    }

    /// Length of the current failure run.
    pub fn consecutive_failures(&self) -> u32 {
        self.state.consecutive_failures
    }

    /// Number of events currently held in memory.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Time since the last completed request, if any request completed.
    pub fn time_since_last_request(&self) -> Option<Duration> {
        self.state.last_request_at.map(|at| at.elapsed())
    }

    pub(crate) fn state(&self) -> &ControllerState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ControllerState {
        &mut self.state
    }

    pub(crate) fn events(&self) -> &EventLog {
        &self.events
    }

    #[cfg(test)]
    pub(crate) fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }
}
