//! Floor-enforcing wait with cooperative progress reporting.
//!
//! The wait is the single suspension point of the pacing core. It
//! guarantees that no two requests are ever spaced closer than the
//! configured `min_delay`, whatever delay the caller asked for, and it is
//! externally interruptible: the cancellation token is checked on every
//! tick, and a cancelled (partial) wait does not count as an issued
//! request.

use std::time::{Duration, Instant};

use log::{debug, info};
use tokio_util::sync::CancellationToken;

use crate::config::{PROGRESS_DISPLAY_THRESHOLD, PROGRESS_TICK};
use crate::pacer::controller::RequestPacer;

/// Progress of an in-flight wait, emitted to the observer once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitProgress {
    /// Time waited so far.
    pub elapsed: Duration,
    /// Time left until the wait completes.
    pub remaining: Duration,
    /// Completion percentage in `[0, 100]`.
    pub percent: f64,
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    /// The full delay elapsed; the last-request instant was advanced.
    Completed,
    /// The wait was cancelled before completing; the last-request instant
    /// was left untouched.
    Cancelled,
}

impl RequestPacer {
    /// Waits for `requested_delay`, logging progress at debug level.
    ///
    /// See [`wait_with_progress`](Self::wait_with_progress) for the
    /// observer-taking form and the exact semantics.
    pub async fn wait(
        &mut self,
        requested_delay: Duration,
        reason: &str,
        cancel: &CancellationToken,
    ) -> WaitResult {
        let label = reason.to_string();
        self.wait_with_progress(requested_delay, reason, cancel, move |p| {
            debug!(
                "{}: {:.0}% ({:.1}s remaining)",
                label,
                p.percent,
                p.remaining.as_secs_f64()
            );
        })
        .await
    }

    /// Waits for `requested_delay`, raised to whatever is needed to keep
    /// `min_delay` between consecutive requests.
    ///
    /// A resulting delay of zero returns immediately. Waits longer than
    /// five seconds report progress to `on_progress` at roughly one-second
    /// granularity; shorter waits sleep uninterrupted. On completion the
    /// last-request instant is advanced; on cancellation it is not, since
    /// no request was issued.
    pub async fn wait_with_progress<F>(
        &mut self,
        requested_delay: Duration,
        reason: &str,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> WaitResult
    where
        F: FnMut(WaitProgress),
    {
        let mut delay = requested_delay;

        if let Some(last) = self.state().last_request_at {
            let since_last = last.elapsed();
            let min = self.config().min_delay;
            if since_last < min {
                delay = delay.max(min - since_last);
            }
        }

        if delay.is_zero() {
            self.state_mut().last_request_at = Some(Instant::now());
            return WaitResult::Completed;
        }

        info!("{}: waiting {:.1}s", reason, delay.as_secs_f64());

        if delay > PROGRESS_DISPLAY_THRESHOLD {
            let started = tokio::time::Instant::now();
            let deadline = started + delay;
            let mut ticker = tokio::time::interval(PROGRESS_TICK);

            loop {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => break,
                    _ = ticker.tick() => {
                        let elapsed = started.elapsed().min(delay);
                        let remaining = delay - elapsed;
                        on_progress(WaitProgress {
                            elapsed,
                            remaining,
                            percent: (elapsed.as_secs_f64() / delay.as_secs_f64() * 100.0).min(100.0),
                        });
                    }
                    _ = cancel.cancelled() => {
                        debug!(
                            "{}: wait cancelled with {:.1}s remaining",
                            reason,
                            (delay.saturating_sub(started.elapsed())).as_secs_f64()
                        );
                        return WaitResult::Cancelled;
                    }
                }
            }
        } else {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => {
                    debug!("{}: wait cancelled", reason);
                    return WaitResult::Cancelled;
                }
            }
        }

        self.state_mut().last_request_at = Some(Instant::now());
        WaitResult::Completed
    }
}
