//! Telemetry polling loop
//!
//! Owns the recurring fetch-and-decode cycle against the telemetry feed:
//! an immediate first fetch, then a fixed cadence until stopped. The loop
//! is a single tokio task, so cycles are strictly serialized; a slow cycle
//! delays the next tick rather than overlapping it.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::MonitorError;
use crate::feed::TelemetryFeed;
use crate::types::Reading;

/// Receives the outcome of each poll cycle, supplied at construction.
pub trait PollSink: Send + 'static {
    /// Readings decoded from a successful fetch, one per vital kind.
    fn on_readings(&mut self, readings: Vec<Reading>);

    /// A failed cycle. The poller keeps its cadence and retries on the
    /// next tick; the sink owns surfacing the error.
    fn on_fetch_error(&mut self, error: MonitorError);
}

/// Recurring poller over a telemetry feed.
///
/// A poller runs at most once: `start` is idempotent while running, and a
/// stopped poller stays stopped (sessions tear down rather than restart).
/// `stop` is synchronous and safe to call at any time; an in-flight fetch
/// is allowed to complete but its result is discarded, so the sink sees
/// nothing after `stop` returns.
pub struct TelemetryPoller {
    feed: Arc<dyn TelemetryFeed>,
    sink: Option<Box<dyn PollSink>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TelemetryPoller {
    pub fn new(feed: Arc<dyn TelemetryFeed>, sink: Box<dyn PollSink>) -> Self {
        Self {
            feed,
            sink: Some(sink),
            cancel: CancellationToken::new(),
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && !self.cancel.is_cancelled()
    }

    /// Begin polling: an immediate fetch, then one every `interval`.
    ///
    /// Must be called from within a tokio runtime. Calling `start` while
    /// already running (or after `stop`) is a no-op, never a second loop.
    pub fn start(&mut self, interval: Duration) {
        if self.handle.is_some() {
            return;
        }
        let Some(mut sink) = self.sink.take() else {
            return;
        };

        let feed = Arc::clone(&self.feed);
        let cancel = self.cancel.clone();

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A cycle that overruns pushes the next tick out instead of
            // firing a burst of catch-up ticks.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let outcome = feed.fetch_latest().await;

                // Stopped mid-fetch: discard the stale result so no state
                // mutation happens after teardown.
                if cancel.is_cancelled() {
                    break;
                }

                match outcome {
                    Ok(readings) => sink.on_readings(readings),
                    Err(e) => {
                        tracing::warn!(error = %e, "telemetry fetch failed");
                        sink.on_fetch_error(e);
                    }
                }
            }

            tracing::debug!("telemetry poller stopped");
        }));
    }

    /// Cancel the pending and all future fetch cycles.
    ///
    /// Returns immediately; the poll task winds down on its own and any
    /// callback that would have fired after this point is suppressed.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.handle = None;
    }
}

impl Drop for TelemetryPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
