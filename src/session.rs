//! Monitoring session
//!
//! Composition root for the engine: wires the telemetry poller into the
//! classify → detect → deliver pipeline and holds the only externally
//! observable state (latest reading per vital, loading flag, last error).
//! The presentation layer reads snapshots through the accessors and
//! subscribes to the [`MonitorSink`] for push updates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use uuid::Uuid;

use crate::classifier::ZoneClassifier;
use crate::detector::TransitionDetector;
use crate::error::MonitorError;
use crate::feed::TelemetryFeed;
use crate::notify::{NotificationChannel, NotificationGate};
use crate::poller::{PollSink, TelemetryPoller};
use crate::types::{ClassifiedReading, PermissionState, Reading, ThresholdConfig, VitalKind};

/// Poll cadence matching the external feed's observed update rate.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Observer boundary exposed to the presentation layer.
///
/// Everything crosses this boundary as state, never as a panic or error
/// type: readings for latest-value rendering, error strings for a banner,
/// permission changes for a notification-enable affordance.
pub trait MonitorSink: Send + Sync {
    fn on_reading(&self, reading: &Reading);
    fn on_error(&self, message: &str);
    fn on_permission_change(&self, state: PermissionState);
}

/// Externally observable session state. Written only by the poll task;
/// readers get point-in-time snapshots with no atomicity promise across
/// kinds.
#[derive(Debug, Default)]
struct SessionState {
    latest: HashMap<VitalKind, Reading>,
    loading: bool,
    last_error: Option<String>,
}

/// Lock that recovers from poisoning: the state is plain data and a
/// panicked writer leaves nothing half-valid worth refusing over.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The per-cycle pipeline, owned by the poll task.
///
/// Classification and detection state is touched only here, so observations
/// per kind are strictly ordered and the detector's read-modify-write is
/// never interleaved.
struct VitalPipeline {
    classifier: ZoneClassifier,
    detector: TransitionDetector,
    gate: Arc<Mutex<NotificationGate>>,
    state: Arc<Mutex<SessionState>>,
    sink: Arc<dyn MonitorSink>,
    session_id: Uuid,
}

impl PollSink for VitalPipeline {
    fn on_readings(&mut self, readings: Vec<Reading>) {
        {
            let mut state = lock(&self.state);
            state.loading = false;
            state.last_error = None;
            for reading in &readings {
                state.latest.insert(reading.kind, reading.clone());
            }
        }

        for reading in readings {
            self.sink.on_reading(&reading);

            // Absent or non-numeric values are bookkept above but never
            // classified, so they cannot fire or mask alerts.
            let Some(value) = reading.value.filter(|v| v.is_finite()) else {
                continue;
            };

            let zone = self.classifier.classify(reading.kind, value);
            let classified = ClassifiedReading {
                kind: reading.kind,
                zone,
                value,
                observed_at: reading.observed_at,
            };

            if let Some(alert) = self.detector.observe(classified) {
                tracing::info!(
                    session_id = %self.session_id,
                    kind = alert.kind.as_str(),
                    zone = alert.zone.as_str(),
                    value = alert.value,
                    "zone transition"
                );
                lock(&self.gate).deliver(&alert);
            }
        }
    }

    fn on_fetch_error(&mut self, error: MonitorError) {
        let message = error.to_string();
        {
            let mut state = lock(&self.state);
            state.loading = false;
            state.last_error = Some(message.clone());
        }
        self.sink.on_error(&message);
    }
}

/// A running monitoring session.
///
/// Owns the poller, which owns the timer: dropping the session (or calling
/// [`shutdown`](Self::shutdown)) tears the whole chain down synchronously
/// and no callback fires afterwards.
pub struct MonitoringSession {
    id: Uuid,
    state: Arc<Mutex<SessionState>>,
    gate: Arc<Mutex<NotificationGate>>,
    sink: Arc<dyn MonitorSink>,
    poller: Option<TelemetryPoller>,
}

impl MonitoringSession {
    /// Start a session with default thresholds and the standard poll
    /// interval.
    ///
    /// `feed` is `None` when endpoint configuration is missing; the session
    /// then runs in no-data mode, serving absent state without ever
    /// starting the poller. `channel` is `None` on hosts without any
    /// notification capability, which resolves permission to denied while
    /// monitoring continues. Must be called from within a tokio runtime
    /// when a feed is supplied.
    pub fn start(
        feed: Option<Arc<dyn TelemetryFeed>>,
        channel: Option<Arc<dyn NotificationChannel>>,
        sink: Arc<dyn MonitorSink>,
    ) -> Self {
        Self::start_with(feed, channel, sink, ThresholdConfig::default(), POLL_INTERVAL)
    }

    /// Start a session with explicit thresholds and poll interval.
    pub fn start_with(
        feed: Option<Arc<dyn TelemetryFeed>>,
        channel: Option<Arc<dyn NotificationChannel>>,
        sink: Arc<dyn MonitorSink>,
        thresholds: ThresholdConfig,
        interval: Duration,
    ) -> Self {
        let id = Uuid::new_v4();
        let gate = Arc::new(Mutex::new(NotificationGate::new(channel)));

        // Consent is requested exactly once, up front; later calls through
        // request_permission() return the settled state.
        let permission = lock(&gate).request_permission();
        sink.on_permission_change(permission);

        let state = Arc::new(Mutex::new(SessionState {
            latest: HashMap::new(),
            loading: feed.is_some(),
            last_error: None,
        }));

        let poller = match feed {
            Some(feed) => {
                let pipeline = VitalPipeline {
                    classifier: ZoneClassifier::new(thresholds),
                    detector: TransitionDetector::new(thresholds),
                    gate: Arc::clone(&gate),
                    state: Arc::clone(&state),
                    sink: Arc::clone(&sink),
                    session_id: id,
                };
                let mut poller = TelemetryPoller::new(feed, Box::new(pipeline));
                poller.start(interval);
                tracing::info!(
                    session_id = %id,
                    interval_secs = interval.as_secs(),
                    permission = permission.as_str(),
                    "monitoring session started"
                );
                Some(poller)
            }
            None => {
                tracing::warn!(
                    session_id = %id,
                    "no telemetry feed configured; session running in no-data mode"
                );
                None
            }
        };

        Self {
            id,
            state,
            gate,
            sink,
            poller,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Latest known reading for a vital, absent readings included.
    pub fn latest(&self, kind: VitalKind) -> Option<Reading> {
        lock(&self.state).latest.get(&kind).cloned()
    }

    /// Point-in-time snapshot of all known readings, in display order.
    pub fn readings(&self) -> Vec<Reading> {
        let state = lock(&self.state);
        VitalKind::ALL
            .iter()
            .filter_map(|kind| state.latest.get(kind).cloned())
            .collect()
    }

    /// True until the first poll cycle resolves (successfully or not).
    /// A feedless session is never loading.
    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Message from the most recent failed cycle; cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<String> {
        lock(&self.state).last_error.clone()
    }

    pub fn permission(&self) -> PermissionState {
        lock(&self.gate).state()
    }

    /// Re-drive the one-shot consent request (for a user-facing enable
    /// affordance). Settled states are returned as-is without re-prompting;
    /// the sink is notified only when the state actually changed.
    pub fn request_permission(&self) -> PermissionState {
        let (before, after) = {
            let mut gate = lock(&self.gate);
            let before = gate.state();
            (before, gate.request_permission())
        };
        if after != before {
            self.sink.on_permission_change(after);
        }
        after
    }

    /// Stop polling. Deterministic and synchronous: once this returns, no
    /// pipeline callback will fire and no timer remains armed.
    pub fn shutdown(&mut self) {
        if let Some(poller) = &mut self.poller {
            poller.stop();
            tracing::debug!(session_id = %self.id, "monitoring session shut down");
        }
        self.poller = None;
    }
}

impl Drop for MonitoringSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
