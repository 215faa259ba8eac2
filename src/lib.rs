//! Vitalwatch - vital-sign telemetry monitoring and threshold alerting engine
//!
//! Vitalwatch repeatedly samples physiological readings (oxygen saturation,
//! body temperature, heart rate) from an external telemetry feed, classifies
//! each reading into a clinical zone, detects zone-crossing transitions, and
//! dispatches user-facing notifications gated by a permission state machine.
//!
//! Data flows one direction through the pipeline:
//! poller → classifier → transition detector → notification gate.
//! [`MonitoringSession`] is the composition root and the only component with
//! externally observable mutable state; the presentation layer reads its
//! snapshots and subscribes to a [`MonitorSink`] for push updates.

pub mod classifier;
pub mod config;
pub mod detector;
pub mod error;
pub mod feed;
pub mod notify;
pub mod poller;
pub mod session;
pub mod types;

pub use classifier::ZoneClassifier;
pub use config::FeedConfig;
pub use detector::TransitionDetector;
pub use error::MonitorError;
pub use feed::{HttpTelemetryFeed, TelemetryFeed};
pub use notify::{DisabledChannel, LogChannel, NotificationChannel, NotificationGate};
pub use poller::{PollSink, TelemetryPoller};
pub use session::{MonitorSink, MonitoringSession, POLL_INTERVAL};
pub use types::{
    Alert, ClassifiedReading, PermissionState, Reading, ThresholdConfig, VitalKind, Zone,
};

/// Engine version embedded in logs and the CLI.
pub const VITALWATCH_VERSION: &str = env!("CARGO_PKG_VERSION");
