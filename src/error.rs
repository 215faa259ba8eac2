//! Error types for vitalwatch

use thiserror::Error;

/// Errors that can occur while monitoring.
///
/// Nothing here is fatal to the process: feed failures are surfaced as the
/// session's transient last error and retried on the next tick, missing
/// configuration only keeps the poller from starting, and notification
/// channel failures are swallowed by the gate.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed returned non-success status: {0}")]
    FeedStatus(String),

    #[error("Malformed feed payload: {0}")]
    MalformedPayload(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Notification channel error: {0}")]
    NotificationChannel(String),
}
