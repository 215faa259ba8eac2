//! Notification permission gate
//!
//! The host's notification capability is modeled as a swappable
//! [`NotificationChannel`]; the [`NotificationGate`] in front of it owns the
//! permission lifecycle and is the single choke point every alert passes
//! through. Hosts without any notification capability degrade to a
//! permanently denied gate; monitoring and in-app display keep working.

use std::sync::Arc;

use crate::error::MonitorError;
use crate::types::{Alert, PermissionState};

/// Host-provided notification capability.
///
/// `prompt` performs the actual user-consent request and resolves to
/// `Granted` or `Denied`. `deliver` shows a titled, bodied alert keyed by
/// the alert's grouping tag so repeated alerts for the same vital supersede
/// rather than stack; the host may refuse (e.g. permission revoked out of
/// band), which the gate swallows.
pub trait NotificationChannel: Send + Sync {
    fn prompt(&self) -> PermissionState;
    fn deliver(&self, alert: &Alert) -> Result<(), MonitorError>;
}

/// Permission-checked gate in front of the host notification channel.
pub struct NotificationGate {
    channel: Option<Arc<dyn NotificationChannel>>,
    state: PermissionState,
}

impl NotificationGate {
    /// Build a gate over an optional host capability. `None` means the host
    /// has no notification support at all; permission then resolves to
    /// `Denied` without ever prompting.
    pub fn new(channel: Option<Arc<dyn NotificationChannel>>) -> Self {
        Self {
            channel,
            state: PermissionState::Unrequested,
        }
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    /// One-shot consent request.
    ///
    /// Prompts the host only from `Unrequested`; once resolved, later calls
    /// return the settled state without re-prompting. `Denied` is terminal.
    pub fn request_permission(&mut self) -> PermissionState {
        if self.state != PermissionState::Unrequested {
            return self.state;
        }
        self.state = match &self.channel {
            Some(channel) => match channel.prompt() {
                PermissionState::Granted => PermissionState::Granted,
                // A prompt that fails to settle counts as a refusal.
                _ => PermissionState::Denied,
            },
            None => {
                tracing::debug!("no notification capability; permission denied");
                PermissionState::Denied
            }
        };
        tracing::info!(state = self.state.as_str(), "notification permission resolved");
        self.state
    }

    /// Forward an alert to the host channel.
    ///
    /// No-op unless permission is `Granted`. Delivery failures (channel
    /// gone, permission revoked externally) are logged and swallowed; they
    /// never reach the user-visible error channel.
    pub fn deliver(&self, alert: &Alert) {
        if self.state != PermissionState::Granted {
            return;
        }
        let Some(channel) = &self.channel else {
            return;
        };
        if let Err(e) = channel.deliver(alert) {
            tracing::debug!(error = %e, tag = alert.tag(), "notification delivery failed");
        }
    }
}

/// Channel that grants permission and renders alerts through the log.
///
/// The stand-in host for headless environments: the full pipeline runs
/// unchanged, with alerts surfacing as structured warnings.
#[derive(Debug, Default)]
pub struct LogChannel;

impl NotificationChannel for LogChannel {
    fn prompt(&self) -> PermissionState {
        PermissionState::Granted
    }

    fn deliver(&self, alert: &Alert) -> Result<(), MonitorError> {
        tracing::warn!(
            tag = alert.tag(),
            title = %alert.title(),
            body = %alert.body(),
            "vital alert"
        );
        Ok(())
    }
}

/// Channel that always refuses consent. Substituting this disables
/// notifications without touching the rest of the pipeline.
#[derive(Debug, Default)]
pub struct DisabledChannel;

impl NotificationChannel for DisabledChannel {
    fn prompt(&self) -> PermissionState {
        PermissionState::Denied
    }

    fn deliver(&self, _alert: &Alert) -> Result<(), MonitorError> {
        Ok(())
    }
}
