//! Core types for the vitalwatch monitoring engine
//!
//! This module defines the data that flows through the pipeline: raw
//! readings from the telemetry feed, classified readings, threshold
//! configuration, and the alerts emitted on zone transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the three monitored physiological signals. Fixed, closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    Spo2,
    BodyTemperature,
    HeartRate,
}

impl VitalKind {
    /// All kinds, in display order. Used for exhaustive per-kind passes.
    pub const ALL: [VitalKind; 3] = [
        VitalKind::Spo2,
        VitalKind::BodyTemperature,
        VitalKind::HeartRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VitalKind::Spo2 => "spo2",
            VitalKind::BodyTemperature => "body_temperature",
            VitalKind::HeartRate => "heart_rate",
        }
    }

    /// Human-facing label used in alert titles.
    pub fn label(&self) -> &'static str {
        match self {
            VitalKind::Spo2 => "SpO2",
            VitalKind::BodyTemperature => "Body temperature",
            VitalKind::HeartRate => "Heart rate",
        }
    }

    /// Measurement unit for display.
    pub fn unit(&self) -> &'static str {
        match self {
            VitalKind::Spo2 => "%",
            VitalKind::BodyTemperature => "°C",
            VitalKind::HeartRate => "bpm",
        }
    }
}

/// Clinical classification bucket for a vital's current value.
///
/// SpO2 only reaches `Normal`/`Low` (no upper bound) and body temperature
/// only `Normal`/`High`; heart rate can reach all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Low,
    Normal,
    High,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Low => "low",
            Zone::Normal => "normal",
            Zone::High => "high",
        }
    }

    pub fn is_abnormal(&self) -> bool {
        !matches!(self, Zone::Normal)
    }
}

/// A raw reading forwarded from the telemetry feed.
///
/// `value` is `None` when the feed had no data for this vital ("no data
/// yet", or every returned sample left the field empty). An absent value is
/// distinct from a legitimate reading of zero and never classifies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub kind: VitalKind,
    pub value: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

impl Reading {
    pub fn new(kind: VitalKind, value: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            value: Some(value),
            observed_at,
        }
    }

    /// A reading carrying no value, stamped with the current time.
    pub fn absent(kind: VitalKind) -> Self {
        Self {
            kind,
            value: None,
            observed_at: Utc::now(),
        }
    }
}

/// A reading that has been classified into a zone.
///
/// Derived, never persisted beyond the current/previous pair held by the
/// transition detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedReading {
    pub kind: VitalKind,
    pub zone: Zone,
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

/// Per-kind clinical bounds. Immutable once constructed; the engine never
/// mutates them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// SpO2 lower bound (percent). Strictly below this is `Low`.
    pub spo2_low: f64,
    /// Body temperature upper bound (celsius). Strictly above this is `High`.
    pub temp_high: f64,
    /// Heart rate lower bound (bpm). Strictly below this is `Low`.
    pub hr_low: f64,
    /// Heart rate upper bound (bpm). Strictly above this is `High`.
    pub hr_high: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            spo2_low: 95.0,
            temp_high: 37.5,
            hr_low: 50.0,
            hr_high: 120.0,
        }
    }
}

impl ThresholdConfig {
    /// Human text describing the bound a zone sits against, used in alert
    /// bodies (e.g. "below 95%", "within 50-120 bpm").
    pub fn describe(&self, kind: VitalKind, zone: Zone) -> String {
        match (kind, zone) {
            (VitalKind::Spo2, Zone::Low) => format!("below {}%", self.spo2_low),
            (VitalKind::Spo2, _) => format!("at or above {}%", self.spo2_low),
            (VitalKind::BodyTemperature, Zone::High) => format!("above {}°C", self.temp_high),
            (VitalKind::BodyTemperature, _) => format!("at or below {}°C", self.temp_high),
            (VitalKind::HeartRate, Zone::Low) => format!("below {} bpm", self.hr_low),
            (VitalKind::HeartRate, Zone::High) => format!("above {} bpm", self.hr_high),
            (VitalKind::HeartRate, Zone::Normal) => {
                format!("within {}-{} bpm", self.hr_low, self.hr_high)
            }
        }
    }
}

/// Notification-permission lifecycle.
///
/// Starts `Unrequested`; resolves to `Granted` or `Denied` exactly once via
/// an explicit consent prompt. `Denied` is terminal and never re-prompted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    Unrequested,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Unrequested => "unrequested",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
        }
    }
}

/// A zone-transition alert.
///
/// Ephemeral: constructed at the instant of a qualifying transition and
/// handed to the notification gate; the engine keeps no alert history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub kind: VitalKind,
    pub zone: Zone,
    pub value: f64,
    /// Human text for the bound that was crossed.
    pub threshold: String,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// Stable grouping key per vital so a newer alert for the same vital
    /// supersedes an older one still pending display on the host.
    pub fn tag(&self) -> &'static str {
        match self.kind {
            VitalKind::Spo2 => "vitalwatch-spo2",
            VitalKind::BodyTemperature => "vitalwatch-body-temperature",
            VitalKind::HeartRate => "vitalwatch-heart-rate",
        }
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.kind.label(), self.zone.as_str())
    }

    pub fn body(&self) -> String {
        format!(
            "{} is {} {} ({})",
            self.kind.label(),
            self.value,
            self.kind.unit(),
            self.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vital_kind_covers_all_variants() {
        assert_eq!(VitalKind::ALL.len(), 3);
        for kind in VitalKind::ALL {
            assert!(!kind.as_str().is_empty());
            assert!(!kind.unit().is_empty());
        }
    }

    #[test]
    fn test_absent_reading_has_no_value() {
        let reading = Reading::absent(VitalKind::Spo2);
        assert_eq!(reading.kind, VitalKind::Spo2);
        assert!(reading.value.is_none());
    }

    #[test]
    fn test_threshold_descriptions() {
        let thresholds = ThresholdConfig::default();
        assert_eq!(thresholds.describe(VitalKind::Spo2, Zone::Low), "below 95%");
        assert_eq!(
            thresholds.describe(VitalKind::HeartRate, Zone::Normal),
            "within 50-120 bpm"
        );
        assert_eq!(
            thresholds.describe(VitalKind::BodyTemperature, Zone::High),
            "above 37.5°C"
        );
    }

    #[test]
    fn test_alert_tag_and_title() {
        let alert = Alert {
            kind: VitalKind::HeartRate,
            zone: Zone::High,
            value: 130.0,
            threshold: "above 120 bpm".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(alert.tag(), "vitalwatch-heart-rate");
        assert_eq!(alert.title(), "Heart rate high");
        assert_eq!(alert.body(), "Heart rate is 130 bpm (above 120 bpm)");
    }
}
