//! Zone classification
//!
//! Maps a numeric reading to a clinical zone against the configured
//! per-kind bounds. Pure and side-effect free: the same value always
//! classifies the same way.

use crate::types::{ThresholdConfig, VitalKind, Zone};

/// Classifies readings into zones using strict-exclusive thresholds:
/// a value exactly at a bound is `Normal`.
///
/// Callers are responsible for filtering absent and non-finite values
/// before classifying; only real numbers reach this stage.
#[derive(Debug, Clone, Copy)]
pub struct ZoneClassifier {
    thresholds: ThresholdConfig,
}

impl Default for ZoneClassifier {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

impl ZoneClassifier {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Classify a finite numeric value for the given vital.
    pub fn classify(&self, kind: VitalKind, value: f64) -> Zone {
        let t = &self.thresholds;
        match kind {
            VitalKind::Spo2 => {
                if value < t.spo2_low {
                    Zone::Low
                } else {
                    Zone::Normal
                }
            }
            VitalKind::BodyTemperature => {
                if value > t.temp_high {
                    Zone::High
                } else {
                    Zone::Normal
                }
            }
            VitalKind::HeartRate => {
                if value < t.hr_low {
                    Zone::Low
                } else if value > t.hr_high {
                    Zone::High
                } else {
                    Zone::Normal
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spo2_boundaries() {
        let classifier = ZoneClassifier::default();
        assert_eq!(classifier.classify(VitalKind::Spo2, 95.0), Zone::Normal);
        assert_eq!(classifier.classify(VitalKind::Spo2, 94.9), Zone::Low);
        assert_eq!(classifier.classify(VitalKind::Spo2, 100.0), Zone::Normal);
    }

    #[test]
    fn test_body_temperature_boundaries() {
        let classifier = ZoneClassifier::default();
        assert_eq!(
            classifier.classify(VitalKind::BodyTemperature, 37.5),
            Zone::Normal
        );
        assert_eq!(
            classifier.classify(VitalKind::BodyTemperature, 37.6),
            Zone::High
        );
        assert_eq!(
            classifier.classify(VitalKind::BodyTemperature, 36.4),
            Zone::Normal
        );
    }

    #[test]
    fn test_heart_rate_boundaries() {
        let classifier = ZoneClassifier::default();
        assert_eq!(classifier.classify(VitalKind::HeartRate, 50.0), Zone::Normal);
        assert_eq!(classifier.classify(VitalKind::HeartRate, 49.0), Zone::Low);
        assert_eq!(classifier.classify(VitalKind::HeartRate, 120.0), Zone::Normal);
        assert_eq!(classifier.classify(VitalKind::HeartRate, 121.0), Zone::High);
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = ZoneClassifier::new(ThresholdConfig {
            spo2_low: 92.0,
            temp_high: 38.0,
            hr_low: 40.0,
            hr_high: 160.0,
        });
        assert_eq!(classifier.classify(VitalKind::Spo2, 93.0), Zone::Normal);
        assert_eq!(classifier.classify(VitalKind::HeartRate, 45.0), Zone::Normal);
        assert_eq!(classifier.classify(VitalKind::HeartRate, 161.0), Zone::High);
    }
}
