//! Zone-transition detection
//!
//! Compares each classified reading against the last-seen classification
//! for the same vital and emits an alert only when the zone changed.
//! Alerting on transitions rather than on every poll is what keeps the
//! notification stream quiet when a vital sits steadily in one zone.

use std::collections::HashMap;

use crate::types::{Alert, ClassifiedReading, ThresholdConfig, VitalKind};

/// Stateful per-kind transition detector.
///
/// Holds at most one previous classification per vital kind; the stored
/// entry is overwritten on every observation, never accumulated. The map is
/// mutated only by the pipeline driving `observe`, one observation at a
/// time per kind.
#[derive(Debug)]
pub struct TransitionDetector {
    thresholds: ThresholdConfig,
    previous: HashMap<VitalKind, ClassifiedReading>,
}

impl Default for TransitionDetector {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

impl TransitionDetector {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self {
            thresholds,
            previous: HashMap::new(),
        }
    }

    /// Observe a classified reading.
    ///
    /// The first observation for a kind records the classification but
    /// never emits (there is no previous zone to transition from). After
    /// that, any zone inequality between the new and stored classification
    /// emits an alert; this includes abnormal-to-abnormal moves (Low to
    /// High and back), which are clinically distinct. The stored previous
    /// is always replaced, whether or not an alert fired.
    pub fn observe(&mut self, reading: ClassifiedReading) -> Option<Alert> {
        let alert = match self.previous.get(&reading.kind) {
            Some(previous) if previous.zone != reading.zone => Some(Alert {
                kind: reading.kind,
                zone: reading.zone,
                value: reading.value,
                threshold: self.thresholds.describe(reading.kind, reading.zone),
                timestamp: reading.observed_at,
            }),
            _ => None,
        };
        self.previous.insert(reading.kind, reading);
        alert
    }

    /// Last classification recorded for a kind, if any.
    pub fn last(&self, kind: VitalKind) -> Option<&ClassifiedReading> {
        self.previous.get(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Zone;
    use chrono::Utc;

    fn classified(kind: VitalKind, zone: Zone, value: f64) -> ClassifiedReading {
        ClassifiedReading {
            kind,
            zone,
            value,
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn test_first_observation_records_but_never_emits() {
        let mut detector = TransitionDetector::default();
        let alert = detector.observe(classified(VitalKind::HeartRate, Zone::Low, 45.0));
        assert!(alert.is_none());
        assert_eq!(detector.last(VitalKind::HeartRate).map(|c| c.zone), Some(Zone::Low));
    }

    #[test]
    fn test_alerts_only_on_zone_change() {
        let mut detector = TransitionDetector::default();
        let samples = [
            (Zone::Normal, 70.0),
            (Zone::Low, 45.0),
            (Zone::Low, 44.0),
            (Zone::Normal, 90.0),
        ];

        let alerts: Vec<_> = samples
            .iter()
            .filter_map(|&(zone, value)| {
                detector.observe(classified(VitalKind::HeartRate, zone, value))
            })
            .collect();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].zone, Zone::Low);
        assert_eq!(alerts[0].value, 45.0);
        assert_eq!(alerts[1].zone, Zone::Normal);
        assert_eq!(alerts[1].value, 90.0);
    }

    #[test]
    fn test_low_to_high_qualifies() {
        let mut detector = TransitionDetector::default();
        detector.observe(classified(VitalKind::HeartRate, Zone::Low, 45.0));
        let alert = detector.observe(classified(VitalKind::HeartRate, Zone::High, 130.0));
        assert!(alert.is_some());
        assert_eq!(alert.map(|a| a.zone), Some(Zone::High));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut detector = TransitionDetector::default();
        detector.observe(classified(VitalKind::HeartRate, Zone::Normal, 70.0));
        // First observation for spo2 must not borrow heart rate's history.
        let alert = detector.observe(classified(VitalKind::Spo2, Zone::Low, 91.0));
        assert!(alert.is_none());
    }

    #[test]
    fn test_previous_updated_even_without_alert() {
        let mut detector = TransitionDetector::default();
        detector.observe(classified(VitalKind::Spo2, Zone::Low, 92.0));
        detector.observe(classified(VitalKind::Spo2, Zone::Low, 91.0));
        assert_eq!(detector.last(VitalKind::Spo2).map(|c| c.value), Some(91.0));
    }

    #[test]
    fn test_alert_carries_threshold_text() {
        let mut detector = TransitionDetector::default();
        detector.observe(classified(VitalKind::Spo2, Zone::Normal, 98.0));
        let alert = detector
            .observe(classified(VitalKind::Spo2, Zone::Low, 93.0))
            .expect("transition must alert");
        assert_eq!(alert.threshold, "below 95%");
    }
}
