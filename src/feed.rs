//! Telemetry feed adapter
//!
//! Parses the feed's wire payload and maps it to [`Reading`]s. The feed
//! returns the most recent N samples; each sample carries up to three named
//! fields (one per vital) and a timestamp. For every vital the decoder
//! takes the newest sample whose field holds a usable value, scanning
//! backward independently per field, and falls back to an absent reading
//! when no sample qualifies.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::FeedConfig;
use crate::error::MonitorError;
use crate::types::{Reading, VitalKind};

/// HTTP request timeout for a single fetch. Well under the poll interval so
/// a hung request cannot bleed into the next cycle.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Top-level feed payload.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

/// One sample as reported by the feed. Fields arrive as strings and may be
/// missing, null, or empty for any given sample.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub created_at: DateTime<Utc>,
    /// SpO2, percent.
    #[serde(default)]
    pub field1: Option<String>,
    /// Body temperature, celsius.
    #[serde(default)]
    pub field2: Option<String>,
    /// Heart rate, bpm.
    #[serde(default)]
    pub field3: Option<String>,
}

impl FeedEntry {
    fn field(&self, kind: VitalKind) -> Option<&str> {
        match kind {
            VitalKind::Spo2 => self.field1.as_deref(),
            VitalKind::BodyTemperature => self.field2.as_deref(),
            VitalKind::HeartRate => self.field3.as_deref(),
        }
    }
}

/// Decode a feed response into exactly one reading per vital kind.
///
/// Samples are assumed oldest-first as the feed returns them; the scan runs
/// newest-to-oldest per field. Field text that is empty or does not parse
/// as a finite number is skipped, so one garbled sample cannot mask an
/// older valid one. A vital with no usable sample decodes to an absent
/// reading, never to zero.
pub fn decode_readings(response: &FeedResponse) -> Vec<Reading> {
    VitalKind::ALL
        .iter()
        .map(|&kind| {
            response
                .feeds
                .iter()
                .rev()
                .find_map(|entry| {
                    let text = entry.field(kind)?.trim();
                    if text.is_empty() {
                        return None;
                    }
                    let value = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
                    Some(Reading::new(kind, value, entry.created_at))
                })
                .unwrap_or_else(|| Reading::absent(kind))
        })
        .collect()
}

/// Source of telemetry readings, one fetch per poll cycle.
#[async_trait]
pub trait TelemetryFeed: Send + Sync {
    /// Fetch the latest samples and decode them into one reading per vital.
    async fn fetch_latest(&self) -> Result<Vec<Reading>, MonitorError>;
}

/// HTTP-backed telemetry feed.
pub struct HttpTelemetryFeed {
    client: reqwest::Client,
    config: FeedConfig,
}

impl HttpTelemetryFeed {
    pub fn new(config: FeedConfig) -> Result<Self, MonitorError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    fn feeds_url(&self) -> String {
        format!(
            "{}/channels/{}/feeds.json",
            self.config.base_url.trim_end_matches('/'),
            self.config.channel_id
        )
    }
}

#[async_trait]
impl TelemetryFeed for HttpTelemetryFeed {
    async fn fetch_latest(&self) -> Result<Vec<Reading>, MonitorError> {
        let mut request = self
            .client
            .get(self.feeds_url())
            .query(&[("results", self.config.results.to_string())]);
        if let Some(key) = &self.config.read_api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::FeedStatus(status.to_string()));
        }

        let payload: FeedResponse = response
            .json()
            .await
            .map_err(|e| MonitorError::MalformedPayload(e.to_string()))?;

        Ok(decode_readings(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(raw: &str) -> FeedResponse {
        serde_json::from_str(raw).expect("test payload must parse")
    }

    #[test]
    fn test_decode_takes_newest_value_per_field() {
        let response = parse(
            r#"{
                "feeds": [
                    {"created_at": "2024-05-01T10:00:00Z", "field1": "97", "field2": "36.8", "field3": "70"},
                    {"created_at": "2024-05-01T10:00:15Z", "field1": "96", "field2": "36.9", "field3": "72"}
                ]
            }"#,
        );

        let readings = decode_readings(&response);
        assert_eq!(readings.len(), 3);

        let spo2 = &readings[0];
        assert_eq!(spo2.kind, VitalKind::Spo2);
        assert_eq!(spo2.value, Some(96.0));
        assert_eq!(spo2.observed_at.to_rfc3339(), "2024-05-01T10:00:15+00:00");

        assert_eq!(readings[1].value, Some(36.9));
        assert_eq!(readings[2].value, Some(72.0));
    }

    #[test]
    fn test_decode_scans_backward_past_empty_fields() {
        // Newest sample is missing spo2; the older one still supplies it.
        let response = parse(
            r#"{
                "feeds": [
                    {"created_at": "2024-05-01T10:00:00Z", "field1": "97", "field3": "70"},
                    {"created_at": "2024-05-01T10:00:15Z", "field1": "", "field2": null, "field3": "75"}
                ]
            }"#,
        );

        let readings = decode_readings(&response);
        assert_eq!(readings[0].value, Some(97.0));
        assert!(readings[1].value.is_none());
        assert_eq!(readings[2].value, Some(75.0));
    }

    #[test]
    fn test_unparseable_field_treated_like_empty() {
        let response = parse(
            r#"{
                "feeds": [
                    {"created_at": "2024-05-01T10:00:00Z", "field3": "68"},
                    {"created_at": "2024-05-01T10:00:15Z", "field3": "n/a"}
                ]
            }"#,
        );

        let readings = decode_readings(&response);
        assert_eq!(readings[2].value, Some(68.0));
    }

    #[test]
    fn test_missing_fields_decode_to_absent_not_zero() {
        let response = parse(
            r#"{"feeds": [{"created_at": "2024-05-01T10:00:00Z"}]}"#,
        );

        let readings = decode_readings(&response);
        assert_eq!(readings.len(), 3);
        for reading in &readings {
            assert!(reading.value.is_none());
        }
    }

    #[test]
    fn test_empty_feed_yields_all_absent() {
        let response = parse(r#"{"feeds": []}"#);
        let readings = decode_readings(&response);
        assert!(readings.iter().all(|r| r.value.is_none()));
    }

    #[test]
    fn test_feeds_url_shape() {
        let feed = HttpTelemetryFeed::new(FeedConfig {
            base_url: "https://api.example.com/".to_string(),
            channel_id: "123456".to_string(),
            read_api_key: None,
            results: 10,
        })
        .expect("client must build");
        assert_eq!(
            feed.feeds_url(),
            "https://api.example.com/channels/123456/feeds.json"
        );
    }
}
