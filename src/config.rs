//! Feed configuration
//!
//! The feed endpoint is configured through environment variables. Missing
//! endpoint configuration is fatal to the poller only, never to the
//! session: callers are expected to fall back to a feedless session that
//! serves "no data" state.

use crate::error::MonitorError;

pub const ENV_FEED_URL: &str = "VITALWATCH_FEED_URL";
pub const ENV_CHANNEL_ID: &str = "VITALWATCH_CHANNEL_ID";
pub const ENV_READ_API_KEY: &str = "VITALWATCH_READ_API_KEY";
pub const ENV_FEED_RESULTS: &str = "VITALWATCH_FEED_RESULTS";

/// How many recent samples to request per fetch.
const DEFAULT_RESULTS: u32 = 10;

/// Connection settings for the telemetry feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed API base URL, e.g. `https://api.thingspeak.com`.
    pub base_url: String,
    /// Channel carrying the vital-sign fields.
    pub channel_id: String,
    /// Read key for private channels.
    pub read_api_key: Option<String>,
    /// Samples requested per fetch.
    pub results: u32,
}

impl FeedConfig {
    pub fn new(base_url: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            channel_id: channel_id.into(),
            read_api_key: None,
            results: DEFAULT_RESULTS,
        }
    }

    /// Read the configuration from the environment.
    ///
    /// `VITALWATCH_FEED_URL` and `VITALWATCH_CHANNEL_ID` are required and
    /// reported by name when absent; the read key and result count are
    /// optional.
    pub fn from_env() -> Result<Self, MonitorError> {
        let base_url = require(ENV_FEED_URL)?;
        let channel_id = require(ENV_CHANNEL_ID)?;
        let read_api_key = std::env::var(ENV_READ_API_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty());
        let results = std::env::var(ENV_FEED_RESULTS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RESULTS);

        Ok(Self {
            base_url,
            channel_id,
            read_api_key,
            results,
        })
    }
}

fn require(name: &str) -> Result<String, MonitorError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| MonitorError::MissingConfig(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_results() {
        let config = FeedConfig::new("https://api.example.com", "42");
        assert_eq!(config.results, DEFAULT_RESULTS);
        assert!(config.read_api_key.is_none());
    }

    #[test]
    fn test_missing_env_names_the_variable() {
        // Process env is shared across tests; use a variable nothing sets.
        let err = require("VITALWATCH_TEST_UNSET_VARIABLE").unwrap_err();
        match err {
            MonitorError::MissingConfig(name) => {
                assert_eq!(name, "VITALWATCH_TEST_UNSET_VARIABLE")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
