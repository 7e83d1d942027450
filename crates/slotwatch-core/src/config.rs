//! Configuration models for config.toml and secret.json.

use crate::highlight::DEFAULT_HIGHLIGHT_TTL;
use crate::query::AppointmentQuery;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(15_000);
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Root of config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Query selected on start-up.
    #[serde(default)]
    pub query: AppointmentQuery,
}

/// Timing of periodic alert scans and highlights.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_highlight_ttl_ms")]
    pub highlight_ttl_ms: u64,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn highlight_ttl(&self) -> Duration {
        Duration::from_millis(self.highlight_ttl_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            highlight_ttl_ms: default_highlight_ttl_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_highlight_ttl_ms() -> u64 {
    DEFAULT_HIGHLIGHT_TTL.as_millis() as u64
}

/// Non-secret oracle settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OracleConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Overrides the Gemini endpoint (used by tests and proxies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OracleConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            base_url: None,
        }
    }
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Root of secret.json.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl SecretConfig {
    /// The Gemini key, if one is set and non-blank.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini
            .as_ref()
            .map(|g| g.api_key.trim())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
        assert_eq!(config.polling.interval(), Duration::from_secs(15));
        assert_eq!(config.polling.highlight_ttl(), Duration::from_secs(5));
        assert_eq!(config.oracle.model, "gemini-2.5-flash");
        assert_eq!(config.query, AppointmentQuery::default());
    }

    #[test]
    fn test_partial_sections_fill_in_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
            [polling]
            interval_ms = 30000

            [query]
            country = "Germany"
            consulate = "Berlin, Germany"
            visa_type = "H-1B Work Visa"
            "#,
        )
        .unwrap();
        assert_eq!(config.polling.interval_ms, 30_000);
        assert_eq!(config.polling.highlight_ttl_ms, 5_000);
        assert_eq!(config.query.consulate, "Berlin, Germany");
        assert_eq!(config.oracle.request_timeout_secs, 60);
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let secrets = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "   ".into(),
                model_name: None,
            }),
        };
        assert_eq!(secrets.gemini_api_key(), None);
        assert_eq!(SecretConfig::default().gemini_api_key(), None);
    }
}
