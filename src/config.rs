// ABOUTME: Gate and dispatcher configuration with defaults and env loading.
// ABOUTME: Durations are expressed in milliseconds when deserialized.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::GateError;
use crate::gate::IntoBound;

/// Environment variable holding the maximum number of in-flight requests.
pub const MAX_CONCURRENCY_ENV: &str = "ASYNC_REQUESTS_MAX_CONCURRENCY";

/// Environment variable holding the admission retry interval in milliseconds.
pub const RETRY_INTERVAL_ENV: &str = "ASYNC_REQUESTS_RETRY_INTERVAL_MS";

/// Default admission retry interval.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for a gate and the dispatcher built around it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Maximum concurrently admitted operations. Zero admits nothing.
    pub max_concurrency: usize,
    /// Sleep between failed admission checks. Upper bound on the extra
    /// latency a waiting caller sees once a slot frees up.
    #[serde(rename = "retry_interval_ms", deserialize_with = "millis")]
    pub retry_interval: Duration,
    /// Per-request timeout for the default HTTP client.
    #[serde(rename = "request_timeout_ms", deserialize_with = "millis")]
    pub request_timeout: Duration,
    /// User agent for the default HTTP client.
    pub user_agent: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 10,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("async-requests/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GateConfig {
    /// Create a config with the given concurrency and defaults elsewhere.
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency,
            ..Default::default()
        }
    }

    /// Set the admission retry interval.
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Set the request timeout of the default HTTP client.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the user agent of the default HTTP client.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load a config from `ASYNC_REQUESTS_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, GateError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GateError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_CONCURRENCY_ENV) {
            config.max_concurrency = raw.as_str().into_bound()?;
        }

        if let Some(raw) = lookup(RETRY_INTERVAL_ENV) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                GateError::InvalidRetryInterval(format!("{:?} is not a whole number of ms", raw))
            })?;
            config.retry_interval = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the settings that have no type-level guarantee.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.retry_interval.is_zero() {
            return Err(GateError::InvalidRetryInterval(
                "retry interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GateConfig::default();
        assert_eq!(config.max_concurrency, 10);
        assert_eq!(config.retry_interval, Duration::from_millis(10));
        assert!(config.user_agent.starts_with("async-requests/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = GateConfig::from_lookup(lookup(&[
            (MAX_CONCURRENCY_ENV, "2"),
            (RETRY_INTERVAL_ENV, "25"),
        ]))
        .unwrap();
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.retry_interval, Duration::from_millis(25));
    }

    #[test]
    fn test_from_lookup_empty_keeps_defaults() {
        let config = GateConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GateConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_bound() {
        for raw in ["-1", "2.5", "lots"] {
            let result = GateConfig::from_lookup(lookup(&[(MAX_CONCURRENCY_ENV, raw)]));
            assert!(
                matches!(result, Err(GateError::InvalidBound(_))),
                "expected InvalidBound for {:?}, got {:?}",
                raw,
                result
            );
        }
    }

    #[test]
    fn test_from_lookup_rejects_zero_retry_interval() {
        let result = GateConfig::from_lookup(lookup(&[(RETRY_INTERVAL_ENV, "0")]));
        assert!(matches!(result, Err(GateError::InvalidRetryInterval(_))));
    }

    #[test]
    fn test_deserialize_millis() {
        let config: GateConfig = serde_json::from_value(serde_json::json!({
            "max_concurrency": 4,
            "retry_interval_ms": 5,
            "request_timeout_ms": 1000
        }))
        .unwrap();
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.retry_interval, Duration::from_millis(5));
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.user_agent, GateConfig::default().user_agent);
    }

    #[test]
    fn test_builder_setters() {
        let config = GateConfig::new(3)
            .retry_interval(Duration::from_millis(1))
            .user_agent("test-agent");
        assert_eq!(config.max_concurrency, 3);
        assert_eq!(config.retry_interval, Duration::from_millis(1));
        assert_eq!(config.user_agent, "test-agent");
    }
}
