//! Service endpoints and synchronization tuning.
//!
//! Both structures implement `Deserialize` with defaults for every field, so a host application
//! can keep only the values it wants to change in its own configuration file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Endpoints of the services the controller talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Weather station query endpoint. Bounds are appended as query parameters.
    pub stations_url: String,
    /// Power plant query endpoint. Bounds are appended as query parameters.
    pub plants_url: String,
    /// Click telemetry endpoint.
    pub clicks_url: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            stations_url: "http://127.0.0.1:5000/weather-stations".to_string(),
            plants_url: "http://127.0.0.1:8000/plants".to_string(),
            clicks_url: "http://127.0.0.1:8000/clicks/".to_string(),
            user_agent: concat!("plantmap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ServiceConfig {
    /// Sets all three endpoints relative to a single base url, e.g. `http://localhost:8000`.
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            stations_url: format!("{base_url}/weather-stations"),
            plants_url: format!("{base_url}/plants"),
            clicks_url: format!("{base_url}/clicks/"),
            ..Default::default()
        }
    }
}

/// Timing of the requests issued by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum duration of a single request attempt. Serialized in milliseconds.
    #[serde(with = "millis")]
    pub request_timeout: Duration,
    /// Number of additional attempts for requests that failed with a retryable error.
    pub max_retries: u32,
    /// Delay before the first retry. Every next retry waits twice as long. Serialized in
    /// milliseconds.
    #[serde(with = "millis")]
    pub retry_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_retries: 0,
            retry_delay: Duration::from_millis(250),
        }
    }
}

impl SyncConfig {
    /// Delay before the retry number `attempt` (starting with 1).
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Durations as whole milliseconds, so that a hand-written config reads `"request_timeout": 5000`.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
