use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Path of the status document on the upstream proxy.
pub const STATS_PATH: &str = "/stats";

/// Upstream status endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the proxy frontend. `/stats` is appended.
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl UpstreamConfig {
    /// Full URL of the status endpoint.
    pub fn stats_url(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), STATS_PATH)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}
