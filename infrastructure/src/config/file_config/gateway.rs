//! Gateway connection configuration from TOML (`[gateway]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gateway configured when nothing else is.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8010";

/// Raw gateway configuration from TOML
///
/// # Example
///
/// ```toml
/// [gateway]
/// base_url = "http://127.0.0.1:8010"
/// timeout_seconds = 10
/// tail_idle_timeout_seconds = 30
/// prefer_streaming = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Gateway root URL
    pub base_url: String,
    /// Bound for a single request
    pub timeout_seconds: u64,
    /// Silence on the tail stream before reconnecting
    pub tail_idle_timeout_seconds: u64,
    /// Use the tail surface when advertised
    pub prefer_streaming: bool,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 10,
            tail_idle_timeout_seconds: 30,
            prefer_streaming: true,
        }
    }
}

impl FileGatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn tail_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.tail_idle_timeout_seconds)
    }
}
