//! Poll-mode delivery configuration from TOML (`[polling]` section)

use dbl_chat_domain::PollPolicy;
use dbl_chat_domain::delivery::backoff::{
    FAILURE_CEILING, FAILURE_FACTOR, IDLE_CEILING, IDLE_FACTOR, INITIAL_DELAY, MAX_FAILURES,
    PAGE_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw polling configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePollingConfig {
    pub initial_delay_ms: u64,
    pub idle_factor: f64,
    pub idle_ceiling_ms: u64,
    pub failure_factor: f64,
    pub failure_ceiling_ms: u64,
    /// Consecutive failures that end a wait
    pub max_failures: u32,
    pub page_limit: u32,
}

impl Default for FilePollingConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: INITIAL_DELAY.as_millis() as u64,
            idle_factor: IDLE_FACTOR,
            idle_ceiling_ms: IDLE_CEILING.as_millis() as u64,
            failure_factor: FAILURE_FACTOR,
            failure_ceiling_ms: FAILURE_CEILING.as_millis() as u64,
            max_failures: MAX_FAILURES,
            page_limit: PAGE_LIMIT,
        }
    }
}

impl FilePollingConfig {
    /// Convert to the engine policy. Pages are capped at [`PAGE_LIMIT`].
    pub fn to_policy(&self) -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            idle_factor: self.idle_factor,
            idle_ceiling: Duration::from_millis(self.idle_ceiling_ms),
            failure_factor: self.failure_factor,
            failure_ceiling: Duration::from_millis(self.failure_ceiling_ms),
            max_failures: self.max_failures,
            page_limit: self.page_limit.min(PAGE_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy_defaults() {
        assert_eq!(FilePollingConfig::default().to_policy(), PollPolicy::default());
    }

    #[test]
    fn test_page_limit_is_capped() {
        let config = FilePollingConfig {
            page_limit: 100_000,
            ..FilePollingConfig::default()
        };
        assert_eq!(config.to_policy().page_limit, PAGE_LIMIT);
    }
}
