//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types by
//! the binary.

mod gateway;
mod logging;
mod output;
mod polling;
mod repl;
mod session;

pub use gateway::{DEFAULT_BASE_URL, FileGatewayConfig};
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use polling::FilePollingConfig;
pub use repl::FileReplConfig;
pub use session::FileSessionConfig;

use dbl_chat_application::DeliveryParams;
use dbl_chat_domain::delivery::backoff::PAGE_LIMIT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("gateway.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("gateway.base_url must start with http:// or https:// (got '{0}')")]
    InvalidBaseUrl(String),

    #[error("gateway.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("gateway.tail_idle_timeout_seconds cannot be 0")]
    InvalidTailIdleTimeout,

    #[error("session.lane cannot be empty")]
    EmptyLane,

    #[error("session.principal_id is required (set it in config or pass --principal-id)")]
    MissingPrincipalId,

    #[error("polling.{0} must be at least 1")]
    InvalidPolling(&'static str),

    #[error("polling.{0} must be a finite number of at least 1.0")]
    InvalidPollingFactor(&'static str),

    #[error("polling.page_limit cannot exceed {max} (got {got})")]
    PageLimitTooLarge { got: u32, max: u32 },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Gateway connection settings
    pub gateway: FileGatewayConfig,
    /// Who is talking, and to which model
    pub session: FileSessionConfig,
    /// Poll-mode delivery tunables
    pub polling: FilePollingConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic log file and conversation transcript
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Check the merged configuration.
    ///
    /// Run after CLI overrides are applied: a missing principal id is only
    /// an error once every source had its chance to supply one.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let base_url = self.gateway.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidBaseUrl(base_url.to_string()));
        }
        if self.gateway.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.gateway.tail_idle_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTailIdleTimeout);
        }
        if self.session.lane.trim().is_empty() {
            return Err(ConfigValidationError::EmptyLane);
        }
        if self
            .session
            .principal_id
            .as_deref()
            .is_none_or(|id| id.trim().is_empty())
        {
            return Err(ConfigValidationError::MissingPrincipalId);
        }
        self.validate_polling()
    }

    fn validate_polling(&self) -> Result<(), ConfigValidationError> {
        let polling = &self.polling;
        if polling.initial_delay_ms == 0 {
            return Err(ConfigValidationError::InvalidPolling("initial_delay_ms"));
        }
        if polling.idle_ceiling_ms == 0 {
            return Err(ConfigValidationError::InvalidPolling("idle_ceiling_ms"));
        }
        if polling.failure_ceiling_ms == 0 {
            return Err(ConfigValidationError::InvalidPolling("failure_ceiling_ms"));
        }
        if polling.max_failures == 0 {
            return Err(ConfigValidationError::InvalidPolling("max_failures"));
        }
        if polling.page_limit == 0 {
            return Err(ConfigValidationError::InvalidPolling("page_limit"));
        }
        if polling.page_limit > PAGE_LIMIT {
            return Err(ConfigValidationError::PageLimitTooLarge {
                got: polling.page_limit,
                max: PAGE_LIMIT,
            });
        }
        // NaN fails every comparison, so test for the accepted range.
        if !(polling.idle_factor.is_finite() && polling.idle_factor >= 1.0) {
            return Err(ConfigValidationError::InvalidPollingFactor("idle_factor"));
        }
        if !(polling.failure_factor.is_finite() && polling.failure_factor >= 1.0) {
            return Err(ConfigValidationError::InvalidPollingFactor("failure_factor"));
        }
        Ok(())
    }

    /// Delivery engine settings derived from `[gateway]` and `[polling]`.
    pub fn delivery_params(&self) -> DeliveryParams {
        DeliveryParams::default()
            .with_prefer_streaming(self.gateway.prefer_streaming)
            .with_tail_idle_timeout(self.gateway.tail_idle_timeout())
            .with_poll_policy(self.polling.to_policy())
    }

    /// Render as TOML (for `--show-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
