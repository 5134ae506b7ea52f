//! Configuration file loading for dbl-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DBL_CHAT_*` environment variables (`__` separates section and key)
//! 2. `--config <path>` specified file
//! 3. Project root: `./dbl-chat.toml` or `./.dbl-chat.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/dbl-chat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_BASE_URL, FileConfig, FileGatewayConfig, FileLoggingConfig,
    FileOutputConfig, FilePollingConfig, FileReplConfig, FileSessionConfig,
};
pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX};
