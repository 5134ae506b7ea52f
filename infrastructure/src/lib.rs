//! Infrastructure layer for dbl-chat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gateway;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, ConfigValidationError, FileConfig, FileGatewayConfig,
    FileLoggingConfig, FileOutputConfig, FilePollingConfig, FileReplConfig, FileSessionConfig,
};
pub use gateway::{HttpGatewayTransport, SseEventDecoder};
pub use logging::JsonlConversationLogger;
