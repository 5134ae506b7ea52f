//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write diagnostics here instead of stderr
    pub file: Option<String>,
    /// JSONL conversation transcript
    pub transcript: Option<String>,
}
