//! Session identity configuration from TOML (`[session]` section)

use dbl_chat_domain::conversation::profile::DEFAULT_LANE;
use serde::{Deserialize, Serialize};

/// Raw session configuration from TOML
///
/// `principal_id` has no default; it must come from some source before a
/// session can start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    pub principal_id: Option<String>,
    pub workspace_id: Option<String>,
    pub lane: String,
    /// Explicit model; the gateway's first advertised model otherwise
    pub model_id: Option<String>,
    pub provider: Option<String>,
    pub max_output_tokens: Option<u32>,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            principal_id: None,
            workspace_id: None,
            lane: DEFAULT_LANE.to_string(),
            model_id: None,
            provider: None,
            max_output_tokens: None,
        }
    }
}
