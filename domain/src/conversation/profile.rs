//! Per-session chat profile: who is talking, where, and to which model.

use crate::capability::selection::ModelSelection;
use serde::{Deserialize, Serialize};

/// Default lane for operator-originated intents.
pub const DEFAULT_LANE: &str = "user";

/// Static attributes stamped on every intent of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatProfile {
    pub principal_id: String,
    pub workspace_id: Option<String>,
    pub lane: String,
    pub model: ModelSelection,
    pub max_output_tokens: Option<u32>,
}

impl ChatProfile {
    pub fn new(principal_id: impl Into<String>, model: ModelSelection) -> Self {
        Self {
            principal_id: principal_id.into(),
            workspace_id: None,
            lane: DEFAULT_LANE.to_string(),
            model,
            max_output_tokens: None,
        }
    }

    pub fn with_workspace_id(mut self, workspace_id: Option<String>) -> Self {
        self.workspace_id = workspace_id;
        self
    }

    pub fn with_lane(mut self, lane: impl Into<String>) -> Self {
        self.lane = lane.into();
        self
    }

    pub fn with_max_output_tokens(mut self, max: Option<u32>) -> Self {
        self.max_output_tokens = max;
        self
    }
}
