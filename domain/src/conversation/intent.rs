//! Intent envelope posted to `/ingress/intent`.
//!
//! Optional attributes of [`IntentInputs`] are omitted from the wire form
//! when absent; receivers never see an explicit `null` for them.

use super::profile::ChatProfile;
use super::turn::Turn;
use super::value_objects::{CorrelationId, ThreadId, TurnId};
use serde::{Deserialize, Serialize};

/// Envelope schema version spoken by this client.
pub const INTERFACE_VERSION: u32 = 2;
/// Intent type for chat turns.
pub const CHAT_INTENT_TYPE: &str = "chat.message";
/// Capability requested by chat turns.
pub const CHAT_CAPABILITY: &str = "chat";
/// Stream every chat intent is appended to.
pub const DEFAULT_STREAM_ID: &str = "default";
/// Actor name stamped on submitted intents.
pub const ACTOR: &str = "dbl-chat-cli";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentEnvelope {
    pub interface_version: u32,
    pub correlation_id: CorrelationId,
    pub payload: IntentPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPayload {
    pub stream_id: String,
    pub lane: String,
    pub actor: String,
    pub intent_type: String,
    pub thread_id: ThreadId,
    pub turn_id: TurnId,
    pub parent_turn_id: Option<TurnId>,
    pub payload: MessageBody,
    pub inputs: IntentInputs,
    pub requested_model_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentInputs {
    pub principal_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    pub intent_type: String,
    pub capability: String,
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Message length in Unicode scalar values.
    pub input_chars: usize,
    /// Message length in UTF-8 bytes.
    pub input_bytes: usize,
}

impl IntentEnvelope {
    /// Build the chat intent for `turn` within `thread_id`.
    pub fn chat(
        profile: &ChatProfile,
        thread_id: &ThreadId,
        turn: &Turn,
        correlation_id: CorrelationId,
    ) -> Self {
        let model_id = profile.model.model_id.clone();
        let inputs = IntentInputs {
            principal_id: profile.principal_id.clone(),
            workspace_id: non_empty(profile.workspace_id.as_deref()),
            intent_type: CHAT_INTENT_TYPE.to_string(),
            capability: CHAT_CAPABILITY.to_string(),
            model_id: model_id.clone(),
            provider: non_empty(profile.model.provider.as_deref()),
            max_output_tokens: profile.max_output_tokens,
            input_chars: turn.message.chars().count(),
            input_bytes: turn.message.len(),
        };

        Self {
            interface_version: INTERFACE_VERSION,
            correlation_id,
            payload: IntentPayload {
                stream_id: DEFAULT_STREAM_ID.to_string(),
                lane: profile.lane.clone(),
                actor: ACTOR.to_string(),
                intent_type: CHAT_INTENT_TYPE.to_string(),
                thread_id: thread_id.clone(),
                turn_id: turn.turn_id.clone(),
                parent_turn_id: turn.parent_turn_id.clone(),
                payload: MessageBody {
                    message: turn.message.clone(),
                },
                inputs,
                requested_model_id: model_id,
            },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::selection::ModelSelection;
    use crate::conversation::turn::TurnChain;

    fn profile() -> ChatProfile {
        ChatProfile::new(
            "alice",
            ModelSelection {
                model_id: "gpt-4.1".to_string(),
                provider: None,
            },
        )
    }

    #[test]
    fn test_absent_optional_inputs_are_omitted() {
        let mut chain = TurnChain::for_thread(ThreadId::new("t"));
        let turn = chain.append("héllo");
        let envelope =
            IntentEnvelope::chat(&profile(), chain.thread_id(), &turn, CorrelationId::new("c"));
        let json = serde_json::to_value(&envelope).unwrap();
        let inputs = json["payload"]["inputs"].as_object().unwrap();

        assert!(!inputs.contains_key("workspace_id"));
        assert!(!inputs.contains_key("provider"));
        assert!(!inputs.contains_key("max_output_tokens"));
        assert_eq!(inputs["input_chars"], 5);
        assert_eq!(inputs["input_bytes"], 6);
        assert_eq!(inputs["capability"], "chat");
    }

    #[test]
    fn test_envelope_shape() {
        let mut chain = TurnChain::for_thread(ThreadId::new("thread-1"));
        let first = chain.append("one");
        let second = chain.append("two");
        let profile = profile()
            .with_workspace_id(Some("ws".to_string()))
            .with_lane("ops")
            .with_max_output_tokens(Some(256));

        let envelope =
            IntentEnvelope::chat(&profile, chain.thread_id(), &second, CorrelationId::new("c2"));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["interface_version"], 2);
        assert_eq!(json["correlation_id"], "c2");
        let payload = &json["payload"];
        assert_eq!(payload["stream_id"], "default");
        assert_eq!(payload["lane"], "ops");
        assert_eq!(payload["actor"], ACTOR);
        assert_eq!(payload["intent_type"], "chat.message");
        assert_eq!(payload["thread_id"], "thread-1");
        assert_eq!(payload["parent_turn_id"], first.turn_id.as_str());
        assert_eq!(payload["payload"]["message"], "two");
        assert_eq!(payload["requested_model_id"], "gpt-4.1");
        assert_eq!(payload["inputs"]["workspace_id"], "ws");
        assert_eq!(payload["inputs"]["max_output_tokens"], 256);
    }

    #[test]
    fn test_first_turn_sends_null_parent() {
        let mut chain = TurnChain::new();
        let turn = chain.append("hi");
        let envelope =
            IntentEnvelope::chat(&profile(), chain.thread_id(), &turn, CorrelationId::generate());
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["payload"]["parent_turn_id"].is_null());
    }
}
