//! Events read from the gateway's append-only log.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kind of a gateway event. Only the first two take part in matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Execution,
    Decision,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Execution => "EXECUTION",
            EventKind::Decision => "DECISION",
            EventKind::Other(kind) => kind,
        }
    }
}

impl Default for EventKind {
    fn default() -> Self {
        EventKind::Other(String::new())
    }
}

impl From<String> for EventKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "EXECUTION" => EventKind::Execution,
            "DECISION" => EventKind::Decision,
            _ => EventKind::Other(kind),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One immutable log entry.
///
/// The gateway delivers events at least once; duplicates and reordering
/// within a page happen. Fields with an unexpected JSON type decode as
/// absent instead of failing the whole event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, deserialize_with = "lenient_index")]
    pub index: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub kind: EventKind,
    #[serde(default)]
    pub payload: Value,
}

impl Event {
    pub fn new(
        index: u64,
        correlation_id: impl Into<String>,
        kind: EventKind,
        payload: Value,
    ) -> Self {
        Self {
            index: Some(index),
            correlation_id: Some(correlation_id.into()),
            kind,
            payload,
        }
    }

    /// Field lookup on an object payload.
    pub fn payload_field(&self, key: &str) -> Option<&Value> {
        self.payload.as_object()?.get(key)
    }
}

fn lenient_index<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_u64())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_execution_event() {
        let event: Event = serde_json::from_value(json!({
            "index": 7,
            "correlation_id": "X",
            "kind": "EXECUTION",
            "payload": {"output_text": "hi"}
        }))
        .unwrap();

        assert_eq!(event.index, Some(7));
        assert_eq!(event.correlation_id.as_deref(), Some("X"));
        assert_eq!(event.kind, EventKind::Execution);
        assert_eq!(event.payload_field("output_text"), Some(&json!("hi")));
    }

    #[test]
    fn test_decode_tolerates_odd_field_types() {
        let event: Event = serde_json::from_value(json!({
            "index": "seven",
            "correlation_id": 42,
            "kind": "INTENT"
        }))
        .unwrap();

        assert_eq!(event.index, None);
        assert_eq!(event.correlation_id, None);
        assert_eq!(event.kind, EventKind::Other("INTENT".to_string()));
        assert!(event.payload.is_null());
        assert_eq!(event.payload_field("anything"), None);
    }

    #[test]
    fn test_negative_index_is_absent() {
        let event: Event = serde_json::from_str(r#"{"index": -3}"#).unwrap();
        assert_eq!(event.index, None);
    }

    #[test]
    fn test_kind_round_trips_through_string() {
        let event = Event::new(1, "c", EventKind::Decision, json!({}));
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["kind"], "DECISION");
    }
}
