//! Response matching.
//!
//! [`match_response`] decides whether an event ends the wait for a
//! correlation id, and if so what the operator sees. Execution errors and
//! denials reported by the gateway are terminal outcomes, not failures.

use super::event::{Event, EventKind};
use crate::conversation::value_objects::CorrelationId;
use serde_json::Value;

/// Decision value that ends a wait.
pub const DENY: &str = "DENY";

/// Terminal outcome of one submitted turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// Generated text.
    Output(String),
    /// The execution failed on the gateway side.
    ExecutionError { code: String, message: String },
    /// Execution finished without any text we know how to read.
    NoOutput,
    /// The policy layer denied the intent; carries the decision payload.
    Denied(Value),
}

impl ResponseOutcome {
    /// True for outcomes the operator should read as a failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ResponseOutcome::ExecutionError { .. } | ResponseOutcome::Denied(_)
        )
    }

    /// Rendered text of the outcome.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for ResponseOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseOutcome::Output(text) => f.write_str(text),
            ResponseOutcome::ExecutionError { code, message } => {
                write!(f, "(execution_error) {}: {}", code, message)
            }
            ResponseOutcome::NoOutput => f.write_str("(execution) no output_text"),
            ResponseOutcome::Denied(payload) => write!(f, "decision: {}", payload),
        }
    }
}

/// Test `event` against `target`.
///
/// Only an exact correlation id match is considered. Returns `None` when
/// the event does not end the wait.
pub fn match_response(event: &Event, target: &CorrelationId) -> Option<ResponseOutcome> {
    if event.correlation_id.as_deref() != Some(target.as_str()) {
        return None;
    }
    let payload = event.payload.as_object()?;

    match event.kind {
        EventKind::Execution => {
            if let Some(text) = non_blank(payload.get("output_text")) {
                return Some(ResponseOutcome::Output(text.to_string()));
            }

            let alternate = payload
                .get("output")
                .filter(|v| is_truthy(v))
                .or_else(|| payload.get("result"));
            if let Some(text) = alternate
                .and_then(Value::as_object)
                .and_then(|obj| non_blank(obj.get("text")))
            {
                return Some(ResponseOutcome::Output(text.to_string()));
            }

            if let Some(error) = payload.get("error").and_then(Value::as_object) {
                return Some(ResponseOutcome::ExecutionError {
                    code: field_text(error.get("code")).unwrap_or_else(|| "error".to_string()),
                    message: field_text(error.get("message")).unwrap_or_default(),
                });
            }

            Some(ResponseOutcome::NoOutput)
        }
        EventKind::Decision => {
            if payload.get("decision").and_then(Value::as_str) == Some(DENY) {
                Some(ResponseOutcome::Denied(event.payload.clone()))
            } else {
                None
            }
        }
        EventKind::Other(_) => None,
    }
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

fn field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target() -> CorrelationId {
        CorrelationId::new("X")
    }

    fn execution(payload: Value) -> Event {
        Event::new(0, "X", EventKind::Execution, payload)
    }

    #[test]
    fn test_output_text() {
        let outcome = match_response(&execution(json!({"output_text": "hi"})), &target());
        assert_eq!(outcome, Some(ResponseOutcome::Output("hi".to_string())));
        assert_eq!(outcome.unwrap().text(), "hi");
    }

    #[test]
    fn test_execution_error_is_formatted() {
        let event = execution(json!({"error": {"code": "E1", "message": "boom"}}));
        let outcome = match_response(&event, &target()).unwrap();
        assert_eq!(outcome.to_string(), "(execution_error) E1: boom");
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_execution_error_defaults() {
        let outcome = match_response(&execution(json!({"error": {}})), &target()).unwrap();
        assert_eq!(outcome.to_string(), "(execution_error) error: ");

        let outcome =
            match_response(&execution(json!({"error": {"code": 503}})), &target()).unwrap();
        assert_eq!(outcome.to_string(), "(execution_error) 503: ");
    }

    #[test]
    fn test_blank_output_text_falls_through_to_alternates() {
        let event = execution(json!({"output_text": "   ", "output": {"text": "from output"}}));
        assert_eq!(
            match_response(&event, &target()),
            Some(ResponseOutcome::Output("from output".to_string()))
        );

        let event = execution(json!({"output": {}, "result": {"text": "from result"}}));
        assert_eq!(
            match_response(&event, &target()),
            Some(ResponseOutcome::Output("from result".to_string()))
        );
    }

    #[test]
    fn test_text_beats_error() {
        let event = execution(json!({"output_text": "ok", "error": {"code": "E"}}));
        assert_eq!(
            match_response(&event, &target()),
            Some(ResponseOutcome::Output("ok".to_string()))
        );
    }

    #[test]
    fn test_execution_without_output_is_still_terminal() {
        let outcome = match_response(&execution(json!({"usage": 12})), &target()).unwrap();
        assert_eq!(outcome, ResponseOutcome::NoOutput);
        assert_eq!(outcome.to_string(), "(execution) no output_text");
    }

    #[test]
    fn test_non_object_payload_does_not_match() {
        assert_eq!(match_response(&execution(json!("hi")), &target()), None);
    }

    #[test]
    fn test_other_correlation_ids_never_match() {
        let mut event = execution(json!({"output_text": "hi"}));
        event.correlation_id = Some("Y".to_string());
        assert_eq!(match_response(&event, &target()), None);

        event.correlation_id = None;
        assert_eq!(match_response(&event, &target()), None);
    }

    #[test]
    fn test_deny_decision_is_terminal() {
        let event = Event::new(
            3,
            "X",
            EventKind::Decision,
            json!({"decision": "DENY", "reason": "policy"}),
        );
        let outcome = match_response(&event, &target()).unwrap();
        assert!(matches!(outcome, ResponseOutcome::Denied(_)));
        let text = outcome.to_string();
        assert!(text.starts_with("decision: "));
        assert!(text.contains("policy"));
    }

    #[test]
    fn test_allow_decision_is_skipped() {
        let event = Event::new(3, "X", EventKind::Decision, json!({"decision": "ALLOW"}));
        assert_eq!(match_response(&event, &target()), None);
    }

    #[test]
    fn test_other_kinds_are_skipped() {
        let event = Event::new(
            3,
            "X",
            EventKind::Other("INTENT".to_string()),
            json!({"output_text": "echo"}),
        );
        assert_eq!(match_response(&event, &target()), None);
    }
}
