//! Gateway transport port
//!
//! Defines the interface for talking to the agent gateway: the capability
//! descriptor, intent ingress, and the two read surfaces of the event log.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use dbl_chat_domain::{Capabilities, Event, IntentEnvelope};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during gateway transport operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("{surface} surface not found on gateway")]
    NotFound { surface: String },

    #[error("Gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Whether the gateway said the requested surface does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            TransportError::NotFound { .. } => true,
            TransportError::Status { status, .. } => matches!(status, 404 | 410),
            _ => false,
        }
    }
}

/// One page of `GET /snapshot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotPage {
    /// Total length of the event log at read time.
    pub length: u64,
    pub events: Vec<Event>,
}

/// Live event stream from `GET /tail`.
///
/// Malformed blocks are dropped by the adapter; an `Err` item means the
/// connection itself failed.
pub type EventStream = BoxStream<'static, Result<Event, TransportError>>;

/// Transport to the agent gateway
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// `GET /capabilities`
    async fn capabilities(&self) -> Result<Capabilities, TransportError>;

    /// `POST /ingress/intent`; returns the gateway's acknowledgement.
    async fn post_intent(
        &self,
        envelope: &IntentEnvelope,
    ) -> Result<serde_json::Value, TransportError>;

    /// `GET /snapshot?offset&limit`
    async fn snapshot(&self, offset: u64, limit: u32) -> Result<SnapshotPage, TransportError>;

    /// `GET /tail?since`: events with index strictly greater than `since`.
    async fn tail(&self, since: i64) -> Result<EventStream, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(
            TransportError::NotFound {
                surface: "snapshot".to_string()
            }
            .is_not_found()
        );
        assert!(
            TransportError::Status {
                status: 404,
                body: String::new()
            }
            .is_not_found()
        );
        assert!(
            !TransportError::Status {
                status: 503,
                body: String::new()
            }
            .is_not_found()
        );
        assert!(!TransportError::Timeout.is_not_found());
    }

    #[test]
    fn test_snapshot_page_decodes_partial_body() {
        let page: SnapshotPage = serde_json::from_str(r#"{"events": []}"#).unwrap();
        assert_eq!(page.length, 0);
        assert!(page.events.is_empty());
    }
}
