//! Response Correlation & Delivery Engine.
//!
//! Given a correlation id, [`ResponseDeliveryEngine::await_response`] watches
//! the gateway event log until the single matching terminal event shows up,
//! using whichever read surface the session negotiated.
//!
//! # Strategy
//!
//! The delivery mode is chosen once at construction
//! ([`DeliveryMode::select`]) and fixed for the engine's lifetime:
//!
//! - **Tail**: one streaming connection per call, resumed after `last_index`
//!   ([`TailSource`]).
//! - **Poll**: snapshot pages with adaptive backoff ([`PollSource`]).
//!
//! Both are [`EventSource`]s over the same owned [`ReadCursor`], so
//! `last_index` stays monotonic across any mixture of modes, and a
//! cancelled call can be re-issued with the same correlation id.

mod poll;
mod source;
mod tail;

pub use poll::PollSource;
pub use source::EventSource;
pub use tail::TailSource;

use crate::config::DeliveryParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::gateway_transport::{GatewayTransport, TransportError};
use dbl_chat_domain::{
    Capabilities, CorrelationId, DeliveryMode, ReadCursor, ResponseOutcome, Surface,
    match_response,
};
use futures::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that end a wait without a response.
///
/// Gateway-reported execution errors and denials are not here; they are
/// [`ResponseOutcome`]s.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Gateway advertises no supported read surface")]
    NoReadSurface,

    #[error("Snapshot surface not supported by gateway")]
    SnapshotUnsupported,

    #[error("Polling failed {failures} times in a row: {last_error}")]
    PollingExhausted {
        failures: u32,
        last_error: TransportError,
    },

    #[error("Tail stream unavailable: {0}")]
    TailUnavailable(TransportError),
}

impl DeliveryError {
    /// Whether the session configuration itself is unusable.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DeliveryError::NoReadSurface | DeliveryError::SnapshotUnsupported
        )
    }
}

/// Waits for responses to submitted turns.
///
/// Owns the session's [`ReadCursor`]; `&mut self` on every call keeps
/// cursor mutation exclusive to the single wait in flight.
pub struct ResponseDeliveryEngine {
    transport: Arc<dyn GatewayTransport>,
    mode: Option<DeliveryMode>,
    source: Option<Box<dyn EventSource>>,
    snapshot_available: bool,
    cursor: ReadCursor,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ResponseDeliveryEngine {
    /// Select the delivery strategy from negotiated capabilities.
    ///
    /// Construction never fails: a gateway without a usable surface makes
    /// every `await_response` call fail with [`DeliveryError::NoReadSurface`]
    /// before any network call.
    pub fn new(
        transport: Arc<dyn GatewayTransport>,
        capabilities: &Capabilities,
        params: DeliveryParams,
    ) -> Self {
        let mode = DeliveryMode::select(capabilities, params.prefer_streaming);
        let source: Option<Box<dyn EventSource>> = match mode {
            Some(DeliveryMode::Tail) => Some(Box::new(TailSource::new(
                Arc::clone(&transport),
                params.tail_idle_timeout,
            ))),
            Some(DeliveryMode::Poll) => {
                Some(Box::new(PollSource::new(Arc::clone(&transport), params.poll)))
            }
            None => None,
        };

        match mode {
            Some(mode) => info!("Response delivery mode: {}", mode),
            None => warn!(
                "Gateway advertises no usable read surface (surfaces: {:?})",
                capabilities.enabled_surfaces()
            ),
        }

        Self {
            transport,
            mode,
            source,
            snapshot_available: capabilities.supports(Surface::Snapshot),
            cursor: ReadCursor::new(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Start from a known cursor instead of the log origin.
    pub fn with_cursor(mut self, cursor: ReadCursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn mode(&self) -> Option<DeliveryMode> {
        self.mode
    }

    pub fn cursor(&self) -> ReadCursor {
        self.cursor
    }

    /// Skip history that predates the session.
    ///
    /// Reads the log length from the snapshot surface, moves the page offset
    /// to the end of the log and seeds `last_index` from the final event.
    /// No-op when the gateway has no snapshot surface.
    pub async fn prime(&mut self) -> Result<(), TransportError> {
        if !self.snapshot_available {
            debug!("Snapshot surface unavailable; cursor stays at origin");
            return Ok(());
        }

        let head = self.transport.snapshot(0, 1).await?;
        if head.length == 0 {
            debug!("Event log is empty; cursor stays at origin");
            return Ok(());
        }

        let last = self.transport.snapshot(head.length - 1, 1).await?;
        for event in head.events.iter().chain(last.events.iter()) {
            self.cursor.observe(event);
        }
        self.cursor.seek_offset(head.length);

        info!("Primed read cursor: {}", self.cursor);
        Ok(())
    }

    /// Wait for the terminal response to `correlation_id`.
    ///
    /// Returns `Ok(None)` when the tail stream closes cleanly without a
    /// match; calling again with the same id resumes from the updated
    /// cursor.
    pub async fn await_response(
        &mut self,
        correlation_id: &CorrelationId,
    ) -> Result<Option<ResponseOutcome>, DeliveryError> {
        let Some(source) = self.source.as_ref() else {
            return Err(DeliveryError::NoReadSurface);
        };

        debug!("Awaiting response for {} from {}", correlation_id, self.cursor);

        let result = {
            let mut events = source.consume(&mut self.cursor);
            let mut found = Ok(None);
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        if let Some(outcome) = match_response(&event, correlation_id) {
                            debug!("Matched {} at index {:?}", correlation_id, event.index);
                            found = Ok(Some(outcome));
                            break;
                        }
                    }
                    Err(e) => {
                        found = Err(e);
                        break;
                    }
                }
            }
            found
        };

        self.log_result(correlation_id, &result);
        result
    }

    fn log_result(
        &self,
        correlation_id: &CorrelationId,
        result: &Result<Option<ResponseOutcome>, DeliveryError>,
    ) {
        let event = match result {
            Ok(Some(outcome)) => ConversationEvent::new(
                "response_delivered",
                serde_json::json!({
                    "correlation_id": correlation_id.as_str(),
                    "text": outcome.text(),
                    "failure": outcome.is_failure(),
                    "last_index": self.cursor.last_index(),
                }),
            ),
            Ok(None) => ConversationEvent::new(
                "response_missing",
                serde_json::json!({
                    "correlation_id": correlation_id.as_str(),
                    "last_index": self.cursor.last_index(),
                }),
            ),
            Err(e) => ConversationEvent::new(
                "delivery_failed",
                serde_json::json!({
                    "correlation_id": correlation_id.as_str(),
                    "error": e.to_string(),
                }),
            ),
        };
        self.conversation_logger.log(event);
    }
}
