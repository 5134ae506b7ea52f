//! Application layer for dbl-chat
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::DeliveryParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    gateway_transport::{EventStream, GatewayTransport, SnapshotPage, TransportError},
};
pub use use_cases::await_response::{DeliveryError, ResponseDeliveryEngine};
pub use use_cases::negotiate_session::{
    NegotiateSessionInput, NegotiateSessionUseCase, NegotiatedSession, SessionStartError,
};
pub use use_cases::submit_turn::{SubmitError, SubmittedTurn, TurnSequencer};
