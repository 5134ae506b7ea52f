//! Domain layer for dbl-chat
//!
//! This crate contains the core types of the chat client with no I/O:
//!
//! - **Capabilities**: what the gateway advertises (read surfaces, provider
//!   and model catalog) and the model selection policy.
//! - **Conversation**: thread / turn / correlation identities, turn lineage
//!   and the intent envelope.
//! - **Delivery**: gateway events, the monotonic read cursor, response
//!   matching and poll backoff.

pub mod capability;
pub mod conversation;
pub mod core;
pub mod delivery;

// Re-export commonly used types
pub use capability::{
    entities::{Capabilities, ModelDescriptor, ProviderDescriptor},
    selection::ModelSelection,
    surface::Surface,
};
pub use conversation::{
    intent::{IntentEnvelope, IntentInputs, IntentPayload, MessageBody},
    profile::ChatProfile,
    turn::{Turn, TurnChain},
    value_objects::{CorrelationId, ThreadId, TurnId},
};
pub use core::error::DomainError;
pub use delivery::{
    backoff::{BackoffStep, PollBackoff, PollPolicy},
    cursor::ReadCursor,
    event::{Event, EventKind},
    mode::DeliveryMode,
    outcome::{ResponseOutcome, match_response},
};
