//! Conversation identity and the intent envelope.
//!
//! A process owns exactly one [`ThreadId`](value_objects::ThreadId). Each submitted message becomes a
//! [`Turn`](turn::Turn) linked to its predecessor and carries a fresh [`CorrelationId`](value_objects::CorrelationId)
//! that is the only key used to find its response.

pub mod intent;
pub mod profile;
pub mod turn;
pub mod value_objects;
