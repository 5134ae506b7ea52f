//! Turn Sequencer
//!
//! Assigns identity to each submitted message and posts the chat intent.
//!
//! Every call to [`TurnSequencer::submit`] mints a new turn linked to the
//! previous one and a fresh correlation id. The turn becomes the chain's
//! tail before the post, so a rejected submission still parents the next
//! turn. Rejections are never retried: the gateway may have partially
//! processed the intent.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::gateway_transport::{GatewayTransport, TransportError};
use dbl_chat_domain::{ChatProfile, CorrelationId, IntentEnvelope, ThreadId, TurnChain, TurnId};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Submission rejected: {0}")]
    SubmissionRejected(TransportError),
}

/// A turn the gateway accepted.
#[derive(Debug, Clone)]
pub struct SubmittedTurn {
    pub correlation_id: CorrelationId,
    pub turn_id: TurnId,
    /// Acknowledgement object returned by the gateway.
    pub ack: Value,
}

pub struct TurnSequencer {
    transport: Arc<dyn GatewayTransport>,
    profile: ChatProfile,
    chain: TurnChain,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl TurnSequencer {
    /// Start a new thread for `profile`.
    pub fn new(transport: Arc<dyn GatewayTransport>, profile: ChatProfile) -> Self {
        Self {
            transport,
            profile,
            chain: TurnChain::new(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn thread_id(&self) -> &ThreadId {
        self.chain.thread_id()
    }

    pub fn last_turn_id(&self) -> Option<&TurnId> {
        self.chain.last_turn_id()
    }

    pub fn turn_count(&self) -> usize {
        self.chain.len()
    }

    pub fn profile(&self) -> &ChatProfile {
        &self.profile
    }

    /// Post `message` as the next turn of the thread.
    pub async fn submit(&mut self, message: &str) -> Result<SubmittedTurn, SubmitError> {
        let turn = self.chain.append(message);
        let correlation_id = CorrelationId::generate();
        let envelope =
            IntentEnvelope::chat(&self.profile, self.chain.thread_id(), &turn, correlation_id.clone());

        debug!(
            "Submitting turn {} (parent {:?}) as {}",
            turn.turn_id, turn.parent_turn_id, correlation_id
        );

        self.conversation_logger.log(ConversationEvent::new(
            "intent_submitted",
            serde_json::json!({
                "thread_id": self.chain.thread_id().as_str(),
                "turn_id": turn.turn_id.as_str(),
                "parent_turn_id": turn.parent_turn_id.as_ref().map(|id| id.as_str()),
                "correlation_id": correlation_id.as_str(),
                "model_id": self.profile.model.model_id,
                "message": turn.message,
            }),
        ));

        let ack = self
            .transport
            .post_intent(&envelope)
            .await
            .map_err(SubmitError::SubmissionRejected)?;

        info!("Turn {} accepted as {}", turn.turn_id, correlation_id);

        Ok(SubmittedTurn {
            correlation_id,
            turn_id: turn.turn_id,
            ack,
        })
    }
}
