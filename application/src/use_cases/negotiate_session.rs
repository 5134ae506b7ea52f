//! Negotiate session use case
//!
//! Fetches the gateway's capability descriptor once at startup and resolves
//! the model every turn of the session will request.
//!
//! The descriptor is immutable for the rest of the session: read surface
//! selection and model defaults are derived from it exactly once.

use crate::ports::gateway_transport::{GatewayTransport, TransportError};
use dbl_chat_domain::{Capabilities, DomainError, ModelSelection};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that prevent a session from starting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionStartError {
    /// The capability descriptor could not be fetched or decoded.
    #[error("Gateway unreachable: {0}")]
    UnreachableGateway(TransportError),

    /// No explicit model was given and the gateway advertises none.
    #[error("No model available: pass --model-id or configure one")]
    NoModelAvailable,
}

impl From<DomainError> for SessionStartError {
    fn from(_: DomainError) -> Self {
        SessionStartError::NoModelAvailable
    }
}

/// Operator overrides applied on top of the advertised catalog.
#[derive(Debug, Clone, Default)]
pub struct NegotiateSessionInput {
    pub model_id: Option<String>,
    pub provider: Option<String>,
}

impl NegotiateSessionInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model_id(mut self, model_id: Option<String>) -> Self {
        self.model_id = model_id;
        self
    }

    pub fn with_provider(mut self, provider: Option<String>) -> Self {
        self.provider = provider;
        self
    }
}

/// Result of a successful negotiation.
#[derive(Debug, Clone)]
pub struct NegotiatedSession {
    pub capabilities: Capabilities,
    pub model: ModelSelection,
}

/// Use case for session start-up.
pub struct NegotiateSessionUseCase {
    transport: Arc<dyn GatewayTransport>,
}

impl NegotiateSessionUseCase {
    pub fn new(transport: Arc<dyn GatewayTransport>) -> Self {
        Self { transport }
    }

    pub async fn execute(
        &self,
        input: NegotiateSessionInput,
    ) -> Result<NegotiatedSession, SessionStartError> {
        let capabilities = self
            .transport
            .capabilities()
            .await
            .map_err(SessionStartError::UnreachableGateway)?;

        debug!(
            "Gateway capabilities: interface_version={} providers={} surfaces={:?}",
            capabilities.interface_version,
            capabilities.providers.len(),
            capabilities.enabled_surfaces()
        );

        let model = ModelSelection::resolve(
            &capabilities,
            input.model_id.as_deref(),
            input.provider.as_deref(),
        )?;

        info!("Session model: {}", model);

        Ok(NegotiatedSession {
            capabilities,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use dbl_chat_domain::{ModelDescriptor, ProviderDescriptor, Surface};

    fn catalog() -> Capabilities {
        Capabilities::default()
            .with_surface(Surface::Tail, true)
            .with_provider(ProviderDescriptor::new(
                "openai",
                vec![ModelDescriptor::new("gpt-4.1")],
            ))
    }

    fn use_case(transport: ScriptedTransport) -> NegotiateSessionUseCase {
        NegotiateSessionUseCase::new(Arc::new(transport))
    }

    #[tokio::test]
    async fn test_default_model_from_catalog() {
        let session = use_case(ScriptedTransport::new().with_capabilities(Ok(catalog())))
            .execute(NegotiateSessionInput::new())
            .await
            .unwrap();

        assert_eq!(session.model.model_id, "gpt-4.1");
        assert_eq!(session.model.provider.as_deref(), Some("openai"));
        assert!(session.capabilities.supports(Surface::Tail));
    }

    #[tokio::test]
    async fn test_explicit_model_keeps_only_explicit_provider() {
        let session = use_case(ScriptedTransport::new().with_capabilities(Ok(catalog())))
            .execute(NegotiateSessionInput::new().with_model_id(Some("local-llm".to_string())))
            .await
            .unwrap();

        assert_eq!(session.model.model_id, "local-llm");
        assert_eq!(session.model.provider, None);
    }

    #[tokio::test]
    async fn test_empty_catalog_without_override_fails() {
        let err = use_case(ScriptedTransport::new().with_capabilities(Ok(Capabilities::default())))
            .execute(NegotiateSessionInput::new())
            .await
            .unwrap_err();

        assert_eq!(err, SessionStartError::NoModelAvailable);
    }

    #[tokio::test]
    async fn test_empty_catalog_with_override_succeeds() {
        let session = use_case(ScriptedTransport::new().with_capabilities(Ok(Capabilities::default())))
            .execute(
                NegotiateSessionInput::new()
                    .with_model_id(Some("m".to_string()))
                    .with_provider(Some("p".to_string())),
            )
            .await
            .unwrap();

        assert_eq!(session.model.to_string(), "m (p)");
    }

    #[tokio::test]
    async fn test_unreachable_gateway() {
        let err = use_case(
            ScriptedTransport::new()
                .with_capabilities(Err(TransportError::Connection("refused".to_string()))),
        )
        .execute(NegotiateSessionInput::new())
        .await
        .unwrap_err();

        assert!(matches!(err, SessionStartError::UnreachableGateway(_)));
    }
}
