//! Model selection policy.

use super::entities::Capabilities;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The model (and optionally provider) every turn of the session requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub model_id: String,
    pub provider: Option<String>,
}

impl ModelSelection {
    /// Resolve the session's model from operator overrides and capabilities.
    ///
    /// An explicit model wins. Without one, the first provider's first model
    /// is used, and its provider fills in only when no provider was given.
    /// Empty provider or model lists mean there is no usable default.
    pub fn resolve(
        capabilities: &Capabilities,
        model_override: Option<&str>,
        provider_override: Option<&str>,
    ) -> Result<Self, DomainError> {
        let explicit = model_override.map(str::trim).filter(|m| !m.is_empty());
        let provider = provider_override
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        if let Some(model_id) = explicit {
            return Ok(Self {
                model_id: model_id.to_string(),
                provider,
            });
        }

        let (model_id, default_provider) = capabilities
            .default_model()
            .ok_or(DomainError::NoModelAvailable)?;

        Ok(Self {
            model_id: model_id.to_string(),
            provider: provider.or_else(|| default_provider.map(str::to_string)),
        })
    }
}

impl std::fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.provider {
            Some(provider) => write!(f, "{} ({})", self.model_id, provider),
            None => write!(f, "{}", self.model_id),
        }
    }
}
