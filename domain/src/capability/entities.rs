//! Capability descriptor entities.

use super::surface::Surface;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A model the gateway can route a chat turn to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDescriptor {
    pub id: Option<String>,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

/// A provider and the models it exposes, in the gateway's preference order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderDescriptor {
    pub id: Option<String>,
    pub models: Vec<ModelDescriptor>,
}

impl ProviderDescriptor {
    pub fn new(id: impl Into<String>, models: Vec<ModelDescriptor>) -> Self {
        Self {
            id: Some(id.into()),
            models,
        }
    }
}

/// Capability descriptor returned by `GET /capabilities`.
///
/// Surfaces missing from the map are treated as unsupported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub interface_version: i64,
    pub providers: Vec<ProviderDescriptor>,
    pub surfaces: BTreeMap<String, bool>,
}

impl Capabilities {
    /// Whether the gateway advertises the given read surface.
    pub fn supports(&self, surface: Surface) -> bool {
        self.surfaces.get(surface.as_str()).copied().unwrap_or(false)
    }

    /// Builder used by tests and adapters to flag a surface.
    pub fn with_surface(mut self, surface: Surface, enabled: bool) -> Self {
        self.surfaces.insert(surface.as_str().to_string(), enabled);
        self
    }

    pub fn with_provider(mut self, provider: ProviderDescriptor) -> Self {
        self.providers.push(provider);
        self
    }

    /// The first provider's first model, if both exist.
    ///
    /// Returns `(model_id, provider_id)`.
    pub fn default_model(&self) -> Option<(&str, Option<&str>)> {
        let provider = self.providers.first()?;
        let model = provider.models.first()?;
        let model_id = model.id.as_deref()?;
        Some((model_id, provider.id.as_deref()))
    }

    /// Every advertised surface that is switched on, in name order.
    pub fn enabled_surfaces(&self) -> Vec<&str> {
        self.surfaces
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_descriptor() {
        let json = serde_json::json!({
            "interface_version": 2,
            "providers": [
                {"id": "openai", "models": [{"id": "gpt-4.1"}, {"id": "gpt-5"}]},
                {"id": "anthropic", "models": [{"id": "claude"}]}
            ],
            "surfaces": {"tail": true, "snapshot": false}
        });
        let caps: Capabilities = serde_json::from_value(json).unwrap();

        assert_eq!(caps.interface_version, 2);
        assert_eq!(caps.providers.len(), 2);
        assert!(caps.supports(Surface::Tail));
        assert!(!caps.supports(Surface::Snapshot));
        assert_eq!(caps.default_model(), Some(("gpt-4.1", Some("openai"))));
    }

    #[test]
    fn test_missing_fields_default() {
        let caps: Capabilities = serde_json::from_str("{}").unwrap();
        assert_eq!(caps.interface_version, 0);
        assert!(caps.providers.is_empty());
        assert!(!caps.supports(Surface::Tail));
        assert!(!caps.supports(Surface::Snapshot));
    }

    #[test]
    fn test_default_model_requires_models() {
        let caps = Capabilities::default().with_provider(ProviderDescriptor::new("empty", vec![]));
        assert_eq!(caps.default_model(), None);

        let caps = Capabilities::default().with_provider(ProviderDescriptor {
            id: Some("p".to_string()),
            models: vec![ModelDescriptor::default()],
        });
        assert_eq!(caps.default_model(), None);
    }

    #[test]
    fn test_enabled_surfaces() {
        let caps = Capabilities::default()
            .with_surface(Surface::Tail, false)
            .with_surface(Surface::Snapshot, true);
        assert_eq!(caps.enabled_surfaces(), vec!["snapshot"]);
    }
}
