//! Provider factory registry.
//!
//! The `provider` section of the runtime config names a factory by its
//! `type`; the factory builds the provider from the rest of the section.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::{ProviderError, ResearchProvider};

/// Builds a research provider from configuration.
pub trait ProviderFactory: Send + Sync {
    /// Unique type name, e.g. "simulated".
    fn provider_type(&self) -> &'static str;

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn ResearchProvider>, ProviderError>;

    /// Check a config section without building anything.
    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError>;

    fn default_config(&self) -> JsonValue {
        serde_json::json!({ "type": self.provider_type() })
    }

    fn description(&self) -> &'static str {
        "Research provider"
    }
}

/// Factories keyed by type name.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any with the same type name.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories
            .insert(factory.provider_type().to_string(), factory);
    }

    /// Build the provider selected by `config["type"]`.
    pub fn create(&self, config: &JsonValue) -> Result<Arc<dyn ResearchProvider>, ProviderError> {
        let provider_type = config
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProviderError::InvalidConfig("missing provider type".to_string()))?;

        let factory = self.factories.get(provider_type).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "Unknown provider type: '{}'. Available: {:?}",
                provider_type,
                self.available_types()
            ))
        })?;

        factory.validate_config(config)?;
        let provider = factory.create(config)?;
        tracing::debug!(provider_type, provider = provider.name(), "Research provider created");
        Ok(provider)
    }

    pub fn available_types(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    pub fn has_provider(&self, provider_type: &str) -> bool {
        self.factories.contains_key(provider_type)
    }

    pub fn default_config(&self, provider_type: &str) -> Option<JsonValue> {
        self.factories
            .get(provider_type)
            .map(|f| f.default_config())
    }

    /// Registry with the simulated provider.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::SimulatedProviderFactory));
        registry
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_types())
            .finish()
    }
}
