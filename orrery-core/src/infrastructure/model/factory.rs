//! Model registry - open dispatch from provider tag to builder

use super::traits::{ModelBuilder, ModelHandle};
use crate::config::{ConfigError, ModelConfig, ProviderId, RuntimeConfig};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolve the API key for a provider.
///
/// Order: explicit config value, then the provider's well-known environment
/// variable (`OPENAI_API_KEY`, ...). Absence is not an error here; it
/// surfaces as an authentication failure on the first call.
pub fn resolve_api_key(provider: &ProviderId, explicit: Option<&str>) -> Option<String> {
    if let Some(key) = explicit.map(str::trim).filter(|key| !key.is_empty()) {
        return Some(key.to_string());
    }

    let env_var = provider.api_key_env_var();
    match env::var(&env_var) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => {
            debug!(
                provider = provider.as_str(),
                env_var = env_var.as_str(),
                "No API key configured for provider"
            );
            None
        }
    }
}

/// Strategy map from provider tag to [`ModelBuilder`].
///
/// New providers are added with [`ModelRegistry::register`]; existing
/// builders are never touched. Unregistered tags fail with
/// [`ConfigError::UnknownProvider`].
#[derive(Clone, Default)]
pub struct ModelRegistry {
    builders: HashMap<ProviderId, Arc<dyn ModelBuilder>>,
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("providers", &self.providers())
            .finish()
    }
}

impl ModelRegistry {
    /// Empty registry; every provider must be registered explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the bundled HTTP providers.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "http-providers")]
        {
            use super::clients::{AnthropicClient, GeminiClient, OllamaClient, OpenAIClient};

            registry.register(ProviderId::OPENAI, OpenAIClient::build_handle);
            registry.register(ProviderId::ANTHROPIC, AnthropicClient::build_handle);
            registry.register(ProviderId::GEMINI, GeminiClient::build_handle);
            registry.register("google", GeminiClient::build_handle);
            registry.register(ProviderId::OLLAMA, OllamaClient::build_handle);
        }

        registry
    }

    /// Add a builder for `provider`, returning the one it replaces, if any.
    pub fn register<B>(
        &mut self,
        provider: impl Into<ProviderId>,
        builder: B,
    ) -> Option<Arc<dyn ModelBuilder>>
    where
        B: ModelBuilder + 'static,
    {
        let provider = provider.into();
        debug!(provider = provider.as_str(), "Registering model builder");
        self.builders.insert(provider, Arc::new(builder))
    }

    pub fn contains(&self, provider: &ProviderId) -> bool {
        self.builders.contains_key(provider)
    }

    /// Registered provider tags, sorted.
    pub fn providers(&self) -> Vec<&str> {
        let mut providers: Vec<&str> = self.builders.keys().map(ProviderId::as_str).collect();
        providers.sort_unstable();
        providers
    }

    /// Fail fast when a configured model names a provider nothing is registered for.
    ///
    /// The loader cannot know the registry, so hosts run this once after loading.
    pub fn validate_config(&self, config: &RuntimeConfig) -> Result<(), ConfigError> {
        for (key, model) in &config.models {
            if !self.contains(&model.provider) {
                warn!(
                    model = key.as_str(),
                    provider = model.provider.as_str(),
                    "Configured model uses an unregistered provider"
                );
                return Err(ConfigError::unknown_provider(model.provider.as_str()));
            }
        }
        Ok(())
    }

    /// Build a model handle for `config.provider`.
    pub fn build(&self, config: &ModelConfig) -> Result<Arc<dyn ModelHandle>, ConfigError> {
        config.validate()?;

        let builder = self
            .builders
            .get(&config.provider)
            .ok_or_else(|| ConfigError::unknown_provider(config.provider.as_str()))?;

        let handle = builder.build(config)?;
        info!(
            provider = config.provider.as_str(),
            model = config.model.as_str(),
            "Model handle built"
        );
        Ok(handle)
    }
}
