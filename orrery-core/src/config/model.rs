//! # Model Configuration
//!
//! A [`ModelConfig`] describes one callable model: which provider serves it,
//! the common sampling parameters every provider understands, and a small set
//! of provider-specific extras that only the matching builder reads.
//!
//! | Field group | Applies to |
//! |-------------|------------|
//! | `api_key`, `base_url`, `temperature`, `top_p`, `stop`, `max_tokens`, `max_retries`, `timeout_secs`, `log_*` | every provider |
//! | `thinking` | providers with a reasoning mode (anthropic, gemini, openai, ollama) |
//! | `extras.organization`, `extras.service_tier` | openai |
//! | `extras.anthropic_version` | anthropic |
//! | `extras.api_path` | openai, gemini |

use super::error::ConfigError;
use super::provider::ProviderId;
use crate::constants::DEFAULT_MAX_RETRIES;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reasoning effort level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingEffort {
    Low,
    Medium,
    High,
}

impl ThinkingEffort {
    /// Fixed token budget for this level, identical for every provider.
    pub fn budget_tokens(self) -> u32 {
        match self {
            ThinkingEffort::Low => 1024,
            ThinkingEffort::Medium => 4096,
            ThinkingEffort::High => 8192,
        }
    }

    /// Closest level for providers that only accept an effort name.
    pub fn from_budget(budget: u32) -> Self {
        if budget <= 1024 {
            ThinkingEffort::Low
        } else if budget <= 4096 {
            ThinkingEffort::Medium
        } else {
            ThinkingEffort::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThinkingEffort::Low => "low",
            ThinkingEffort::Medium => "medium",
            ThinkingEffort::High => "high",
        }
    }
}

/// Reasoning ("thinking") policy. An explicit budget always wins over the effort level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThinkingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<ThinkingEffort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_tokens: Option<u32>,
}

impl ThinkingConfig {
    pub fn with_effort(effort: ThinkingEffort) -> Self {
        Self {
            effort: Some(effort),
            budget_tokens: None,
        }
    }

    pub fn with_budget(budget_tokens: u32) -> Self {
        Self {
            effort: None,
            budget_tokens: Some(budget_tokens),
        }
    }

    /// Token budget sent to budget-based providers. Defaults to the medium level.
    pub fn budget(&self) -> u32 {
        self.budget_tokens
            .or_else(|| self.effort.map(ThinkingEffort::budget_tokens))
            .unwrap_or_else(|| ThinkingEffort::Medium.budget_tokens())
    }

    /// Effort name sent to effort-based providers.
    pub fn effort(&self) -> ThinkingEffort {
        match (self.effort, self.budget_tokens) {
            (Some(effort), _) => effort,
            (None, Some(budget)) => ThinkingEffort::from_budget(budget),
            (None, None) => ThinkingEffort::Medium,
        }
    }
}

/// Settings that only one provider understands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderExtras {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,
}

/// Fully resolved configuration for one model handle.
///
/// Resolved once per construction and never mutated by the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub provider: ProviderId,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,
    #[serde(default)]
    pub log_requests: bool,
    #[serde(default)]
    pub log_responses: bool,
    #[serde(flatten)]
    pub extras: ProviderExtras,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl ModelConfig {
    pub fn new(provider: impl Into<ProviderId>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            api_key: None,
            base_url: None,
            temperature: None,
            top_p: None,
            stop: Vec::new(),
            max_tokens: None,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: None,
            thinking: None,
            log_requests: false,
            log_responses: false,
            extras: ProviderExtras::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn with_thinking(mut self, thinking: ThinkingConfig) -> Self {
        self.thinking = Some(thinking);
        self
    }

    pub fn with_extras(mut self, extras: ProviderExtras) -> Self {
        self.extras = extras;
        self
    }

    /// `"provider/model"` key this config is addressed by.
    pub fn key(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Check the fields every builder depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.as_str().is_empty() {
            return Err(ConfigError::missing_field("model config", "provider"));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::missing_field(
                format!("model config for provider '{}'", self.provider),
                "model",
            ));
        }
        Ok(())
    }

    /// Apply per-call overrides on top of this named default. Overrides win on collision.
    pub fn merged(&self, overrides: &ModelOverride) -> ModelConfig {
        let mut merged = self.clone();
        if let Some(model) = &overrides.model {
            merged.model = model.clone();
        }
        if let Some(api_key) = &overrides.api_key {
            merged.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &overrides.base_url {
            merged.base_url = Some(base_url.clone());
        }
        if let Some(temperature) = overrides.temperature {
            merged.temperature = Some(temperature);
        }
        if let Some(top_p) = overrides.top_p {
            merged.top_p = Some(top_p);
        }
        if let Some(stop) = &overrides.stop {
            merged.stop = stop.clone();
        }
        if let Some(max_tokens) = overrides.max_tokens {
            merged.max_tokens = Some(max_tokens);
        }
        if let Some(max_retries) = overrides.max_retries {
            merged.max_retries = max_retries;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            merged.timeout_secs = Some(timeout_secs);
        }
        if let Some(thinking) = overrides.thinking {
            merged.thinking = Some(thinking);
        }
        if let Some(log_requests) = overrides.log_requests {
            merged.log_requests = log_requests;
        }
        if let Some(log_responses) = overrides.log_responses {
            merged.log_responses = log_responses;
        }
        let extras = &overrides.extras;
        if extras.organization.is_some() {
            merged.extras.organization = extras.organization.clone();
        }
        if extras.service_tier.is_some() {
            merged.extras.service_tier = extras.service_tier.clone();
        }
        if extras.anthropic_version.is_some() {
            merged.extras.anthropic_version = extras.anthropic_version.clone();
        }
        if extras.api_path.is_some() {
            merged.extras.api_path = extras.api_path.clone();
        }
        merged
    }
}

/// Partial model settings layered over a named [`ModelConfig`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_requests: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_responses: Option<bool>,
    #[serde(flatten)]
    pub extras: ProviderExtras,
}
