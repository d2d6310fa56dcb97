use super::agent::AgentConfig;
use super::error::ConfigError;
use super::model::{ModelConfig, ModelOverride};
use std::collections::BTreeMap;
use std::path::Path;

/// Runtime configuration loaded from `orrery.toml`.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub default_model: Option<String>,
    /// Named model defaults keyed by `"provider/model"`.
    pub models: BTreeMap<String, ModelConfig>,
    pub agents: Vec<AgentConfig>,
}

impl RuntimeConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse configuration from TOML text already in memory.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, Path::new("<inline>"))
    }

    pub fn model(&self, key: &str) -> Result<&ModelConfig, ConfigError> {
        self.models
            .get(key)
            .ok_or_else(|| ConfigError::UnknownModel {
                model: key.to_string(),
            })
    }

    /// Resolve a model key (or the default model) and merge overrides over it.
    pub fn resolve_model(
        &self,
        key: Option<&str>,
        overrides: &ModelOverride,
    ) -> Result<ModelConfig, ConfigError> {
        let key = key
            .or(self.default_model.as_deref())
            .ok_or_else(|| ConfigError::missing_field("runtime config", "default_model"))?;
        Ok(self.model(key)?.merged(overrides))
    }

    pub fn agent(&self, id: &str) -> Result<&AgentConfig, ConfigError> {
        self.agents
            .iter()
            .find(|agent| agent.id == id)
            .ok_or_else(|| ConfigError::UnknownAgent {
                agent: id.to_string(),
            })
    }

    /// Model config an agent runs with, overrides applied.
    pub fn agent_model(&self, agent: &AgentConfig) -> Result<ModelConfig, ConfigError> {
        self.resolve_model(agent.model.as_deref(), &agent.model_overrides)
    }
}
