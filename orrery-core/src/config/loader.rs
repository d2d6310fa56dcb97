use super::CONFIG_PATH;
use super::agent::AgentConfig;
use super::error::ConfigError;
use super::model::{ModelConfig, ModelOverride};
use super::provider::{ProviderId, parse_model_key};
use crate::constants::ENV_PATH;
use dotenvy::from_filename;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::{debug, warn};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    pub default_model: Option<String>,
    #[serde(default)]
    pub models: BTreeMap<String, RawModelConfig>,
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
}

/// A `[models."provider/name"]` table. Provider and model default to the key.
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawModelConfig {
    pub provider: Option<ProviderId>,
    #[serde(flatten)]
    pub settings: ModelOverride,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration from a file path
pub fn load_config(path: Option<&Path>) -> Result<super::RuntimeConfig, ConfigError> {
    ensure_env_loaded();
    let config_path = path.unwrap_or_else(|| Path::new(CONFIG_PATH));
    read_config(config_path)
}

fn read_config(path: &Path) -> Result<super::RuntimeConfig, ConfigError> {
    debug!(path = %path.display(), "Reading runtime configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path)
}

pub(super) fn parse_config(
    content: &str,
    path: &Path,
) -> Result<super::RuntimeConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<super::RuntimeConfig, ConfigError> {
    let mut models = BTreeMap::new();
    for (key, raw) in parsed.models {
        let config = build_model(&key, raw)?;
        models.insert(key, config);
    }

    if let Some(default_model) = parsed.default_model.as_deref() {
        if !models.contains_key(default_model) {
            return Err(ConfigError::UnknownModel {
                model: default_model.to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for agent in &parsed.agents {
        if !seen.insert(agent.id.as_str()) {
            return Err(ConfigError::DuplicateAgent {
                agent: agent.id.clone(),
            });
        }
        let key = agent
            .model
            .as_deref()
            .or(parsed.default_model.as_deref())
            .ok_or_else(|| ConfigError::missing_field(format!("agent '{}'", agent.id), "model"))?;
        if !models.contains_key(key) {
            return Err(ConfigError::UnknownModel {
                model: key.to_string(),
            });
        }
    }

    debug!(
        models = models.len(),
        agents = parsed.agents.len(),
        "Runtime configuration validated"
    );

    Ok(super::RuntimeConfig {
        default_model: parsed.default_model,
        models,
        agents: parsed.agents,
    })
}

fn build_model(key: &str, raw: RawModelConfig) -> Result<ModelConfig, ConfigError> {
    let (provider, model) = match (raw.provider, raw.settings.model.clone()) {
        (Some(provider), Some(model)) => (provider, model),
        (provider, model) => {
            let (key_provider, key_model) = parse_model_key(key)?;
            (provider.unwrap_or(key_provider), model.unwrap_or(key_model))
        }
    };

    let mut settings = raw.settings;
    settings.api_key = settings
        .api_key
        .and_then(|spec| expand_api_key(&provider, &spec));

    let config = ModelConfig::new(provider, model).merged(&settings);
    config.validate()?;
    Ok(config)
}

/// Expand `${VAR}` references in an API key value.
///
/// An unset variable yields `None` so the provider's well-known variable is
/// consulted at build time instead.
fn expand_api_key(provider: &ProviderId, spec: &str) -> Option<String> {
    let raw = spec.trim();
    if raw.is_empty() {
        return None;
    }
    match shellexpand::env(raw) {
        Ok(value) => Some(value.into_owned()),
        Err(err) => {
            warn!(
                provider = provider.as_str(),
                env_var = %err.var_name,
                "API key environment variable is not set"
            );
            None
        }
    }
}
