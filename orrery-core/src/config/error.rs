use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration or constructing models and agents.
///
/// These are always fatal to the attempt that raised them; nothing is cached,
/// so the next call may retry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("model key '{key}' must have the form 'provider/model'")]
    InvalidModelKey { key: String },

    #[error("{scope} is missing required field '{field}'")]
    MissingField { scope: String, field: &'static str },

    #[error("no model builder registered for provider '{provider}'")]
    UnknownProvider { provider: String },

    #[error("model '{model}' is not configured")]
    UnknownModel { model: String },

    #[error("agent '{agent}' is not configured")]
    UnknownAgent { agent: String },

    #[error("agent '{agent}' is configured more than once")]
    DuplicateAgent { agent: String },

    #[error("failed to initialise HTTP client for provider '{provider}': {source}")]
    HttpClient {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ConfigError {
    pub fn missing_field(scope: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            scope: scope.into(),
            field,
        }
    }

    pub fn unknown_provider(provider: impl Into<String>) -> Self {
        Self::UnknownProvider {
            provider: provider.into(),
        }
    }

    /// Message suitable for showing to the person driving the host.
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::NotFound { path } => {
                format!("Configuration file {} does not exist.", path.display())
            }
            ConfigError::UnknownProvider { provider } => {
                format!("Provider '{provider}' is not supported. Check the model configuration.")
            }
            ConfigError::UnknownAgent { agent } => {
                format!("Agent '{agent}' is not defined in the configuration.")
            }
            other => other.to_string(),
        }
    }
}
