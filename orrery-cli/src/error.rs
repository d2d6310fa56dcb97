use orrery_core::ConfigError;
use orrery_core::agent::AgentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("no agents are declared in the configuration")]
    NoAgents,
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn user_message(&self) -> String {
        match self {
            CliError::Config(err) => err.user_message(),
            CliError::Agent(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
