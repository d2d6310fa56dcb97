use super::models::EMPTY_PROMPT_MESSAGE;
use crate::config::ConfigError;
use crate::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("cannot process empty prompt")]
    EmptyPrompt,
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("agent made {limit} model round trips without a final answer")]
    RoundTripLimit { limit: usize },
}

impl AgentError {
    pub fn user_message(&self) -> String {
        match self {
            AgentError::EmptyPrompt => EMPTY_PROMPT_MESSAGE.to_string(),
            AgentError::Configuration(err) => err.user_message(),
            AgentError::Model(err) => err.user_message(),
            AgentError::RoundTripLimit { limit } => format!(
                "Error: the model kept calling tools for {limit} round trips without answering."
            ),
        }
    }
}
