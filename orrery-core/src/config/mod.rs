pub mod agent;
pub mod app;
pub mod error;
pub mod loader;
pub mod model;
pub mod provider;
pub mod tool;

pub use crate::constants::CONFIG_PATH;

pub use agent::AgentConfig;
pub use app::RuntimeConfig;
pub use error::ConfigError;
pub use model::{ModelConfig, ModelOverride, ProviderExtras, ThinkingConfig, ThinkingEffort};
pub use provider::{ProviderId, parse_model_key};
pub use tool::{ToolId, ToolSelection};
