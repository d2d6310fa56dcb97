use super::model::ModelOverride;
use super::tool::{ToolId, ToolSelection};
use serde::Deserialize;
use std::path::PathBuf;

/// Declarative description of one agent.
///
/// # Example
///
/// ```toml
/// [[agents]]
/// id = "reviewer"
/// model = "anthropic/claude-sonnet-4-5"
/// system_prompt = "You review pull requests."
/// memory_size = 100
/// enable_tools = ["read_file", "grep"]
/// disable_tools = []
/// context_files = ["README.md"]
///
/// [agents.model_overrides]
/// temperature = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    /// Model key; falls back to the top-level `default_model`.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub model_overrides: ModelOverride,
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Turn capacity of the agent's memory. `None` makes the agent stateless.
    #[serde(default)]
    pub memory_size: Option<usize>,
    #[serde(default)]
    pub enable_tools: ToolSelection,
    #[serde(default)]
    pub disable_tools: Vec<ToolId>,
    #[serde(default)]
    pub context_files: Vec<PathBuf>,
    #[serde(default)]
    pub max_round_trips: Option<usize>,
}

impl AgentConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: None,
            model_overrides: ModelOverride::default(),
            system_prompt: None,
            memory_size: None,
            enable_tools: ToolSelection::None,
            disable_tools: Vec::new(),
            context_files: Vec::new(),
            max_round_trips: None,
        }
    }
}
