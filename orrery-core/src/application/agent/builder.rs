use super::runner::Agent;
use crate::application::memory::Memory;
use crate::application::tooling::{ToolRegistration, to_callable};
use crate::config::ConfigError;
use crate::constants::DEFAULT_MAX_ROUND_TRIPS;
use crate::model::ModelHandle;
use std::any::Any;
use std::sync::Arc;

/// Assembles an [`Agent`]. A model handle and a non-blank system prompt are
/// mandatory; everything else is optional.
#[derive(Default)]
pub struct AgentBuilder {
    id: Option<String>,
    model: Option<Arc<dyn ModelHandle>>,
    system_prompt: Option<String>,
    tools: Vec<ToolRegistration>,
    memory_size: Option<usize>,
    context: Vec<String>,
    max_round_trips: Option<usize>,
    capabilities: Option<Arc<dyn Any + Send + Sync>>,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn model(mut self, model: Arc<dyn ModelHandle>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn tool(mut self, tool: ToolRegistration) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: impl IntoIterator<Item = ToolRegistration>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Turn capacity. Without it the agent keeps no history between chats.
    pub fn memory_size(mut self, size: usize) -> Self {
        self.memory_size = Some(size);
        self
    }

    /// Context strings seeded into memory.
    pub fn context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }

    pub fn max_round_trips(mut self, limit: usize) -> Self {
        self.max_round_trips = Some(limit);
        self
    }

    /// Host capabilities handed to every tool call.
    pub fn capabilities(mut self, capabilities: Arc<dyn Any + Send + Sync>) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn build(self) -> Result<Agent, ConfigError> {
        let id = self.id.unwrap_or_else(|| "agent".to_string());
        let scope = format!("agent '{id}'");

        let model = self
            .model
            .ok_or_else(|| ConfigError::missing_field(scope.clone(), "model"))?;
        let system_prompt = self
            .system_prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .ok_or_else(|| ConfigError::missing_field(scope, "system_prompt"))?;

        let memory = self
            .memory_size
            .map(|capacity| Memory::with_context(capacity, &self.context));

        let tools = self.tools.iter().map(to_callable).collect();
        Ok(Agent {
            id,
            system_prompt,
            model,
            registrations: self.tools,
            tools,
            memory,
            context: self.context,
            max_round_trips: self.max_round_trips.unwrap_or(DEFAULT_MAX_ROUND_TRIPS).max(1),
            capabilities: self.capabilities,
        })
    }
}
