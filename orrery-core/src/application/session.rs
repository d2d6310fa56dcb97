//! Host-owned entry point tying configuration, model builders, the tool
//! catalog and the agent cache together.

use crate::agent::{Agent, AgentBuilder, AgentError, ChatOutcome};
use crate::application::context::load_context_files;
use crate::cache::{AgentCache, SharedAgent};
use crate::config::{AgentConfig, ConfigError, RuntimeConfig};
use crate::model::ModelRegistry;
use crate::tooling::{ToolRegistration, filter_tools};
use std::any::Any;
use std::fmt;
use std::future;
use std::sync::Arc;
use tracing::{debug, info};

/// Serves `chat(agent_id, prompt)` for every agent declared in a
/// [`RuntimeConfig`].
///
/// Agents are built on first use and cached. Each chat re-reads the agent's
/// context files and reseeds its memory when they changed.
pub struct AgentSession {
    config: RuntimeConfig,
    registry: ModelRegistry,
    catalog: Vec<ToolRegistration>,
    cache: AgentCache,
    capabilities: Option<Arc<dyn Any + Send + Sync>>,
}

impl fmt::Debug for AgentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentSession")
            .field("agents", &self.config.agents.len())
            .field("providers", &self.registry.providers())
            .field("catalog", &self.catalog.len())
            .finish()
    }
}

impl AgentSession {
    pub fn new(
        config: RuntimeConfig,
        registry: ModelRegistry,
        catalog: Vec<ToolRegistration>,
    ) -> Self {
        Self {
            config,
            registry,
            catalog,
            cache: AgentCache::new(),
            capabilities: None,
        }
    }

    /// Host capabilities forwarded to every tool call of every agent.
    pub fn with_capabilities(mut self, capabilities: Arc<dyn Any + Send + Sync>) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn cache(&self) -> &AgentCache {
        &self.cache
    }

    /// The cached agent for `agent_id`, built from configuration if needed.
    pub async fn agent(&self, agent_id: &str) -> Result<SharedAgent, AgentError> {
        let agent_config = self.config.agent(agent_id)?;
        let context = load_context_files(&agent_config.context_files).await;
        self.get_or_build(agent_config, context).await
    }

    /// Send `prompt` to `agent_id`.
    ///
    /// Configuration problems (unknown agent, unknown provider) are returned
    /// as `Err`; everything that happens during the chat itself is reported
    /// in the [`ChatOutcome`].
    pub async fn chat(&self, agent_id: &str, prompt: &str) -> Result<ChatOutcome, AgentError> {
        if prompt.trim().is_empty() {
            return Ok(ChatOutcome::failure(AgentError::EmptyPrompt.user_message()));
        }

        let agent_config = self.config.agent(agent_id)?;
        let context = load_context_files(&agent_config.context_files).await;
        let agent = self.get_or_build(agent_config, context.clone()).await?;

        let mut agent = agent.lock().await;
        if agent.update_context(context) {
            info!(agent = agent_id, "Context files changed; memory reseeded");
        }
        Ok(agent.chat(prompt).await)
    }

    /// Evict `agent_id` so the next chat rebuilds it from configuration.
    pub async fn invalidate(&self, agent_id: &str) -> bool {
        self.cache.invalidate(agent_id).await
    }

    async fn get_or_build(
        &self,
        agent_config: &AgentConfig,
        context: Vec<String>,
    ) -> Result<SharedAgent, AgentError> {
        let agent = self
            .cache
            .get_or_create(&agent_config.id, || {
                future::ready(self.build_agent(agent_config, context))
            })
            .await?;
        Ok(agent)
    }

    fn build_agent(&self, agent_config: &AgentConfig, context: Vec<String>) -> Result<Agent, ConfigError> {
        let model_config = self.config.agent_model(agent_config)?;
        let model = self.registry.build(&model_config)?;
        let tools = filter_tools(
            &self.catalog,
            &agent_config.enable_tools,
            &agent_config.disable_tools,
        );
        debug!(
            agent = agent_config.id.as_str(),
            provider = model_config.provider.as_str(),
            model = model_config.model.as_str(),
            tools = tools.len(),
            "Assembling agent from configuration"
        );

        let mut builder = AgentBuilder::new()
            .id(&agent_config.id)
            .model(model)
            .system_prompt(agent_config.system_prompt.clone().unwrap_or_default())
            .tools(tools)
            .context(context);
        if let Some(size) = agent_config.memory_size {
            builder = builder.memory_size(size);
        }
        if let Some(limit) = agent_config.max_round_trips {
            builder = builder.max_round_trips(limit);
        }
        if let Some(capabilities) = &self.capabilities {
            builder = builder.capabilities(Arc::clone(capabilities));
        }
        builder.build()
    }
}
