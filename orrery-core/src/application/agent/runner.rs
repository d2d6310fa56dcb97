use super::errors::AgentError;
use super::models::{AgentReply, ChatOutcome};
use crate::application::memory::Memory;
use crate::application::tooling::{
    ARGUMENT_ERROR_PREFIX, BridgedTool, ToolCallContext, ToolRegistration, to_callable,
};
use crate::model::{ModelHandle, ModelRequest, TokenUsage, ToolSpec};
use crate::types::{ChatMessage, ContentPart, ToolCall};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A model handle, system prompt, tool set and memory answering `chat` calls.
///
/// `chat` takes `&mut self`, so one agent serves one conversation at a time.
/// Share it behind a mutex (see [`crate::cache::AgentCache`]) to serialise callers.
#[derive(Clone)]
pub struct Agent {
    pub(super) id: String,
    pub(super) system_prompt: String,
    pub(super) model: Arc<dyn ModelHandle>,
    pub(super) registrations: Vec<ToolRegistration>,
    pub(super) tools: Vec<BridgedTool>,
    pub(super) memory: Option<Memory>,
    pub(super) context: Vec<String>,
    pub(super) max_round_trips: usize,
    pub(super) capabilities: Option<Arc<dyn Any + Send + Sync>>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("provider", &self.model.provider())
            .field("model", &self.model.model())
            .field("tools", &self.tool_names())
            .field("memory_turns", &self.memory.as_ref().map(Memory::len))
            .field("max_round_trips", &self.max_round_trips)
            .finish()
    }
}

impl Agent {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn model(&self) -> &Arc<dyn ModelHandle> {
        &self.model
    }

    pub fn tools(&self) -> &[ToolRegistration] {
        &self.registrations
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(BridgedTool::name).collect()
    }

    /// `None` for a stateless agent.
    pub fn memory(&self) -> Option<&Memory> {
        self.memory.as_ref()
    }

    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn max_round_trips(&self) -> usize {
        self.max_round_trips
    }

    /// A copy of this agent with `tools` appended. Prompt, memory and
    /// existing tools are kept.
    pub fn add_tools(&self, tools: impl IntoIterator<Item = ToolRegistration>) -> Agent {
        let mut agent = self.clone();
        for tool in tools {
            if agent.tools.iter().any(|t| t.name() == tool.name) {
                warn!(
                    agent = self.id.as_str(),
                    tool = tool.name.as_str(),
                    "Tool name already registered; the earlier registration handles calls"
                );
            }
            agent.tools.push(to_callable(&tool));
            agent.registrations.push(tool);
        }
        agent
    }

    /// Replace the context snapshot, reseeding memory, if `context` differs
    /// from the current one. Returns whether anything changed.
    pub fn update_context(&mut self, context: Vec<String>) -> bool {
        if context == self.context {
            return false;
        }
        debug!(agent = self.id.as_str(), entries = context.len(), "Agent context changed");
        if let Some(memory) = self.memory.as_mut() {
            memory.reseed(&context);
        }
        self.context = context;
        true
    }

    /// Chat entrypoint: never fails, errors are reported in the outcome.
    pub async fn chat(&mut self, prompt: &str) -> ChatOutcome {
        match self.run(prompt).await {
            Ok(reply) => ChatOutcome::success(reply.text),
            Err(err) => {
                if !matches!(err, AgentError::EmptyPrompt) {
                    warn!(agent = self.id.as_str(), error = %err, "Chat failed");
                }
                ChatOutcome::failure(err.user_message())
            }
        }
    }

    /// Run one exchange, including any tool-call round trips.
    ///
    /// New turns reach memory only when the exchange completes; a failed run
    /// leaves memory as it was after the capacity check.
    pub async fn run(&mut self, prompt: &str) -> Result<AgentReply, AgentError> {
        if prompt.trim().is_empty() {
            return Err(AgentError::EmptyPrompt);
        }

        let history: Vec<ChatMessage> = match self.memory.as_mut() {
            Some(memory) => {
                memory.reset_if_near_capacity(&self.context);
                memory.turns().to_vec()
            }
            None if self.context.is_empty() => Vec::new(),
            None => vec![ChatMessage::user_parts(
                self.context.iter().map(ContentPart::text).collect(),
            )],
        };

        let specs: Vec<ToolSpec> = self.tools.iter().map(|t| t.spec().clone()).collect();
        let mut pending = vec![ChatMessage::user(prompt)];
        let mut usage = TokenUsage::default();
        let mut round_trips = 0;
        let mut tool_calls = 0;

        info!(
            agent = self.id.as_str(),
            provider = self.model.provider(),
            model = self.model.model(),
            history = history.len(),
            tools = specs.len(),
            "Agent chat started"
        );

        loop {
            round_trips += 1;
            let messages = history.iter().chain(pending.iter()).cloned().collect();
            let request = ModelRequest::new(messages)
                .with_system_prompt(self.system_prompt.clone())
                .with_tools(specs.clone());

            let response = self.model.chat(request).await?;
            if let Some(step) = response.usage {
                usage.input_tokens += step.input_tokens;
                usage.output_tokens += step.output_tokens;
            }
            let message = response.message;

            if !message.has_tool_calls() {
                let text = message.content();
                pending.push(message);
                if let Some(memory) = self.memory.as_mut() {
                    memory.extend(pending);
                }
                info!(
                    agent = self.id.as_str(),
                    round_trips,
                    tool_calls,
                    "Agent returned final response"
                );
                return Ok(AgentReply {
                    text,
                    round_trips,
                    tool_calls,
                    usage,
                });
            }

            if round_trips >= self.max_round_trips {
                warn!(
                    agent = self.id.as_str(),
                    limit = self.max_round_trips,
                    "Agent exceeded max model round trips"
                );
                return Err(AgentError::RoundTripLimit {
                    limit: self.max_round_trips,
                });
            }

            let calls = message.tool_calls.clone();
            pending.push(message);
            for call in &calls {
                tool_calls += 1;
                let output = self.dispatch(call).await;
                pending.push(ChatMessage::tool_result(call, output));
            }
        }
    }

    async fn dispatch(&self, call: &ToolCall) -> String {
        let Some(tool) = self.tools.iter().find(|t| t.name() == call.name) else {
            warn!(agent = self.id.as_str(), tool = call.name.as_str(), "Model requested an unknown tool");
            return format!(
                "{ARGUMENT_ERROR_PREFIX} unknown tool '{}'. Available tools: {}",
                call.name,
                self.tool_names().join(", ")
            );
        };

        info!(agent = self.id.as_str(), tool = call.name.as_str(), "Agent requested tool execution");
        let mut ctx = ToolCallContext::new(&call.id, &call.name).with_agent(&self.id);
        if let Some(capabilities) = &self.capabilities {
            ctx = ctx.with_capabilities(Arc::clone(capabilities));
        }
        tool.execute(&call.arguments, ctx).await
    }
}
