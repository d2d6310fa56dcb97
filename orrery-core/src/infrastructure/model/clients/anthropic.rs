//! Anthropic Messages API client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::{ConfigError, ModelConfig};
use crate::constants::{
    DEFAULT_ANTHROPIC_ENDPOINT, DEFAULT_ANTHROPIC_MAX_TOKENS, DEFAULT_ANTHROPIC_VERSION,
};
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::ModelHandle;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse, TokenUsage};
use crate::types::{ChatMessage, ReasoningBlock, ToolCall};

/// Room left for the visible answer on top of the thinking budget.
const ANSWER_TOKEN_HEADROOM: u32 = 1024;

#[derive(Clone)]
pub struct AnthropicClient {
    base: HttpClientBase,
    config: ModelConfig,
}

impl AnthropicClient {
    pub fn from_config(config: &ModelConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base: HttpClientBase::from_config(config, DEFAULT_ANTHROPIC_ENDPOINT)?,
            config: config.clone(),
        })
    }

    pub fn build_handle(config: &ModelConfig) -> Result<Arc<dyn ModelHandle>, ConfigError> {
        Ok(Arc::new(Self::from_config(config)?))
    }

    fn payload(&self, request: &ModelRequest) -> AnthropicRequest {
        let config = &self.config;
        let (system, messages) =
            MessageAdapter::to_anthropic_format(request.system_prompt.as_deref(), &request.messages);

        let mut max_tokens = config.max_tokens.unwrap_or(DEFAULT_ANTHROPIC_MAX_TOKENS);
        let mut temperature = config.temperature;
        let mut top_p = config.top_p;
        let thinking = config.thinking.map(|thinking| {
            let budget = thinking.budget();
            // Extended thinking requires max_tokens above the budget and no sampling overrides.
            max_tokens = max_tokens.max(budget.saturating_add(ANSWER_TOKEN_HEADROOM));
            temperature = None;
            top_p = None;
            json!({"type": "enabled", "budget_tokens": budget})
        });

        AnthropicRequest {
            model: config.model.clone(),
            max_tokens,
            system,
            messages,
            tools: MessageAdapter::to_anthropic_tools(&request.tools),
            temperature,
            top_p,
            stop_sequences: config.stop.clone(),
            thinking,
        }
    }

    fn version(&self) -> String {
        self.config
            .extras
            .anthropic_version
            .clone()
            .unwrap_or_else(|| DEFAULT_ANTHROPIC_VERSION.to_string())
    }
}

#[async_trait]
impl ModelHandle for AnthropicClient {
    fn provider(&self) -> &str {
        &self.base.provider
    }

    fn model(&self) -> &str {
        &self.base.model
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url("/v1/messages");
        let payload = self.payload(&request);

        info!(
            provider = self.base.provider.as_str(),
            model = self.base.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to Anthropic"
        );

        let response: AnthropicResponse = self
            .base
            .post_with_key_header(
                &url,
                &payload,
                "x-api-key",
                &[("anthropic-version", self.version())],
            )
            .await?;
        debug!(stop_reason = ?response.stop_reason, "Received response from Anthropic");

        parse_response(&self.base.provider, response)
    }
}

fn parse_response(provider: &str, response: AnthropicResponse) -> Result<ModelResponse, ModelError> {
    let mut text = Vec::new();
    let mut tool_calls = Vec::new();
    let mut reasoning = Vec::new();
    for block in response.content {
        match block {
            AnthropicBlock::Text { text: chunk } => text.push(chunk),
            AnthropicBlock::Thinking { thinking, signature } => {
                reasoning.push(ReasoningBlock::Thinking { thinking, signature });
            }
            AnthropicBlock::RedactedThinking { data } => {
                reasoning.push(ReasoningBlock::RedactedThinking { data });
            }
            AnthropicBlock::ToolUse { id, name, input } => {
                tool_calls.push(ToolCall::new(id, name, input.to_string()));
            }
            AnthropicBlock::Other => {}
        }
    }

    if text.is_empty() && tool_calls.is_empty() {
        return Err(ModelError::invalid_response(provider, "no text or tool_use blocks"));
    }

    let usage = response.usage.map(|u| TokenUsage {
        input_tokens: u.input_tokens,
        output_tokens: u.output_tokens,
    });
    let message =
        ChatMessage::assistant_with_tool_calls(text.join(""), tool_calls).with_reasoning(reasoning);
    Ok(ModelResponse::new(message).with_usage(usage))
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking: Option<Value>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    Thinking {
        thinking: String,
        #[serde(default)]
        signature: String,
    },
    RedactedThinking {
        data: String,
    },
    /// Any future block types.
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}
