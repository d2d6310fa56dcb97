//! OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::{ConfigError, ModelConfig};
use crate::constants::{DEFAULT_OPENAI_API_PATH, DEFAULT_OPENAI_ENDPOINT};
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::ModelHandle;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse, TokenUsage};
use crate::types::{ChatMessage, ToolCall};

/// OpenAI-compatible client (works with OpenAI, Mistral, Groq, vLLM, etc.)
#[derive(Clone)]
pub struct OpenAIClient {
    base: HttpClientBase,
    config: ModelConfig,
    api_path: String,
}

impl OpenAIClient {
    pub fn from_config(config: &ModelConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base: HttpClientBase::from_config(config, DEFAULT_OPENAI_ENDPOINT)?,
            config: config.clone(),
            api_path: config
                .extras
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_API_PATH.to_string()),
        })
    }

    pub fn build_handle(config: &ModelConfig) -> Result<Arc<dyn ModelHandle>, ConfigError> {
        Ok(Arc::new(Self::from_config(config)?))
    }

    fn payload(&self, request: &ModelRequest) -> OpenAIRequest {
        let config = &self.config;
        OpenAIRequest {
            model: config.model.clone(),
            messages: MessageAdapter::to_openai_format(
                request.system_prompt.as_deref(),
                &request.messages,
            ),
            tools: MessageAdapter::to_openai_tools(&request.tools),
            temperature: config.temperature,
            top_p: config.top_p,
            stop: config.stop.clone(),
            max_tokens: config.max_tokens,
            reasoning_effort: config.thinking.map(|t| t.effort().as_str()),
            service_tier: config.extras.service_tier.clone(),
            stream: false,
        }
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        self.config
            .extras
            .organization
            .iter()
            .map(|org| ("OpenAI-Organization", org.clone()))
            .collect()
    }
}

#[async_trait]
impl ModelHandle for OpenAIClient {
    fn provider(&self) -> &str {
        &self.base.provider
    }

    fn model(&self) -> &str {
        &self.base.model
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url(&self.api_path);
        let payload = self.payload(&request);

        info!(
            provider = self.base.provider.as_str(),
            model = self.base.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to OpenAI-compatible provider"
        );

        let response: OpenAIResponse = self
            .base
            .post_with_bearer(&url, &payload, &self.headers())
            .await?;
        debug!("Received response from OpenAI-compatible provider");

        parse_response(&self.base.provider, response)
    }
}

fn parse_response(provider: &str, response: OpenAIResponse) -> Result<ModelResponse, ModelError> {
    let usage = response.usage.map(|u| TokenUsage {
        input_tokens: u.prompt_tokens,
        output_tokens: u.completion_tokens,
    });

    let message = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .ok_or_else(|| ModelError::invalid_response(provider, "missing message"))?;

    let tool_calls: Vec<ToolCall> = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
        .collect();
    let content = message.content.unwrap_or_default();

    if content.is_empty() && tool_calls.is_empty() {
        return Err(ModelError::invalid_response(provider, "missing content"));
    }

    Ok(ModelResponse::new(ChatMessage::assistant_with_tool_calls(content, tool_calls)).with_usage(usage))
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_tier: Option<String>,
    stream: bool,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessage>,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Deserialize)]
struct OpenAIToolCall {
    id: String,
    function: OpenAIFunction,
}

#[derive(Deserialize)]
struct OpenAIFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
