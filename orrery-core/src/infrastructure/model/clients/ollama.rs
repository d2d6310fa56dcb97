//! Ollama client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::base::HttpClientBase;
use crate::config::{ConfigError, ModelConfig};
use crate::constants::DEFAULT_OLLAMA_ENDPOINT;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::ModelHandle;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse, TokenUsage};
use crate::types::{ChatMessage, ToolCall};

/// Ollama client for local LLM
#[derive(Clone)]
pub struct OllamaClient {
    base: HttpClientBase,
    config: ModelConfig,
}

impl OllamaClient {
    /// Creates client from model config.
    pub fn from_config(config: &ModelConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base: HttpClientBase::from_config(config, DEFAULT_OLLAMA_ENDPOINT)?,
            config: config.clone(),
        })
    }

    pub fn build_handle(config: &ModelConfig) -> Result<Arc<dyn ModelHandle>, ConfigError> {
        Ok(Arc::new(Self::from_config(config)?))
    }

    fn payload(&self, request: &ModelRequest) -> OllamaRequest {
        let config = &self.config;
        let mut options = Map::new();
        if let Some(temperature) = config.temperature {
            options.insert("temperature".into(), json!(temperature));
        }
        if let Some(top_p) = config.top_p {
            options.insert("top_p".into(), json!(top_p));
        }
        if let Some(max_tokens) = config.max_tokens {
            options.insert("num_predict".into(), json!(max_tokens));
        }
        if !config.stop.is_empty() {
            options.insert("stop".into(), json!(config.stop));
        }

        OllamaRequest {
            model: config.model.clone(),
            messages: MessageAdapter::to_ollama_format(
                request.system_prompt.as_deref(),
                &request.messages,
            ),
            tools: MessageAdapter::to_openai_tools(&request.tools),
            options: (!options.is_empty()).then_some(Value::Object(options)),
            think: config.thinking.map(|_| true),
            stream: false,
        }
    }
}

#[async_trait]
impl ModelHandle for OllamaClient {
    fn provider(&self) -> &str {
        &self.base.provider
    }

    fn model(&self) -> &str {
        &self.base.model
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url("/api/chat");
        let payload = self.payload(&request);

        info!(
            provider = self.base.provider.as_str(),
            model = self.base.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to Ollama"
        );

        let response: OllamaResponse = self.base.post_optional_auth(&url, &payload).await?;
        debug!("Received response from Ollama");

        parse_response(&self.base.provider, response)
    }
}

fn parse_response(provider: &str, response: OllamaResponse) -> Result<ModelResponse, ModelError> {
    let message = response
        .message
        .ok_or_else(|| ModelError::invalid_response(provider, "missing message"))?;

    let tool_calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let id = format!("call_{}", Uuid::new_v4().simple());
            ToolCall::new(id, call.function.name, call.function.arguments.to_string())
        })
        .collect();

    let usage = match (response.prompt_eval_count, response.eval_count) {
        (None, None) => None,
        (input, output) => Some(TokenUsage {
            input_tokens: input.unwrap_or_default(),
            output_tokens: output.unwrap_or_default(),
        }),
    };
    Ok(
        ModelResponse::new(ChatMessage::assistant_with_tool_calls(message.content, tool_calls))
            .with_usage(usage),
    )
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    think: Option<bool>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessage>,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
    tool_calls: Option<Vec<OllamaToolCall>>,
}

#[derive(Deserialize)]
struct OllamaToolCall {
    function: OllamaFunction,
}

#[derive(Deserialize)]
struct OllamaFunction {
    name: String,
    #[serde(default)]
    arguments: Value,
}
