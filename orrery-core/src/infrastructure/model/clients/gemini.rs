//! Gemini client implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::base::HttpClientBase;
use crate::config::{ConfigError, ModelConfig};
use crate::constants::{DEFAULT_GEMINI_API_PATH, DEFAULT_GEMINI_ENDPOINT};
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::ModelHandle;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse, TokenUsage};
use crate::types::{ChatMessage, ToolCall};

/// Gemini client for Google AI
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    config: ModelConfig,
    api_path: String,
}

impl GeminiClient {
    pub fn from_config(config: &ModelConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base: HttpClientBase::from_config(config, DEFAULT_GEMINI_ENDPOINT)?,
            config: config.clone(),
            api_path: config
                .extras
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_API_PATH.to_string()),
        })
    }

    pub fn build_handle(config: &ModelConfig) -> Result<Arc<dyn ModelHandle>, ConfigError> {
        Ok(Arc::new(Self::from_config(config)?))
    }

    fn build_model_url(&self) -> String {
        let base = self.base.endpoint.trim_end_matches('/');
        let path = self.api_path.trim_matches('/');
        format!("{base}/{path}/{}:generateContent", self.config.model)
    }

    fn payload(&self, request: &ModelRequest) -> Value {
        let config = &self.config;
        let (system_text, contents) =
            MessageAdapter::to_gemini_format(request.system_prompt.as_deref(), &request.messages);

        let mut generation = Map::new();
        if let Some(temperature) = config.temperature {
            generation.insert("temperature".into(), json!(temperature));
        }
        if let Some(top_p) = config.top_p {
            generation.insert("topP".into(), json!(top_p));
        }
        if let Some(max_tokens) = config.max_tokens {
            generation.insert("maxOutputTokens".into(), json!(max_tokens));
        }
        if !config.stop.is_empty() {
            generation.insert("stopSequences".into(), json!(config.stop));
        }
        if let Some(thinking) = config.thinking {
            generation.insert(
                "thinkingConfig".into(),
                json!({"thinkingBudget": thinking.budget()}),
            );
        }

        let mut payload = json!({"contents": contents});
        if let Some(system) = system_text {
            payload["system_instruction"] = json!({"parts": [{"text": system}]});
        }
        let tools = MessageAdapter::to_gemini_tools(&request.tools);
        if !tools.is_empty() {
            payload["tools"] = json!(tools);
        }
        if !generation.is_empty() {
            payload["generationConfig"] = Value::Object(generation);
        }
        payload
    }
}

#[async_trait]
impl ModelHandle for GeminiClient {
    fn provider(&self) -> &str {
        &self.base.provider
    }

    fn model(&self) -> &str {
        &self.base.model
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.build_model_url();
        let payload = self.payload(&request);

        info!(
            provider = self.base.provider.as_str(),
            model = self.base.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to Gemini"
        );

        let response: GeminiResponse = self.base.post_with_query_key(&url, &payload).await?;
        debug!("Received response from Gemini");

        parse_response(&self.base.provider, response)
    }
}

fn parse_response(provider: &str, response: GeminiResponse) -> Result<ModelResponse, ModelError> {
    let parts = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .ok_or_else(|| ModelError::invalid_response(provider, "missing candidate content"))?;

    let mut text = Vec::new();
    let mut tool_calls = Vec::new();
    for part in parts {
        if part.thought.unwrap_or(false) {
            continue;
        }
        if let Some(chunk) = part.text {
            text.push(chunk);
        }
        if let Some(call) = part.function_call {
            // Gemini does not issue call ids; results are matched by name.
            let id = format!("call_{}", Uuid::new_v4().simple());
            tool_calls.push(ToolCall::new(id, call.name, call.args.to_string()));
        }
    }

    if text.is_empty() && tool_calls.is_empty() {
        return Err(ModelError::invalid_response(provider, "missing text"));
    }

    let usage = response.usage_metadata.map(|u| TokenUsage {
        input_tokens: u.prompt_token_count.unwrap_or_default(),
        output_tokens: u.candidates_token_count.unwrap_or_default(),
    });
    Ok(
        ModelResponse::new(ChatMessage::assistant_with_tool_calls(text.join(""), tool_calls))
            .with_usage(usage),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    thought: Option<bool>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
}
