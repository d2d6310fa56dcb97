//! Model types - Request, Response, tool specs and Error types

use crate::types::ChatMessage;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use thiserror::Error;

/// Structured-parameter representation the model protocol expects for tool arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSchema {
    String {
        description: Option<String>,
        allowed: Vec<String>,
    },
    Integer {
        description: Option<String>,
    },
    Number {
        description: Option<String>,
    },
    Boolean {
        description: Option<String>,
    },
    Array {
        description: Option<String>,
        items: Option<Box<ParameterSchema>>,
    },
    Object {
        description: Option<String>,
        properties: BTreeMap<String, ParameterSchema>,
        required: Vec<String>,
    },
}

impl ParameterSchema {
    /// An object with no properties, for tools that take no arguments.
    pub fn empty_object() -> Self {
        ParameterSchema::Object {
            description: None,
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Render as the JSON Schema subset every supported provider accepts.
    pub fn to_json_schema(&self) -> Value {
        let (kind, description) = match self {
            ParameterSchema::String { description, .. } => ("string", description),
            ParameterSchema::Integer { description } => ("integer", description),
            ParameterSchema::Number { description } => ("number", description),
            ParameterSchema::Boolean { description } => ("boolean", description),
            ParameterSchema::Array { description, .. } => ("array", description),
            ParameterSchema::Object { description, .. } => ("object", description),
        };

        let mut schema = Map::new();
        schema.insert("type".into(), json!(kind));
        if let Some(description) = description {
            schema.insert("description".into(), json!(description));
        }

        match self {
            ParameterSchema::String { allowed, .. } if !allowed.is_empty() => {
                schema.insert("enum".into(), json!(allowed));
            }
            ParameterSchema::Array { items, .. } => {
                let items = items
                    .as_ref()
                    .map(|items| items.to_json_schema())
                    .unwrap_or_else(|| json!({"type": "string"}));
                schema.insert("items".into(), items);
            }
            ParameterSchema::Object {
                properties,
                required,
                ..
            } => {
                let properties: Map<String, Value> = properties
                    .iter()
                    .map(|(name, property)| (name.clone(), property.to_json_schema()))
                    .collect();
                schema.insert("properties".into(), Value::Object(properties));
                if !required.is_empty() {
                    schema.insert("required".into(), json!(required));
                }
            }
            _ => {}
        }

        Value::Object(schema)
    }
}

/// Tool description advertised to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

/// Model request for LLM chat
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub system_prompt: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSpec>,
}

impl ModelRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Model response from LLM
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub message: ChatMessage,
    pub usage: Option<TokenUsage>,
}

impl ModelResponse {
    pub fn new(message: ChatMessage) -> Self {
        Self {
            message,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.usage = usage;
        self
    }
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("provider '{provider}' rejected the credentials (HTTP {status})")]
    Unauthorized { provider: String, status: u16 },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn unauthorized(provider: impl Into<String>, status: u16) -> Self {
        Self::Unauthorized {
            provider: provider.into(),
            status,
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn status(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            provider: provider.into(),
            status,
            body: body.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Authentication failures: a missing key or one the provider refused.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            ModelError::MissingApiKey { .. } | ModelError::Unauthorized { .. }
        )
    }

    /// Transport failures, rate limiting and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Network { source, .. } => !source.is_builder() && !source.is_decode(),
            ModelError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// User-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ModelError::MissingApiKey { provider } => format!(
                "Provider '{provider}' needs an API key. Set it in the model config or the provider's environment variable."
            ),
            ModelError::Unauthorized { provider, .. } => {
                format!("Provider '{provider}' rejected the API key.")
            }
            ModelError::Network { provider, source } => {
                if source.is_connect() {
                    format!("Cannot connect to model provider '{provider}'.")
                } else if source.is_timeout() {
                    format!("Request to '{provider}' timed out.")
                } else {
                    format!("Network error talking to '{provider}'.")
                }
            }
            ModelError::Status {
                provider, status, ..
            } => match status {
                404 => format!("Endpoint for '{provider}' was not found."),
                429 => format!("Provider '{provider}' is rate limiting requests."),
                502 | 503 => format!("Provider '{provider}' is currently unavailable."),
                _ => format!("Request to '{provider}' failed: {status}"),
            },
            ModelError::InvalidResponse { provider, .. } => {
                format!("Response from '{provider}' was not understood.")
            }
        }
    }
}
