// Shared fixtures for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use orrery_core::ConfigError;
use orrery_core::ModelConfig;
use orrery_core::model::{ModelError, ModelHandle, ModelRequest, ModelResponse};
use orrery_core::tooling::{PropertySchema, PropertyType, ToolRegistration, ToolSchema};
use orrery_core::types::{ChatMessage, MessageRole, ToolCall};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Replays canned replies and records every request it receives.
#[derive(Clone, Default)]
pub struct ScriptedModel {
    replies: Arc<Mutex<Vec<Result<ChatMessage, u16>>>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<ChatMessage>) -> Self {
        Self::with_results(replies.into_iter().map(Ok).collect())
    }

    /// `Err(status)` entries fail that call with the HTTP status.
    pub fn with_results(replies: Vec<Result<ChatMessage, u16>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::default(),
        }
    }

    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().await.clone()
    }

    pub fn handle(&self) -> Arc<dyn ModelHandle> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl ModelHandle for ScriptedModel {
    fn provider(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "script"
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.requests.lock().await.push(request);
        let mut replies = self.replies.lock().await;
        if replies.is_empty() {
            return Err(ModelError::invalid_response("scripted", "script exhausted"));
        }
        match replies.remove(0) {
            Ok(message) => Ok(ModelResponse::new(message)),
            Err(status) => Err(ModelError::status("scripted", status, "scripted failure")),
        }
    }
}

/// Deterministic model for session-level tests.
///
/// - prompts of the form `call <tool> <json>` produce a tool call
/// - a tool result is answered with `tool said: <result>`
/// - anything else is answered with `<n> messages`
pub struct Parrot {
    model: String,
}

#[async_trait]
impl ModelHandle for Parrot {
    fn provider(&self) -> &str {
        "parrot"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let Some(last) = request.messages.last() else {
            return Err(ModelError::invalid_response("parrot", "no messages"));
        };
        let content = last.content();
        let reply = if last.role == MessageRole::Tool {
            ChatMessage::assistant(format!("tool said: {content}"))
        } else if let Some(rest) = content.strip_prefix("call ") {
            let (tool, args) = rest.split_once(' ').unwrap_or((rest, "{}"));
            ChatMessage::assistant_with_tool_calls("", vec![ToolCall::new("call_1", tool, args)])
        } else {
            ChatMessage::assistant(format!("{} messages", request.messages.len()))
        };
        Ok(ModelResponse::new(reply))
    }
}

pub fn parrot_builder(config: &ModelConfig) -> Result<Arc<dyn ModelHandle>, ConfigError> {
    Ok(Arc::new(Parrot {
        model: config.model.clone(),
    }))
}

/// `hello(nm: string)` answering `Hello <nm>!`.
pub fn hello_tool() -> ToolRegistration {
    let schema = ToolSchema::object().required(
        PropertySchema::new("nm", PropertyType::String).described("Who to greet"),
    );
    ToolRegistration::new("hello", "Greets someone by name", schema, |_, args, callback| {
        let name = args.get("nm").and_then(Value::as_str).unwrap_or("stranger");
        callback.success(format!("Hello {name}!"));
        Ok(())
    })
}

/// A no-argument tool answering `ran <name>`.
pub fn named_tool(name: &str) -> ToolRegistration {
    let reply = format!("ran {name}");
    ToolRegistration::new(name, format!("The {name} tool"), ToolSchema::object(), move |_, _, callback| {
        callback.success(reply.clone());
        Ok(())
    })
}

pub fn tool_call(name: &str, args: Value) -> ToolCall {
    ToolCall::new(format!("call_{name}"), name, args.to_string())
}

pub fn greet(name: &str) -> ChatMessage {
    ChatMessage::assistant_with_tool_calls("", vec![tool_call("hello", json!({ "nm": name }))])
}
