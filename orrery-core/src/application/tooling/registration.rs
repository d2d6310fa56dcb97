//! Host tool registration contract.
//!
//! A handler receives a [`ToolCallContext`], the parsed arguments and a
//! [`ToolCallback`]. It may complete the callback before returning or move it
//! into a task that finishes later. The callback is consumed on completion,
//! so it fires at most once.

use super::error::ToolHandlerError;
use crate::config::ToolId;
use futures::FutureExt;
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

use super::schema::ToolSchema;

/// Per-call information handed to a tool handler.
#[derive(Clone)]
pub struct ToolCallContext {
    pub call_id: String,
    pub tool: String,
    pub agent_id: Option<String>,
    capabilities: Option<Arc<dyn Any + Send + Sync>>,
}

impl ToolCallContext {
    pub fn new(call_id: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            tool: tool.into(),
            agent_id: None,
            capabilities: None,
        }
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// Attach host capabilities (project root, editor handle, ...).
    pub fn with_capabilities(mut self, capabilities: Arc<dyn Any + Send + Sync>) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Host capabilities downcast to `T`, if present and of that type.
    pub fn capability<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.capabilities.as_deref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for ToolCallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolCallContext")
            .field("call_id", &self.call_id)
            .field("tool", &self.tool)
            .field("agent_id", &self.agent_id)
            .field("has_capabilities", &self.capabilities.is_some())
            .finish()
    }
}

/// Successful tool result.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    /// Sequence of parts, rendered with blank lines between them.
    Parts(Vec<String>),
    Json(Value),
}

impl ToolOutput {
    pub fn render(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Parts(parts) => parts.join("\n\n"),
            ToolOutput::Json(Value::Array(items)) => items
                .iter()
                .map(render_scalar)
                .collect::<Vec<_>>()
                .join("\n\n"),
            ToolOutput::Json(value) => render_scalar(value),
        }
    }

    /// Messages used when the output is reported as an error.
    fn into_messages(self) -> Vec<String> {
        match self {
            ToolOutput::Text(text) => vec![text],
            ToolOutput::Parts(parts) => parts,
            ToolOutput::Json(Value::Array(items)) => items.iter().map(render_scalar).collect(),
            ToolOutput::Json(value) => vec![render_scalar(&value)],
        }
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl From<String> for ToolOutput {
    fn from(value: String) -> Self {
        ToolOutput::Text(value)
    }
}

impl From<&str> for ToolOutput {
    fn from(value: &str) -> Self {
        ToolOutput::Text(value.to_string())
    }
}

impl From<Vec<String>> for ToolOutput {
    fn from(value: Vec<String>) -> Self {
        ToolOutput::Parts(value)
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        ToolOutput::Json(value)
    }
}

/// What a handler reported through its callback.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ToolCompletion {
    Success(ToolOutput),
    Failure(Vec<String>),
}

/// One-shot completion handle passed to every handler.
#[derive(Debug)]
pub struct ToolCallback {
    sender: oneshot::Sender<ToolCompletion>,
}

impl ToolCallback {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<ToolCompletion>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Report a result and whether it is an error.
    pub fn complete(self, output: impl Into<ToolOutput>, is_error: bool) {
        let output = output.into();
        if is_error {
            self.send(ToolCompletion::Failure(output.into_messages()));
        } else {
            self.send(ToolCompletion::Success(output));
        }
    }

    pub fn success(self, output: impl Into<ToolOutput>) {
        self.send(ToolCompletion::Success(output.into()));
    }

    pub fn failure(self, message: impl Into<String>) {
        self.send(ToolCompletion::Failure(vec![message.into()]));
    }

    pub fn failures(self, messages: Vec<String>) {
        self.send(ToolCompletion::Failure(messages));
    }

    fn send(self, completion: ToolCompletion) {
        if self.sender.send(completion).is_err() {
            debug!("Tool completed after its caller stopped waiting");
        }
    }
}

/// Host-supplied tool implementation.
pub trait ToolHandler: Send + Sync {
    fn call(
        &self,
        ctx: ToolCallContext,
        args: Map<String, Value>,
        callback: ToolCallback,
    ) -> Result<(), ToolHandlerError>;
}

impl<F> ToolHandler for F
where
    F: Fn(ToolCallContext, Map<String, Value>, ToolCallback) -> Result<(), ToolHandlerError>
        + Send
        + Sync,
{
    fn call(
        &self,
        ctx: ToolCallContext,
        args: Map<String, Value>,
        callback: ToolCallback,
    ) -> Result<(), ToolHandlerError> {
        self(ctx, args, callback)
    }
}

/// A named, schema-described tool backed by a host handler.
#[derive(Clone)]
pub struct ToolRegistration {
    pub name: String,
    pub description: String,
    pub schema: ToolSchema,
    /// Declared type tag; the filter id falls back to the name when absent.
    pub kind: Option<ToolId>,
    handler: Arc<dyn ToolHandler>,
}

impl ToolRegistration {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ToolSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolCallContext, Map<String, Value>, ToolCallback) -> Result<(), ToolHandlerError>
            + Send
            + Sync
            + 'static,
    {
        Self::from_handler(name, description, schema, handler)
    }

    /// Register a type implementing [`ToolHandler`].
    pub fn from_handler<H>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ToolSchema,
        handler: H,
    ) -> Self
    where
        H: ToolHandler + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            kind: None,
            handler: Arc::new(handler),
        }
    }

    /// Wrap an async function into the callback convention.
    ///
    /// The future runs on a spawned task. Its `Ok` output, `Err` message or
    /// panic message is reported through the callback.
    pub fn from_async<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ToolSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolCallContext, Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput, ToolHandlerError>> + Send + 'static,
    {
        Self::new(name, description, schema, move |ctx, args, callback| {
            let future = handler(ctx, args);
            tokio::spawn(async move {
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(Ok(output)) => callback.success(output),
                    Ok(Err(err)) => callback.failure(err.to_string()),
                    Err(panic) => callback.failure(format!("panicked: {}", panic_message(&*panic))),
                }
            });
            Ok(())
        })
    }

    pub fn with_kind(mut self, kind: impl Into<ToolId>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Canonical id used by the tool filter.
    pub fn id(&self) -> ToolId {
        self.kind
            .clone()
            .unwrap_or_else(|| ToolId::new(&self.name))
    }

    pub(crate) fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }
}

impl fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
