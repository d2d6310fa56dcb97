//! Tool bridge: runs a host handler for one model-issued tool call and turns
//! whatever happens into the string the model sees.
//!
//! Nothing escapes as an error. Malformed arguments produce an `ERROR:`
//! string without touching the handler, reported failures become
//! `Tool Error: ...` and handler errors or panics are rendered with a short
//! trace.

use super::error::ToolHandlerError;
use super::registration::{
    ToolCallContext, ToolCallback, ToolCompletion, ToolHandler, ToolRegistration, panic_message,
};
use crate::infrastructure::model::ToolSpec;
use serde_json::{Map, Value};
use std::error::Error as _;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix for arguments the bridge could not hand to the handler.
pub const ARGUMENT_ERROR_PREFIX: &str = "ERROR:";
/// Prefix for failures the handler reported through its callback.
pub const TOOL_ERROR_PREFIX: &str = "Tool Error: ";

/// A registration wrapped into the model protocol's calling convention.
#[derive(Clone)]
pub struct BridgedTool {
    name: String,
    spec: ToolSpec,
    handler: Arc<dyn ToolHandler>,
}

impl fmt::Debug for BridgedTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgedTool")
            .field("name", &self.name)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Wrap a registration so the chat loop can advertise and execute it.
pub fn to_callable(registration: &ToolRegistration) -> BridgedTool {
    BridgedTool {
        name: registration.name.clone(),
        spec: ToolSpec {
            name: registration.name.clone(),
            description: registration.description.clone(),
            parameters: registration.schema.to_parameters(),
        },
        handler: Arc::clone(registration.handler()),
    }
}

impl BridgedTool {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    /// Run the tool and wait for its completion.
    ///
    /// There is no timeout: a handler that never completes its callback and
    /// never drops it keeps this future pending.
    pub async fn execute(&self, raw_args: &str, ctx: ToolCallContext) -> String {
        let args = match parse_arguments(&self.name, raw_args) {
            Ok(args) => args,
            Err(message) => {
                warn!(tool = self.name.as_str(), "Rejected malformed tool arguments");
                return message;
            }
        };

        debug!(
            tool = self.name.as_str(),
            call_id = ctx.call_id.as_str(),
            "Executing tool"
        );

        let (callback, completion) = ToolCallback::channel();
        let handler = Arc::clone(&self.handler);
        let invoked = catch_unwind(AssertUnwindSafe(move || handler.call(ctx, args, callback)));

        match invoked {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(tool = self.name.as_str(), error = %err, "Tool handler returned an error");
                return format_handler_error(&self.name, &err);
            }
            Err(panic) => {
                let message = panic_message(&*panic);
                warn!(tool = self.name.as_str(), panic = message.as_str(), "Tool handler panicked");
                return format_exception(&self.name, &message, &["panic in tool handler".to_string()]);
            }
        }

        match completion.await {
            Ok(ToolCompletion::Success(output)) => output.render(),
            Ok(ToolCompletion::Failure(messages)) => {
                debug!(tool = self.name.as_str(), "Tool reported failure");
                format!("{TOOL_ERROR_PREFIX}{}", messages.join("\n"))
            }
            Err(_) => {
                warn!(tool = self.name.as_str(), "Tool callback dropped without a result");
                format!(
                    "{TOOL_ERROR_PREFIX}tool '{}' finished without reporting a result",
                    self.name
                )
            }
        }
    }
}

/// Parse raw model arguments into an object. Blank input means no arguments.
fn parse_arguments(tool: &str, raw: &str) -> Result<Map<String, Value>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!(
            "{ARGUMENT_ERROR_PREFIX} invalid tool arguments for '{tool}': expected a JSON object, got {}",
            match other {
                Value::Null => "null",
                Value::Bool(_) => "a boolean",
                Value::Number(_) => "a number",
                Value::String(_) => "a string",
                Value::Array(_) => "an array",
                Value::Object(_) => "an object",
            }
        )),
        Err(err) => Err(format!(
            "{ARGUMENT_ERROR_PREFIX} invalid tool arguments for '{tool}': {err}"
        )),
    }
}

fn format_handler_error(tool: &str, err: &ToolHandlerError) -> String {
    let mut trace = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        trace.push(cause.to_string());
        source = cause.source();
    }
    if trace.is_empty() {
        trace.push("returned from tool handler".to_string());
    }
    format_exception(tool, &err.to_string(), &trace)
}

fn format_exception(tool: &str, message: &str, trace: &[String]) -> String {
    format!(
        "Error executing tool '{tool}': {message}\nTrace: {}",
        trace.join(" <- ")
    )
}
