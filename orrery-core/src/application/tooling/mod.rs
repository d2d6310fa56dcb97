//! Host tools exposed to the model.
//!
//! - `registration` - the contract a host tool satisfies
//! - `schema` - neutral parameter schemas and their translation
//! - `bridge` - callback-to-string execution of a single tool call
//! - `filter` - per-agent tool selection from the catalog

mod bridge;
mod error;
mod filter;
mod registration;
mod schema;

pub use crate::config::{ToolId, ToolSelection};
pub use bridge::{ARGUMENT_ERROR_PREFIX, BridgedTool, TOOL_ERROR_PREFIX, to_callable};
pub use error::{ToolHandlerError, ToolSchemaError};
pub use filter::filter_tools;
pub use registration::{ToolCallContext, ToolCallback, ToolHandler, ToolOutput, ToolRegistration};
pub use schema::{PropertySchema, PropertyType, ToolSchema};
