//! Model infrastructure module
//!
//! Builds provider-agnostic model handles from declarative configuration.
//!
//! # Structure
//! - `types` - Request, Response, ToolSpec and Error types
//! - `traits` - ModelHandle and ModelBuilder traits
//! - `adapter` - Message and tool format adapters
//! - `factory` - ModelRegistry (provider tag to builder) and API key resolution
//! - `clients` - Individual HTTP client implementations

pub mod adapter;
#[cfg(feature = "http-providers")]
pub mod clients;
pub mod factory;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use factory::{ModelRegistry, resolve_api_key};
pub use traits::{ModelBuilder, ModelHandle};
pub use types::{ModelError, ModelRequest, ModelResponse, ParameterSchema, TokenUsage, ToolSpec};
