//! Model traits

use super::types::{ModelError, ModelRequest, ModelResponse};
use crate::config::{ConfigError, ModelConfig};
use async_trait::async_trait;
use std::sync::Arc;

/// Ready-to-call reference to a configured LLM backend.
#[async_trait]
pub trait ModelHandle: Send + Sync {
    /// Provider tag this handle was built for
    fn provider(&self) -> &str;

    /// Model name sent to the provider
    fn model(&self) -> &str;

    /// Send one chat request and wait for the complete response
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}

/// Turns a resolved [`ModelConfig`] into a [`ModelHandle`] for one provider.
///
/// Implementations must not perform network I/O; credentials are only
/// checked on the first call.
pub trait ModelBuilder: Send + Sync {
    fn build(&self, config: &ModelConfig) -> Result<Arc<dyn ModelHandle>, ConfigError>;
}

impl<F> ModelBuilder for F
where
    F: Fn(&ModelConfig) -> Result<Arc<dyn ModelHandle>, ConfigError> + Send + Sync,
{
    fn build(&self, config: &ModelConfig) -> Result<Arc<dyn ModelHandle>, ConfigError> {
        self(config)
    }
}
