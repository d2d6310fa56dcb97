//! # orrery-core
//!
//! Agent runtime that exposes host-registered tools to LLM chat backends.
//!
//! The crate is split the same way the rest of the workspace is:
//!
//! - [`config`] - declarative model/agent configuration and the TOML loader
//! - [`domain`] - message and tool-call value types shared by every layer
//! - [`infrastructure::model`] - provider-agnostic model handles and the builder registry
//! - [`application`] - tool bridge, conversational memory, agents, cache and session

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;


pub use application::{AgentSession, agent, cache, load_context_files, memory, session, tooling};
pub use config::{AgentConfig, ConfigError, ModelConfig, RuntimeConfig};
pub use domain::types;
pub use infrastructure::model;

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global `tracing` subscriber.
///
/// Honours `RUST_LOG` and falls back to `info`. With `quiet` set, all output is
/// suppressed. Only the first call has any effect.
pub fn init_tracing(quiet: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = if quiet {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .try_init();
    });
}
