//! Runtime constants
//!
//! Single source of truth for paths, endpoints and tuning values.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/orrery.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Turns kept free below the memory capacity so an in-flight tool exchange is
/// never truncated.
pub const MEMORY_RESET_MARGIN: usize = 50;

/// Model round trips a single `chat` may spend on tool calls before giving up.
pub const DEFAULT_MAX_ROUND_TRIPS: usize = 25;

/// Retries applied to transient provider failures when a config omits `max_retries`.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay between provider retries; attempt `n` waits `n * RETRY_BACKOFF_MS`.
pub const RETRY_BACKOFF_MS: u64 = 500;

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_API_PATH: &str = "/v1/chat/completions";

pub const DEFAULT_ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";
/// Anthropic requires `max_tokens`; used when the config leaves it unset.
pub const DEFAULT_ANTHROPIC_MAX_TOKENS: u32 = 4096;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
/// Default Gemini API path (fallback when not specified in config)
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://127.0.0.1:11434";
