//! # Provider identity
//!
//! Provider tags arrive in several spellings (`"openai"`, `"OpenAI"`,
//! `":openai"`). They are normalised into a single [`ProviderId`] at the
//! boundary so lookups never depend on the spelling a host used.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    pub const OPENAI: &'static str = "openai";
    pub const ANTHROPIC: &'static str = "anthropic";
    pub const GEMINI: &'static str = "gemini";
    pub const OLLAMA: &'static str = "ollama";

    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(
            raw.as_ref()
                .trim()
                .trim_start_matches(':')
                .to_ascii_lowercase(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Provider name with known aliases folded in (`google` is served by `gemini`).
    pub fn canonical(&self) -> &str {
        match self.0.as_str() {
            "google" => "gemini",
            other => other,
        }
    }

    /// Well-known environment variable holding this provider's API key.
    /// Aliases share the variable of the provider they stand for.
    ///
    /// ```
    /// use orrery_core::config::ProviderId;
    ///
    /// assert_eq!(ProviderId::new("openai").api_key_env_var(), "OPENAI_API_KEY");
    /// assert_eq!(ProviderId::new("azure-openai").api_key_env_var(), "AZURE_OPENAI_API_KEY");
    /// assert_eq!(ProviderId::new("google").api_key_env_var(), "GEMINI_API_KEY");
    /// ```
    pub fn api_key_env_var(&self) -> String {
        let stem: String = self
            .canonical()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{stem}_API_KEY")
    }
}

impl From<String> for ProviderId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ProviderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<ProviderId> for String {
    fn from(value: ProviderId) -> Self {
        value.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a `"provider/model"` key.
///
/// Only the first `/` separates; model names such as
/// `"ollama/library/qwen3"` keep the remainder intact.
pub fn parse_model_key(key: &str) -> Result<(ProviderId, String), ConfigError> {
    let invalid = || ConfigError::InvalidModelKey {
        key: key.to_string(),
    };
    let (provider, model) = key.trim().split_once('/').ok_or_else(invalid)?;
    let provider = ProviderId::new(provider);
    let model = model.trim();
    if provider.as_str().is_empty() || model.is_empty() {
        return Err(invalid());
    }
    Ok((provider, model.to_string()))
}
