use crate::model::TokenUsage;
use serde::Serialize;

/// Result text for a blank prompt.
pub const EMPTY_PROMPT_MESSAGE: &str = "Error: Cannot process empty prompt";

/// What `chat` hands back to the host: a result string and an error flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatOutcome {
    pub result: String,
    pub error: bool,
}

impl ChatOutcome {
    pub fn success(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            error: false,
        }
    }

    pub fn failure(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            error: true,
        }
    }
}

/// Details of a completed chat, for callers that want more than the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub text: String,
    /// Model calls made, including the final one.
    pub round_trips: usize,
    pub tool_calls: usize,
    pub usage: TokenUsage,
}
