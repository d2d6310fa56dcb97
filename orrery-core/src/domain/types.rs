use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    /// Result of a tool call, answering an earlier assistant turn.
    Tool,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        }
    }
}

/// One ordered piece of a message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    /// Reference material quoted from somewhere else (a file, a document).
    Excerpt { source: String, text: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn excerpt(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Excerpt {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Plain-text rendering sent to providers that only accept strings.
    pub fn render(&self) -> String {
        match self {
            ContentPart::Text { text } => text.clone(),
            ContentPart::Excerpt { source, text } => format!("[{source}]\n{text}"),
        }
    }
}

/// Provider-signed reasoning emitted before a tool call.
///
/// Replayed unchanged on the assistant turn it came from; never rendered as content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReasoningBlock {
    Thinking { thinking: String, signature: String },
    RedactedThinking { data: String },
}

/// A model-issued request to invoke a named tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON arguments exactly as the model produced them.
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    #[serde(default)]
    pub parts: Vec<ContentPart>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasoning: Vec<ReasoningBlock>,
}

/// Memory stores the same shape the model protocol exchanges.
pub type MemoryTurn = ChatMessage;

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        let content = content.into();
        let parts = if content.is_empty() {
            Vec::new()
        } else {
            vec![ContentPart::text(content)]
        };
        Self {
            role,
            parts,
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
            reasoning: Vec::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// A user turn carrying several ordered parts.
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            parts,
            ..Self::new(MessageRole::User, "")
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::new(MessageRole::Assistant, content)
        }
    }

    pub fn with_reasoning(mut self, reasoning: Vec<ReasoningBlock>) -> Self {
        self.reasoning = reasoning;
        self
    }

    pub fn tool_result(call: &ToolCall, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(call.id.clone()),
            tool_name: Some(call.name.clone()),
            ..Self::new(MessageRole::Tool, content)
        }
    }

    /// All parts rendered and joined with blank lines.
    pub fn content(&self) -> String {
        self.parts
            .iter()
            .map(ContentPart::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
