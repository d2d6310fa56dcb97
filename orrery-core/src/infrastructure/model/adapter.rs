//! Message adapters - convert between different API formats

use super::types::ToolSpec;
use crate::types::{ChatMessage, ContentPart, MessageRole, ReasoningBlock, ToolCall};
use serde_json::{Map, Value, json};

/// Adapter for converting messages and tool specs to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI chat-completions format.
    /// The system prompt, when present, leads the list.
    pub fn to_openai_format(system_prompt: Option<&str>, messages: &[ChatMessage]) -> Vec<Value> {
        let mut out = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = system_prompt {
            out.push(json!({"role": "system", "content": system}));
        }

        for message in messages {
            match message.role {
                MessageRole::Tool => out.push(json!({
                    "role": "tool",
                    "tool_call_id": message.tool_call_id.clone().unwrap_or_default(),
                    "content": message.content(),
                })),
                MessageRole::Assistant if message.has_tool_calls() => {
                    let content = message.content();
                    let content = if content.is_empty() {
                        Value::Null
                    } else {
                        Value::String(content)
                    };
                    let calls: Vec<Value> = message
                        .tool_calls
                        .iter()
                        .map(|call| {
                            json!({
                                "id": call.id,
                                "type": "function",
                                "function": {"name": call.name, "arguments": call.arguments},
                            })
                        })
                        .collect();
                    out.push(json!({
                        "role": "assistant",
                        "content": content,
                        "tool_calls": calls,
                    }));
                }
                role => out.push(json!({
                    "role": role.as_str(),
                    "content": message.content(),
                })),
            }
        }
        out
    }

    /// OpenAI-style `tools` array (also accepted by Ollama)
    pub fn to_openai_tools(tools: &[ToolSpec]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters.to_json_schema(),
                    }
                })
            })
            .collect()
    }

    /// Convert messages to Ollama `/api/chat` format.
    /// Same as OpenAI except tool-call arguments are objects and results carry the tool name.
    pub fn to_ollama_format(system_prompt: Option<&str>, messages: &[ChatMessage]) -> Vec<Value> {
        let mut out = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = system_prompt {
            out.push(json!({"role": "system", "content": system}));
        }

        for message in messages {
            let mut entry = json!({
                "role": message.role.as_str(),
                "content": message.content(),
            });
            if message.has_tool_calls() {
                entry["tool_calls"] = message
                    .tool_calls
                    .iter()
                    .map(|call| {
                        json!({"function": {"name": call.name, "arguments": arguments_object(call)}})
                    })
                    .collect();
            }
            if let Some(name) = &message.tool_name {
                entry["tool_name"] = json!(name);
            }
            out.push(entry);
        }
        out
    }

    /// Convert messages to Anthropic Messages format.
    ///
    /// System turns are lifted into the top-level `system` string. Consecutive
    /// turns mapping to the same role are merged, so parallel tool results
    /// travel in one `user` message. Signed thinking blocks lead their
    /// assistant turn, as the API requires when the turn called tools.
    pub fn to_anthropic_format(
        system_prompt: Option<&str>,
        messages: &[ChatMessage],
    ) -> (Option<String>, Vec<Value>) {
        let mut system_parts: Vec<String> = system_prompt.map(str::to_string).into_iter().collect();
        let mut out: Vec<(&'static str, Vec<Value>)> = Vec::new();

        for message in messages {
            let (role, blocks) = match message.role {
                MessageRole::System => {
                    system_parts.push(message.content());
                    continue;
                }
                MessageRole::User => ("user", text_blocks(&message.parts)),
                MessageRole::Assistant => {
                    let mut blocks: Vec<Value> =
                        message.reasoning.iter().map(reasoning_block).collect();
                    blocks.extend(text_blocks(&message.parts));
                    blocks.extend(message.tool_calls.iter().map(|call| {
                        json!({
                            "type": "tool_use",
                            "id": call.id,
                            "name": call.name,
                            "input": arguments_object(call),
                        })
                    }));
                    ("assistant", blocks)
                }
                MessageRole::Tool => (
                    "user",
                    vec![json!({
                        "type": "tool_result",
                        "tool_use_id": message.tool_call_id.clone().unwrap_or_default(),
                        "content": message.content(),
                    })],
                ),
            };
            push_merged(&mut out, role, blocks);
        }

        let system = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));
        let messages = out
            .into_iter()
            .map(|(role, content)| json!({"role": role, "content": content}))
            .collect();
        (system, messages)
    }

    /// Anthropic `tools` array
    pub fn to_anthropic_tools(tools: &[ToolSpec]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "input_schema": tool.parameters.to_json_schema(),
                })
            })
            .collect()
    }

    /// Convert messages to Gemini format
    /// Returns: (system_instruction_text, contents)
    pub fn to_gemini_format(
        system_prompt: Option<&str>,
        messages: &[ChatMessage],
    ) -> (Option<String>, Vec<Value>) {
        let mut system_parts: Vec<String> = system_prompt.map(str::to_string).into_iter().collect();
        let mut out: Vec<(&'static str, Vec<Value>)> = Vec::new();

        for message in messages {
            let (role, parts) = match message.role {
                MessageRole::System => {
                    system_parts.push(message.content());
                    continue;
                }
                MessageRole::User => ("user", gemini_text_parts(&message.parts)),
                MessageRole::Assistant => {
                    let mut parts = gemini_text_parts(&message.parts);
                    parts.extend(message.tool_calls.iter().map(|call| {
                        json!({"functionCall": {"name": call.name, "args": arguments_object(call)}})
                    }));
                    ("model", parts)
                }
                MessageRole::Tool => (
                    "user",
                    vec![json!({
                        "functionResponse": {
                            "name": message.tool_name.clone().unwrap_or_default(),
                            "response": {"content": message.content()},
                        }
                    })],
                ),
            };
            push_merged(&mut out, role, parts);
        }

        let system = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));
        let contents = out
            .into_iter()
            .map(|(role, parts)| json!({"role": role, "parts": parts}))
            .collect();
        (system, contents)
    }

    /// Gemini `tools` array with a single `functionDeclarations` entry
    pub fn to_gemini_tools(tools: &[ToolSpec]) -> Vec<Value> {
        if tools.is_empty() {
            return Vec::new();
        }
        let declarations: Vec<Value> = tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters.to_json_schema(),
                })
            })
            .collect();
        vec![json!({"functionDeclarations": declarations})]
    }
}

/// Tool-call arguments as a JSON object, for wire formats that refuse strings.
fn arguments_object(call: &ToolCall) -> Value {
    match serde_json::from_str::<Value>(&call.arguments) {
        Ok(Value::Object(map)) => Value::Object(map),
        _ => Value::Object(Map::new()),
    }
}

fn reasoning_block(block: &ReasoningBlock) -> Value {
    match block {
        ReasoningBlock::Thinking { thinking, signature } => {
            json!({"type": "thinking", "thinking": thinking, "signature": signature})
        }
        ReasoningBlock::RedactedThinking { data } => {
            json!({"type": "redacted_thinking", "data": data})
        }
    }
}

fn text_blocks(parts: &[ContentPart]) -> Vec<Value> {
    parts
        .iter()
        .map(|part| json!({"type": "text", "text": part.render()}))
        .collect()
}

fn gemini_text_parts(parts: &[ContentPart]) -> Vec<Value> {
    parts
        .iter()
        .map(|part| json!({"text": part.render()}))
        .collect()
}

fn push_merged(out: &mut Vec<(&'static str, Vec<Value>)>, role: &'static str, blocks: Vec<Value>) {
    if blocks.is_empty() {
        return;
    }
    match out.last_mut() {
        Some((last_role, last_blocks)) if *last_role == role => last_blocks.extend(blocks),
        _ => out.push((role, blocks)),
    }
}
