//! # Agent Module
//!
//! Couples a model handle, system prompt, tool set and memory into a stateful
//! multi-turn chat unit.
//!
//! ## Key Types
//!
//! - [`Agent`] - The chat loop
//! - [`AgentBuilder`] - Validating constructor
//! - [`ChatOutcome`] - `{result, error}` returned by [`Agent::chat`]
//! - [`AgentReply`] - Detailed result of [`Agent::run`]
//! - [`AgentError`] - Errors that can occur during a chat
//!
//! ## Chat Loop
//!
//! 1. Reject blank prompts before any model call
//! 2. Reset memory to its seed if it is near capacity
//! 3. Send memory plus the new user turn and the tool specs
//! 4. Execute every tool call in the reply through the bridge and send the results back
//! 5. Stop at the first reply without tool calls, or at the round-trip limit

mod builder;
mod errors;
mod models;
mod runner;

pub use builder::AgentBuilder;
pub use errors::AgentError;
pub use models::{AgentReply, ChatOutcome, EMPTY_PROMPT_MESSAGE};
pub use runner::Agent;
