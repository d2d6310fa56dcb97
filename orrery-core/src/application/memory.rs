//! Conversational memory.
//!
//! A bounded, ordered log of turns. Capacity counts turns, not tokens. After
//! a seed or reset the seed turn (one user turn holding the context strings)
//! is always first.

use crate::constants::MEMORY_RESET_MARGIN;
use crate::types::{ContentPart, MemoryTurn, MessageRole};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Memory {
    capacity: usize,
    turns: Vec<MemoryTurn>,
    /// Context strings of the last seed, in order.
    context: Vec<String>,
    seeded: bool,
}

impl Memory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            turns: Vec::new(),
            context: Vec::new(),
            seeded: false,
        }
    }

    /// New memory seeded with `context`.
    pub fn with_context(capacity: usize, context: &[String]) -> Self {
        let mut memory = Self::new(capacity);
        memory.seed(context);
        memory
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[MemoryTurn] {
        &self.turns
    }

    /// Context snapshot of the most recent seed.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Append one user turn with one part per context string. Empty context is a no-op.
    pub fn seed(&mut self, context: &[String]) {
        self.context = context.to_vec();
        if context.is_empty() {
            return;
        }
        let parts = context.iter().map(ContentPart::text).collect();
        if self.turns.is_empty() {
            self.seeded = true;
        }
        self.turns.push(MemoryTurn::user_parts(parts));
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.seeded = false;
    }

    /// Clear, then seed from `context`.
    pub fn reseed(&mut self, context: &[String]) {
        self.clear();
        self.seed(context);
    }

    /// Reset to the seed alone once the log is within the safety margin of
    /// capacity. Returns whether a reset happened.
    pub fn reset_if_near_capacity(&mut self, context: &[String]) -> bool {
        let threshold = self.capacity.saturating_sub(MEMORY_RESET_MARGIN);
        if self.turns.len() <= threshold {
            return false;
        }
        debug!(
            turns = self.turns.len(),
            capacity = self.capacity,
            "Memory near capacity, reseeding"
        );
        self.reseed(context);
        true
    }

    /// Append a turn, evicting the oldest non-seed turns past capacity.
    pub fn push(&mut self, turn: MemoryTurn) {
        self.turns.push(turn);
        self.enforce_capacity();
    }

    pub fn extend(&mut self, turns: impl IntoIterator<Item = MemoryTurn>) {
        self.turns.extend(turns);
        self.enforce_capacity();
    }

    fn enforce_capacity(&mut self) {
        if self.turns.len() <= self.capacity {
            return;
        }
        let first = usize::from(self.seeded);
        let overflow = self.turns.len() - self.capacity;
        let end = (first + overflow).min(self.turns.len());
        self.turns.drain(first..end);

        // Tool results whose requesting assistant turn was evicted are meaningless.
        while self
            .turns
            .get(first)
            .is_some_and(|turn| turn.role == MessageRole::Tool)
        {
            self.turns.remove(first);
        }
    }
}
