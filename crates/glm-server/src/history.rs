//! Conversation history validation and truncation.

use glm_engine::Turn;

use crate::error::ServerError;

/// Keeps only the most recent `max_turns` turns of a conversation.
#[derive(Debug, Clone, Copy)]
pub struct HistoryNormalizer {
    max_turns: usize,
}

impl HistoryNormalizer {
    pub fn new(max_turns: usize) -> Self {
        Self { max_turns }
    }

    /// Sliding window over the tail of `turns`. Oversized input is trimmed
    /// from the front, never rejected.
    pub fn normalize(&self, mut turns: Vec<Turn>) -> Vec<Turn> {
        let excess = turns.len().saturating_sub(self.max_turns);
        turns.drain(..excess);
        turns
    }
}

/// Convert raw JSON history entries into turns. Every entry must hold exactly
/// a user text and a model text.
pub fn parse_turns(raw: Vec<Vec<String>>) -> Result<Vec<Turn>, ServerError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let arity = entry.len();
            let mut parts = entry.into_iter();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(user), Some(model), None) => Ok((user, model)),
                _ => Err(ServerError::InvalidRequest(format!(
                    "history[{index}] must have exactly 2 elements, got {arity}"
                ))),
            }
        })
        .collect()
}
