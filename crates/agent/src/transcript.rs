//! The session transcript: an append-only list of turns.
//!
//! Insertion order is display order and export order. The only way to remove
//! turns is [`Transcript::clear`], which restores the single seed greeting.

use dost_core::message::Turn;

#[derive(Debug, Clone)]
pub struct Transcript {
    seed: Turn,
    turns: Vec<Turn>,
}

impl Transcript {
    /// A transcript holding only the unstamped greeting turn.
    pub fn new(greeting: impl Into<String>) -> Self {
        let seed = Turn::greeting(greeting);
        Self {
            turns: vec![seed.clone()],
            seed,
        }
    }

    /// Append a turn and return a reference to it.
    pub fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// Reset to the seed state, whatever the current length.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.turns.push(self.seed.clone());
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Point-in-time copy for export.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false: the seed turn is never removed.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
