//! Immutable snapshots of puzzle state handed to solvers

use super::guess::{Guess, Mode, Response};
use crate::core::{Category, Difficulty, Word};
use serde::Serialize;

/// What a solver may see after `reset` or `step`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Words not yet assigned to a revealed category, in display order
    pub words: Vec<Word>,
    /// Every valid guess so far, normalized
    pub guesses: Vec<Guess>,
    /// Revealed categories in reveal order
    pub revealed: Vec<Category>,
    /// Difficulty of each revealed category, parallel to `revealed`
    pub revealed_difficulties: Vec<Difficulty>,
    pub guesses_remaining: usize,
    pub mode: Mode,
    /// Feedback text for the last step; empty after reset
    pub message: String,
    /// Classification of the last step; `None` after reset
    pub response: Option<Response>,
}

impl Observation {
    /// Whether a category of this difficulty has been revealed
    #[must_use]
    pub fn is_revealed(&self, difficulty: Difficulty) -> bool {
        self.revealed_difficulties.contains(&difficulty)
    }

    /// Canonical text of the remaining words
    #[must_use]
    pub fn word_texts(&self) -> Vec<&str> {
        self.words.iter().map(Word::text).collect()
    }
}

/// Result of applying one guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub observation: Observation,
    pub done: bool,
    /// 1 once three or more categories are revealed, else 0
    pub reward: u8,
}
