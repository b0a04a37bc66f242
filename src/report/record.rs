//! One playthrough's outcome as persisted in result files

use crate::core::Difficulty;
use crate::engine::{Guess, Mode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key identifying a unit of work in a sweep
pub type RecordKey = (u32, Option<u64>);

/// Result of one playthrough
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaythroughRecord {
    /// Policy that produced the guesses
    pub solver: String,
    /// Embedding or chat model behind the policy
    pub model: String,
    pub mode: Mode,
    /// Only meaningful for agent runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_of_thought: Option<bool>,
    pub puzzle_id: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    pub solved_overall: bool,
    /// Guesses consumed when each difficulty was first revealed
    pub solved_at: BTreeMap<Difficulty, usize>,
    pub num_steps: usize,
    pub num_invalid: usize,
    /// Valid guesses in order, normalized
    pub guesses: Vec<Guess>,
}

impl PlaythroughRecord {
    #[must_use]
    pub const fn key(&self) -> RecordKey {
        (self.puzzle_id, self.seed)
    }

    /// Whether the category of this difficulty was revealed
    #[must_use]
    pub fn solved(&self, difficulty: Difficulty) -> bool {
        self.solved_at.contains_key(&difficulty)
    }
}
