//! Driving one policy through one puzzle

use crate::core::{Difficulty, PuzzleError};
use crate::engine::{EngineError, Guess, Observation, PuzzleGame, Response};
use crate::solver::{GuessPolicy, PolicyError};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Bounds on a single playthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    /// Stop after this many invalid responses
    pub invalid_limit: usize,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self { invalid_limit: 5 }
    }
}

/// Reasons a playthrough is abandoned
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("{policy} ran out of candidates at step {step}")]
    PolicyExhausted { policy: &'static str, step: usize },

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

/// Everything observed during one playthrough
#[derive(Debug, Clone)]
pub struct Playthrough {
    pub solved: bool,
    pub steps: usize,
    pub invalid: usize,
    /// Guesses consumed when each difficulty was first revealed
    pub solved_at: BTreeMap<Difficulty, usize>,
    pub guesses: Vec<Guess>,
    pub last: Observation,
}

/// Play `game` from a fresh reset until it ends or the invalid limit is hit
///
/// # Errors
/// Returns `RunError` if the policy fails or runs out of candidates, or the
/// engine rejects a guess shape.
pub fn run_playthrough<P: GuessPolicy + ?Sized>(
    game: &mut PuzzleGame,
    policy: &mut P,
    limits: RunLimits,
) -> Result<Playthrough, RunError> {
    let max_guesses = game.config().max_guesses;
    let mut observation = game.reset();
    let mut solved_at = BTreeMap::new();
    let mut steps = 0;
    let mut invalid = 0;
    let mut done = false;
    let mut reward = 0;

    while !done && invalid < limits.invalid_limit {
        let guess = policy
            .next_guess(&observation)?
            .ok_or(RunError::PolicyExhausted {
                policy: policy.name(),
                step: steps,
            })?;

        let step = game.step(&guess)?;
        steps += 1;

        let response = step.observation.response;
        if response == Some(Response::Invalid) {
            invalid += 1;
        }
        for &difficulty in &step.observation.revealed_difficulties {
            solved_at
                .entry(difficulty)
                .or_insert(max_guesses - step.observation.guesses_remaining);
        }
        debug!(step = steps, %guess, ?response, "played guess");

        observation = step.observation;
        done = step.done;
        reward = step.reward;
    }

    let solved = reward == 1;
    info!(
        puzzle = game.puzzle().id(),
        policy = policy.name(),
        solved,
        steps,
        invalid,
        "playthrough finished"
    );

    Ok(Playthrough {
        solved,
        steps,
        invalid,
        solved_at,
        guesses: observation.guesses.clone(),
        last: observation,
    })
}
