//! Puzzle engine
//!
//! The state machine that validates guesses, classifies feedback and
//! decides when a playthrough is over. It is independent of any solver.

mod game;
mod guess;
mod observation;

pub use game::{EngineError, GameConfig, PuzzleGame, REVEALS_TO_WIN};
pub use guess::{Guess, Mode, Response};
pub use observation::{Observation, Step};
