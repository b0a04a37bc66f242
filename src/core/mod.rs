//! Core domain types for Connections puzzles
//!
//! Words, categories, puzzles and the dataset they are loaded from.

mod dataset;
pub(crate) mod puzzle;
mod word;

pub use dataset::{PuzzleSet, SAMPLE_PUZZLES};
pub use puzzle::{
    CATEGORY_COUNT, Category, Difficulty, GROUP_SIZE, Puzzle, PuzzleError, WORD_COUNT,
};
pub use word::{Word, WordError, normalize};
