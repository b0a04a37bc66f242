//! Puzzle dataset loading
//!
//! Accepts both the archive layout (`answers` with hex `color`) and the
//! normalized layout (`categories` with a `difficulty` label).

use super::puzzle::{Category, Difficulty, Puzzle, PuzzleError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Sample dataset bundled with the crate
pub const SAMPLE_PUZZLES: &str = include_str!("../../data/sample_puzzles.json");

#[derive(Debug, Deserialize)]
struct PuzzleRecord {
    #[serde(default)]
    id: Option<u32>,
    #[serde(alias = "answers")]
    categories: Vec<CategoryRecord>,
}

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    description: String,
    #[serde(alias = "color")]
    difficulty: Difficulty,
    words: Vec<String>,
}

/// An indexed collection of puzzles, addressed by 1-based id
#[derive(Debug, Clone)]
pub struct PuzzleSet {
    puzzles: Vec<Puzzle>,
}

impl PuzzleSet {
    /// Load a dataset from a JSON file
    ///
    /// # Errors
    /// Returns `PuzzleError` if the file cannot be read, is not valid JSON,
    /// or contains a malformed puzzle.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PuzzleError> {
        let content = fs::read_to_string(path.as_ref())?;
        let set = Self::from_json(&content)?;
        debug!(
            path = %path.as_ref().display(),
            puzzles = set.len(),
            "loaded puzzle dataset"
        );
        Ok(set)
    }

    /// Parse a dataset from JSON text
    ///
    /// Ids are 1-based positions. A record may repeat its id explicitly, but
    /// it must equal the position.
    ///
    /// # Errors
    /// Returns `PuzzleError` on parse failures, malformed puzzles, or an
    /// explicit id that differs from the record's position.
    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        let records: Vec<PuzzleRecord> = serde_json::from_str(json)?;

        let puzzles = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                let id = position as u32 + 1;
                if let Some(declared) = record.id
                    && declared != id
                {
                    return Err(PuzzleError::IdOutOfOrder {
                        position: id,
                        id: declared,
                    });
                }
                let categories = record
                    .categories
                    .iter()
                    .map(|c| {
                        let words: Vec<&str> = c.words.iter().map(String::as_str).collect();
                        Category::new(c.description.clone(), c.difficulty, &words)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Puzzle::new(id, categories)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { puzzles })
    }

    /// The bundled sample dataset
    ///
    /// # Errors
    /// Returns `PuzzleError` only if the bundled file is malformed.
    pub fn sample() -> Result<Self, PuzzleError> {
        Self::from_json(SAMPLE_PUZZLES)
    }

    /// Look up a puzzle by its 1-based position in the dataset
    ///
    /// # Errors
    /// Returns `PuzzleError::UnknownPuzzle` when `id` is 0 or past the end.
    pub fn get(&self, id: u32) -> Result<&Puzzle, PuzzleError> {
        (id as usize)
            .checked_sub(1)
            .and_then(|index| self.puzzles.get(index))
            .ok_or(PuzzleError::UnknownPuzzle {
                id,
                available: self.puzzles.len(),
            })
    }

    /// All valid ids, in order
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=self.puzzles.len()).map(|i| i as u32)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}
