//! Puzzle definition: four hidden categories over a 16-word universe

use super::word::{Word, WordError};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of categories in a puzzle
pub const CATEGORY_COUNT: usize = 4;

/// Number of words in each category
pub const GROUP_SIZE: usize = 4;

/// Total number of words in a puzzle
pub const WORD_COUNT: usize = CATEGORY_COUNT * GROUP_SIZE;

/// Difficulty tier attached to each category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Difficulty {
    Yellow,
    Green,
    Blue,
    Purple,
}

impl Difficulty {
    /// All tiers, easiest first
    pub const ALL: [Self; 4] = [Self::Yellow, Self::Green, Self::Blue, Self::Purple];

    /// Parse a tier from its label or from the dataset's hex colour
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "yellow" | "#fbd400" => Some(Self::Yellow),
            "green" | "#69e352" => Some(Self::Green),
            "blue" | "#5492ff" => Some(Self::Blue),
            "purple" | "#df7bea" => Some(Self::Purple),
            _ => None,
        }
    }

    /// Lowercase label used in messages and result files
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown difficulty {value:?}"))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One hidden group of four words
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub description: String,
    pub difficulty: Difficulty,
    pub words: [Word; GROUP_SIZE],
}

impl Category {
    /// Build a category from raw words
    ///
    /// # Errors
    /// Returns `PuzzleError` if there are not exactly four words or a word
    /// is empty after normalization.
    pub fn new(
        description: impl Into<String>,
        difficulty: Difficulty,
        words: &[&str],
    ) -> Result<Self, PuzzleError> {
        let description = description.into();
        let words: Vec<Word> = words
            .iter()
            .map(|w| Word::new(w))
            .collect::<Result<_, WordError>>()?;
        let count = words.len();
        let words: [Word; GROUP_SIZE] = words
            .try_into()
            .map_err(|_| PuzzleError::CategorySize {
                description: description.clone(),
                count,
            })?;

        Ok(Self {
            description,
            difficulty,
            words,
        })
    }

    /// Number of words shared with `guess`
    #[must_use]
    pub fn overlap<'a>(&self, guess: impl IntoIterator<Item = &'a str>) -> usize {
        let members: FxHashSet<&str> = self.words.iter().map(Word::text).collect();
        let guessed: FxHashSet<&str> = guess.into_iter().collect();
        members.intersection(&guessed).count()
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.text() == word)
    }
}

/// Errors raised while building or looking up puzzles
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error(transparent)]
    Word(#[from] WordError),

    #[error("category {description:?} has {count} words, expected {GROUP_SIZE}")]
    CategorySize { description: String, count: usize },

    #[error("puzzle {id} has {count} categories, expected {CATEGORY_COUNT}")]
    CategoryCount { id: u32, count: usize },

    #[error("puzzle {id} repeats the word {word}")]
    DuplicateWord { id: u32, word: Word },

    #[error("record {position} declares id {id}; ids must follow dataset order")]
    IdOutOfOrder { position: u32, id: u32 },

    #[error("puzzle {id} not found (dataset holds {available} puzzles)")]
    UnknownPuzzle { id: u32, available: usize },

    #[error("failed to read puzzle data: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse puzzle data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A Connections puzzle
///
/// Invariant: the four categories partition 16 distinct canonical words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Puzzle {
    id: u32,
    categories: [Category; CATEGORY_COUNT],
}

impl Puzzle {
    /// Create a puzzle, validating the category layout
    ///
    /// # Errors
    /// Returns `PuzzleError` if there are not four categories or any word repeats.
    pub fn new(id: u32, categories: Vec<Category>) -> Result<Self, PuzzleError> {
        let count = categories.len();
        let categories: [Category; CATEGORY_COUNT] = categories
            .try_into()
            .map_err(|_| PuzzleError::CategoryCount { id, count })?;

        let mut seen = FxHashSet::default();
        for word in categories.iter().flat_map(|c| c.words.iter()) {
            if !seen.insert(word) {
                return Err(PuzzleError::DuplicateWord {
                    id,
                    word: word.clone(),
                });
            }
        }

        Ok(Self { id, categories })
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Categories in dataset order
    #[inline]
    #[must_use]
    pub const fn categories(&self) -> &[Category; CATEGORY_COUNT] {
        &self.categories
    }

    /// All 16 words, category by category
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.categories.iter().flat_map(|c| c.words.iter())
    }

    /// Check whether a canonical word belongs to the puzzle
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.categories.iter().any(|c| c.contains(word))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn fish_puzzle() -> Puzzle {
        Puzzle::new(
            1,
            vec![
                Category::new(
                    "FISH",
                    Difficulty::Yellow,
                    &["Bass", "Flounder", "Salmon", "Trout"],
                )
                .unwrap(),
                Category::new(
                    "FIRE ___",
                    Difficulty::Purple,
                    &["Ant", "Drill", "Island", "Opal"],
                )
                .unwrap(),
                Category::new(
                    "WET WEATHER",
                    Difficulty::Green,
                    &["Hail", "Rain", "Sleet", "Snow"],
                )
                .unwrap(),
                Category::new(
                    "NBA TEAMS",
                    Difficulty::Blue,
                    &["Bucks", "Heat", "Jazz", "Nets"],
                )
                .unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn difficulty_from_label_and_colour() {
        assert_eq!(Difficulty::parse("yellow"), Some(Difficulty::Yellow));
        assert_eq!(Difficulty::parse("#69E352"), Some(Difficulty::Green));
        assert_eq!(Difficulty::parse("#5492ff"), Some(Difficulty::Blue));
        assert_eq!(Difficulty::parse("Purple"), Some(Difficulty::Purple));
        assert_eq!(Difficulty::parse("#000000"), None);
    }

    #[test]
    fn category_requires_four_words() {
        let result = Category::new("SHORT", Difficulty::Blue, &["a", "b", "c"]);
        assert!(matches!(
            result,
            Err(PuzzleError::CategorySize { count: 3, .. })
        ));
    }

    #[test]
    fn category_overlap_counts_shared_words() {
        let puzzle = fish_puzzle();
        let fish = &puzzle.categories()[0];

        assert_eq!(fish.overlap(["BASS", "FLOUNDER", "SALMON", "TROUT"]), 4);
        assert_eq!(fish.overlap(["BASS", "FLOUNDER", "SALMON", "HEAT"]), 3);
        assert_eq!(fish.overlap(["BASS", "FLOUNDER", "JAZZ", "HEAT"]), 2);
    }

    #[test]
    fn puzzle_rejects_duplicate_words() {
        let result = Puzzle::new(
            7,
            vec![
                Category::new("A", Difficulty::Yellow, &["a", "b", "c", "d"]).unwrap(),
                Category::new("B", Difficulty::Green, &["e", "f", "g", "h"]).unwrap(),
                Category::new("C", Difficulty::Blue, &["i", "j", "k", "l"]).unwrap(),
                Category::new("D", Difficulty::Purple, &["m", "n", "o", "A."]).unwrap(),
            ],
        );

        assert!(matches!(result, Err(PuzzleError::DuplicateWord { id: 7, .. })));
    }

    #[test]
    fn puzzle_rejects_wrong_category_count() {
        let result = Puzzle::new(
            3,
            vec![Category::new("A", Difficulty::Yellow, &["a", "b", "c", "d"]).unwrap()],
        );
        assert!(matches!(
            result,
            Err(PuzzleError::CategoryCount { id: 3, count: 1 })
        ));
    }

    #[test]
    fn puzzle_exposes_sixteen_words() {
        let puzzle = fish_puzzle();
        assert_eq!(puzzle.words().count(), WORD_COUNT);
        assert!(puzzle.contains("OPAL"));
        assert!(!puzzle.contains("opal"));
    }
}
