//! Puzzle word representation
//!
//! A Word stores the canonical (normalized) form of a puzzle word. All
//! membership checks and overlap counts compare canonical forms only.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A canonical puzzle word
///
/// Punctuation is removed, surrounding whitespace trimmed and the text
/// upper-cased. Inner spaces are kept ("ICE CREAM" stays two tokens in one word).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

/// Error type for words that cannot be canonicalized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    #[error("word {0:?} is empty after normalization")]
    Empty(String),
}

/// Normalize raw text into its canonical token
///
/// # Examples
/// ```
/// use connections_eval::core::normalize;
///
/// assert_eq!(normalize("Bass,"), "BASS");
/// assert_eq!(normalize(" BASS "), "BASS");
/// assert_eq!(normalize("bass"), "BASS");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    stripped.trim().to_uppercase()
}

impl Word {
    /// Create a new Word from raw text
    ///
    /// # Errors
    /// Returns `WordError::Empty` if nothing is left after normalization.
    pub fn new(raw: &str) -> Result<Self, WordError> {
        let text = normalize(raw);
        if text.is_empty() {
            return Err(WordError::Empty(raw.to_string()));
        }
        Ok(Self(text))
    }

    /// Get the canonical text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn normalization_variants_collapse() {
        let a = Word::new("Bass,").unwrap();
        let b = Word::new("bass").unwrap();
        let c = Word::new(" BASS ").unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.text(), "BASS");
    }

    #[test]
    fn punctuation_removed_before_trim() {
        assert_eq!(normalize("  'trout'  "), "TROUT");
        assert_eq!(normalize("\"SALMON.\"\n"), "SALMON");
    }

    #[test]
    fn inner_spaces_kept() {
        assert_eq!(normalize("ice cream"), "ICE CREAM");
    }

    #[test]
    fn empty_after_normalization_rejected() {
        assert!(matches!(Word::new(" ,. "), Err(WordError::Empty(_))));
        assert!(Word::new("").is_err());
    }

    #[test]
    fn set_lookup_by_str() {
        let mut set = FxHashSet::default();
        set.insert(Word::new("flounder").unwrap());

        assert!(set.contains("FLOUNDER"));
        assert!(!set.contains("flounder"));
    }

    #[test]
    fn word_display() {
        let word = Word::new("trout").unwrap();
        assert_eq!(format!("{word}"), "TROUT");
    }
}
