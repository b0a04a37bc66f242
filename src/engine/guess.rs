//! Guesses, play modes and feedback classifications

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the puzzle is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One group per guess, with feedback after each
    Iterative,
    /// A single guess naming all four groups
    AllAtOnce,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iterative => f.write_str("iterative"),
            Self::AllAtOnce => f.write_str("all-at-once"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iterative" => Ok(Self::Iterative),
            "all-at-once" | "all_at_once" | "one-shot" | "oneshot" => Ok(Self::AllAtOnce),
            other => Err(format!(
                "unknown mode {other:?} (expected iterative or all-at-once)"
            )),
        }
    }
}

/// A solver's proposal
///
/// Words are raw text; the engine normalizes them before comparing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Guess {
    /// Four words believed to share a category (iterative mode)
    Group(Vec<String>),
    /// Four groups of four words covering the puzzle (all-at-once mode)
    Partition(Vec<Vec<String>>),
}

impl Guess {
    /// Build a group guess from anything string-like
    pub fn group<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Group(words.into_iter().map(Into::into).collect())
    }

    /// Build a partition guess from nested string-like lists
    pub fn partition<I, G, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Partition(
            groups
                .into_iter()
                .map(|g| g.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// The mode this guess shape belongs to
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::Group(_) => Mode::Iterative,
            Self::Partition(_) => Mode::AllAtOnce,
        }
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(words) => write!(f, "[{}]", words.join(", ")),
            Self::Partition(groups) => {
                let parts: Vec<String> = groups
                    .iter()
                    .map(|g| format!("[{}]", g.join(", ")))
                    .collect();
                write!(f, "{}", parts.join(" "))
            }
        }
    }
}

/// Feedback classification for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    Invalid,
    Incorrect,
    NearlyCorrect,
    Correct,
}

impl Response {
    /// Whether this response costs one guess
    #[must_use]
    pub const fn consumes_guess(self) -> bool {
        matches!(self, Self::Incorrect | Self::NearlyCorrect)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => f.write_str("INVALID"),
            Self::Incorrect => f.write_str("INCORRECT"),
            Self::NearlyCorrect => f.write_str("NEARLY_CORRECT"),
            Self::Correct => f.write_str("CORRECT"),
        }
    }
}
