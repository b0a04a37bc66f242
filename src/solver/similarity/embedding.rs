//! Word embeddings and pairwise similarity
//!
//! Embedding inference is external; this module only defines the seam and
//! a file-backed table of precomputed vectors.

use crate::core::{Word, normalize};
use crate::provider::ProviderError;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Failures while obtaining embeddings
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("no embedding for word {0}")]
    MissingWord(String),

    #[error("embedder returned {got} vectors for {expected} words")]
    CountMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("failed to read embeddings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse embeddings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Maps words to vectors
///
/// Must be deterministic for a given model, with one vector per input word.
pub trait Embedder: Send + Sync {
    /// Embed each word
    ///
    /// # Errors
    /// Returns `EmbeddingError` if any word cannot be embedded.
    fn embed(&self, words: &[Word]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Cosine similarity of two vectors
///
/// Returns 0.0 when either vector has zero length.
///
/// # Examples
/// ```
/// use connections_eval::solver::similarity::cosine_similarity;
///
/// assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-9);
/// assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]).abs() < 1e-9);
/// ```
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Precomputed embeddings loaded from a JSON object of word to vector
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    vectors: FxHashMap<String, Vec<f32>>,
}

impl EmbeddingTable {
    /// Build a table; keys are normalized
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: AsRef<str>,
    {
        let vectors = pairs
            .into_iter()
            .map(|(word, vector)| (normalize(word.as_ref()), vector))
            .collect();
        Self { vectors }
    }

    /// Load a table from a JSON file
    ///
    /// # Errors
    /// Returns `EmbeddingError` if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EmbeddingError> {
        let content = fs::read_to_string(path.as_ref())?;
        let raw: FxHashMap<String, Vec<f32>> = serde_json::from_str(&content)?;
        let table = Self::from_pairs(raw);
        debug!(
            path = %path.as_ref().display(),
            words = table.len(),
            "loaded embedding table"
        );
        Ok(table)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl Embedder for EmbeddingTable {
    fn embed(&self, words: &[Word]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        words
            .iter()
            .map(|word| {
                self.vectors
                    .get(word.text())
                    .cloned()
                    .ok_or_else(|| EmbeddingError::MissingWord(word.text().to_string()))
            })
            .collect()
    }
}
