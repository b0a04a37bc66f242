//! Embedding-similarity ranking policies
//!
//! Both policies fix the word indices on the first observation of a puzzle,
//! embed the words once and keep a `SimilarityCache` for the attempt.

mod full_partition;
mod single_group;

pub use full_partition::FullPartitionRanking;
pub use single_group::SingleGroupRanking;

use super::combinations::IndexGroup;
use super::policy::PolicyError;
use super::similarity::{Aggregation, Embedder, EmbeddingError, SimilarityCache, SimilarityMatrix};
use crate::core::Word;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Words of one puzzle, indexed in first-seen order, with their scores
struct IndexedWords {
    words: Vec<Word>,
    index: FxHashMap<Word, u8>,
    cache: SimilarityCache,
}

impl IndexedWords {
    fn embed(
        words: &[Word],
        embedder: &dyn Embedder,
        aggregation: Aggregation,
    ) -> Result<Self, PolicyError> {
        let vectors = embedder.embed(words)?;
        if vectors.len() != words.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: words.len(),
                got: vectors.len(),
            }
            .into());
        }

        let matrix = SimilarityMatrix::from_embeddings(&vectors);
        debug!(words = words.len(), %aggregation, "built similarity matrix");

        let index = words
            .iter()
            .enumerate()
            .map(|(i, word)| (word.clone(), i as u8))
            .collect();

        Ok(Self {
            words: words.to_vec(),
            index,
            cache: SimilarityCache::new(matrix, aggregation),
        })
    }

    /// Sorted indices of `words`
    fn indices(&self, words: &[Word]) -> Result<Vec<u8>, PolicyError> {
        let mut indices = words
            .iter()
            .map(|word| {
                self.index
                    .get(word)
                    .copied()
                    .ok_or_else(|| PolicyError::UnknownWord(word.text().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        indices.sort_unstable();
        Ok(indices)
    }

    fn texts(&self, group: &IndexGroup) -> Vec<String> {
        group
            .iter()
            .map(|&i| self.words[usize::from(i)].text().to_string())
            .collect()
    }
}
