//! Single-group ranking for iterative play

use super::IndexedWords;
use crate::solver::combinations::{IndexGroup, combinations4};
use crate::solver::policy::{GuessPolicy, PolicyError};
use crate::solver::similarity::{Aggregation, Embedder};
use crate::engine::{Guess, Mode, Observation};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Guesses the most similar unguessed group of the remaining words
///
/// Each distinct remaining-word set is ranked once; later decisions on the
/// same set continue down the stored ranking.
pub struct SingleGroupRanking {
    embedder: Arc<dyn Embedder>,
    aggregation: Aggregation,
    words: Option<IndexedWords>,
    ranked: FxHashMap<Vec<u8>, VecDeque<IndexGroup>>,
    guessed: FxHashSet<IndexGroup>,
}

impl SingleGroupRanking {
    #[must_use]
    pub fn new(embedder: Arc<dyn Embedder>, aggregation: Aggregation) -> Self {
        Self {
            embedder,
            aggregation,
            words: None,
            ranked: FxHashMap::default(),
            guessed: FxHashSet::default(),
        }
    }

    /// Number of distinct remaining-word sets ranked so far
    #[must_use]
    pub fn ranked_sets(&self) -> usize {
        self.ranked.len()
    }
}

/// All groups of `remaining`, best first; ties keep enumeration order
fn rank_groups(words: &mut IndexedWords, remaining: &[u8]) -> VecDeque<IndexGroup> {
    let mut scored: Vec<(f64, IndexGroup)> = combinations4(remaining)
        .into_iter()
        .map(|group| (words.cache.group_score(group), group))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, group)| group).collect()
}

impl GuessPolicy for SingleGroupRanking {
    fn name(&self) -> &'static str {
        "single_group"
    }

    fn next_guess(&mut self, observation: &Observation) -> Result<Option<Guess>, PolicyError> {
        if observation.mode != Mode::Iterative {
            return Err(PolicyError::ModeMismatch {
                policy: self.name(),
                mode: observation.mode,
            });
        }

        let words = match self.words.take() {
            Some(words) => words,
            None => IndexedWords::embed(
                &observation.words,
                self.embedder.as_ref(),
                self.aggregation,
            )?,
        };
        let words = self.words.insert(words);

        let remaining = words.indices(&observation.words)?;
        if !self.ranked.contains_key(&remaining) {
            let ranking = rank_groups(words, &remaining);
            debug!(
                remaining = remaining.len(),
                candidates = ranking.len(),
                "ranked remaining groups"
            );
            self.ranked.insert(remaining.clone(), ranking);
        }

        let Some(queue) = self.ranked.get_mut(&remaining) else {
            return Ok(None);
        };
        while let Some(group) = queue.pop_front() {
            if self.guessed.insert(group) {
                return Ok(Some(Guess::Group(words.texts(&group))));
            }
        }
        Ok(None)
    }
}
