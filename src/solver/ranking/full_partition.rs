//! Full-partition ranking for all-at-once play

use super::IndexedWords;
use crate::core::WORD_COUNT;
use crate::engine::{Guess, Mode, Observation};
use crate::solver::partition::{Partition, PartitionTable};
use crate::solver::policy::{GuessPolicy, PolicyError};
use crate::solver::similarity::{Aggregation, Embedder};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::debug;

/// Guesses whole partitions, best summed group similarity first
///
/// The table is shared read-only between attempts; scores and ranking are
/// per attempt.
pub struct FullPartitionRanking {
    table: Arc<PartitionTable>,
    embedder: Arc<dyn Embedder>,
    aggregation: Aggregation,
    words: Option<IndexedWords>,
    ranked: Vec<Partition>,
    cursor: usize,
    guessed: FxHashSet<Partition>,
}

impl FullPartitionRanking {
    #[must_use]
    pub fn new(
        table: Arc<PartitionTable>,
        embedder: Arc<dyn Embedder>,
        aggregation: Aggregation,
    ) -> Self {
        Self {
            table,
            embedder,
            aggregation,
            words: None,
            ranked: Vec::new(),
            cursor: 0,
            guessed: FxHashSet::default(),
        }
    }

    /// Score and sort the whole table
    fn rank(&mut self, observation: &Observation) -> Result<(), PolicyError> {
        if observation.words.len() != WORD_COUNT {
            return Err(PolicyError::WordCount(observation.words.len()));
        }
        let mut words =
            IndexedWords::embed(&observation.words, self.embedder.as_ref(), self.aggregation)?;

        let mut scored: Vec<(f64, Partition)> = self
            .table
            .as_slice()
            .iter()
            .map(|partition| (words.cache.partition_score(partition), *partition))
            .collect();
        // Stable, so equal scores keep table order
        scored.par_sort_by(|a, b| b.0.total_cmp(&a.0));

        debug!(
            partitions = scored.len(),
            groups = words.cache.cached_groups(),
            best = scored.first().map_or(0.0, |(score, _)| *score),
            "ranked partitions"
        );

        self.ranked = scored.into_iter().map(|(_, partition)| partition).collect();
        self.cursor = 0;
        self.words = Some(words);
        Ok(())
    }

    fn to_guess(words: &IndexedWords, partition: &Partition) -> Guess {
        Guess::Partition(
            partition
                .groups()
                .iter()
                .map(|group| words.texts(group))
                .collect(),
        )
    }
}

impl GuessPolicy for FullPartitionRanking {
    fn name(&self) -> &'static str {
        "full_partition"
    }

    fn next_guess(&mut self, observation: &Observation) -> Result<Option<Guess>, PolicyError> {
        if observation.mode != Mode::AllAtOnce {
            return Err(PolicyError::ModeMismatch {
                policy: self.name(),
                mode: observation.mode,
            });
        }
        if self.words.is_none() {
            self.rank(observation)?;
        }
        let Some(words) = &self.words else {
            return Ok(None);
        };

        while let Some(partition) = self.ranked.get(self.cursor) {
            self.cursor += 1;
            if self.guessed.insert(*partition) {
                return Ok(Some(Self::to_guess(words, partition)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::puzzle::tests::fish_puzzle;
    use crate::engine::{GameConfig, PuzzleGame, Response};
    use crate::solver::testing::{CategoryEmbedder, partition_table};

    fn all_at_once_game(seed: u64) -> PuzzleGame {
        PuzzleGame::new(
            fish_puzzle(),
            GameConfig::new(Mode::AllAtOnce, 4).with_seed(seed),
        )
    }

    #[test]
    fn best_partition_is_the_solution() {
        let mut game = all_at_once_game(5);
        let mut policy = FullPartitionRanking::new(
            partition_table(),
            Arc::new(CategoryEmbedder),
            Aggregation::Mean,
        );

        let guess = policy.next_guess(&game.observation()).unwrap().unwrap();
        // Every partition was scored from the shared group memo
        let words = policy.words.as_ref().unwrap();
        assert_eq!(words.cache.cached_groups(), 1820);

        let step = game.step(&guess).unwrap();

        assert_eq!(step.observation.response, Some(Response::Correct));
        assert!(step.done);
        assert_eq!(step.reward, 1);
    }

    #[test]
    fn successive_guesses_are_distinct() {
        let game = all_at_once_game(9);
        let observation = game.observation();
        let mut policy = FullPartitionRanking::new(
            partition_table(),
            Arc::new(CategoryEmbedder),
            Aggregation::Min,
        );

        let mut seen = FxHashSet::default();
        for _ in 0..20 {
            let guess = policy.next_guess(&observation).unwrap().unwrap();
            assert!(seen.insert(guess.to_string()));
        }
    }

    #[test]
    fn empty_table_is_exhausted_immediately() {
        let game = all_at_once_game(1);
        let mut policy = FullPartitionRanking::new(
            Arc::new(PartitionTable::from_partitions(Vec::new())),
            Arc::new(CategoryEmbedder),
            Aggregation::Mean,
        );
        assert!(policy.next_guess(&game.observation()).unwrap().is_none());
    }

    #[test]
    fn rejects_partial_word_sets() {
        let game = all_at_once_game(1);
        let mut observation = game.observation();
        observation.words.pop();
        let mut policy = FullPartitionRanking::new(
            partition_table(),
            Arc::new(CategoryEmbedder),
            Aggregation::Mean,
        );
        assert!(matches!(
            policy.next_guess(&observation),
            Err(PolicyError::WordCount(15))
        ));
    }
}
