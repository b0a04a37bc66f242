//! Guess policies
//!
//! Defines the `GuessPolicy` trait and the enum used to pick a concrete
//! policy at runtime, selected by play mode at construction.

use super::agent::{AgentOptions, AgentPolicy};
use super::clustering::KMeansClustering;
use super::partition::PartitionTable;
use super::ranking::{FullPartitionRanking, SingleGroupRanking};
use super::similarity::{Aggregation, Embedder, EmbeddingError};
use crate::engine::{Guess, Mode, Observation};
use crate::provider::{ChatModel, ProviderError};
use std::sync::Arc;

/// Failures while choosing a guess
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{policy} cannot play in {mode} mode")]
    ModeMismatch { policy: &'static str, mode: Mode },

    #[error("word {0} was not part of the puzzle when the policy first saw it")]
    UnknownWord(String),

    #[error("full-partition ranking needs exactly 16 words, got {0}")]
    WordCount(usize),

    #[error("all-at-once similarity ranking needs a partition table")]
    MissingPartitionTable,

    #[error("clustering failed: {0}")]
    Clustering(String),
}

/// Proposes the next guess from an observation
///
/// One instance serves one puzzle attempt; any caches it keeps are scoped to
/// that attempt.
pub trait GuessPolicy {
    /// Short identifier recorded with results
    fn name(&self) -> &'static str;

    /// Choose the next guess
    ///
    /// Returns `Ok(None)` when the policy has no unguessed candidate left.
    ///
    /// # Errors
    /// Returns `PolicyError` if an external provider fails or the observation
    /// does not fit the policy.
    fn next_guess(&mut self, observation: &Observation) -> Result<Option<Guess>, PolicyError>;
}

/// Every policy, with static dispatch
pub enum Policy {
    /// Best-scoring unguessed group of the remaining words
    SingleGroup(SingleGroupRanking),
    /// Best-scoring unguessed partition of all 16 words
    FullPartition(FullPartitionRanking),
    /// One balanced k-means partition of all 16 words
    KMeans(KMeansClustering),
    /// Guesses produced by a language model
    Agent(AgentPolicy),
}

impl GuessPolicy for Policy {
    fn name(&self) -> &'static str {
        match self {
            Self::SingleGroup(p) => p.name(),
            Self::FullPartition(p) => p.name(),
            Self::KMeans(p) => p.name(),
            Self::Agent(p) => p.name(),
        }
    }

    fn next_guess(&mut self, observation: &Observation) -> Result<Option<Guess>, PolicyError> {
        match self {
            Self::SingleGroup(p) => p.next_guess(observation),
            Self::FullPartition(p) => p.next_guess(observation),
            Self::KMeans(p) => p.next_guess(observation),
            Self::Agent(p) => p.next_guess(observation),
        }
    }
}

impl Policy {
    /// Similarity ranking for `mode`
    ///
    /// # Errors
    /// Returns `PolicyError::MissingPartitionTable` for all-at-once mode
    /// without a table.
    pub fn similarity(
        mode: Mode,
        embedder: Arc<dyn Embedder>,
        aggregation: Aggregation,
        partitions: Option<Arc<PartitionTable>>,
    ) -> Result<Self, PolicyError> {
        match mode {
            Mode::Iterative => Ok(Self::SingleGroup(SingleGroupRanking::new(
                embedder,
                aggregation,
            ))),
            Mode::AllAtOnce => {
                let table = partitions.ok_or(PolicyError::MissingPartitionTable)?;
                Ok(Self::FullPartition(FullPartitionRanking::new(
                    table,
                    embedder,
                    aggregation,
                )))
            }
        }
    }

    /// K-means clustering, which only plays all-at-once
    ///
    /// # Errors
    /// Returns `PolicyError::ModeMismatch` for iterative mode.
    pub fn kmeans(mode: Mode, embedder: Arc<dyn Embedder>) -> Result<Self, PolicyError> {
        match mode {
            Mode::AllAtOnce => Ok(Self::KMeans(KMeansClustering::new(embedder))),
            Mode::Iterative => Err(PolicyError::ModeMismatch {
                policy: "kmeans",
                mode,
            }),
        }
    }

    /// Language-model agent for `mode`
    #[must_use]
    pub fn agent(
        mode: Mode,
        model: Arc<dyn ChatModel>,
        options: AgentOptions,
        seed: Option<u64>,
    ) -> Self {
        Self::Agent(AgentPolicy::new(model, mode, options, seed))
    }
}
