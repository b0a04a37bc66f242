//! K-means clustering baseline for all-at-once play
//!
//! Clusters the 16 word embeddings into four groups, then forces equal-size
//! groups by assigning every word to one of four slots per centroid with a
//! minimum-cost matching on Euclidean distance.

use super::policy::{GuessPolicy, PolicyError};
use super::similarity::{Embedder, EmbeddingError};
use crate::core::{CATEGORY_COUNT, GROUP_SIZE, WORD_COUNT};
use crate::engine::{Guess, Mode, Observation};
use linfa::DatasetBase;
use linfa::traits::Fit;
use linfa_clustering::KMeans;
use ndarray::Array2;
use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;
use std::sync::Arc;
use tracing::debug;

/// Integer resolution of distances fed to the matching
const DISTANCE_SCALE: f64 = 1e9;

/// Submits one balanced k-means partition
///
/// The clustering is computed on the first observation and replayed on every
/// later call, so the guess never changes within an attempt.
pub struct KMeansClustering {
    embedder: Arc<dyn Embedder>,
    guess: Option<Guess>,
}

impl KMeansClustering {
    #[must_use]
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            guess: None,
        }
    }

    fn cluster(&self, observation: &Observation) -> Result<Guess, PolicyError> {
        let words = &observation.words;
        if words.len() != WORD_COUNT {
            return Err(PolicyError::WordCount(words.len()));
        }
        let vectors = self.embedder.embed(words)?;
        if vectors.len() != words.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: words.len(),
                got: vectors.len(),
            }
            .into());
        }

        let centroids = fit_centroids(&vectors)?;
        let labels = balanced_labels(&vectors, &centroids)?;
        debug!(clusters = centroids.len(), "fitted k-means partition");

        let mut groups = vec![Vec::with_capacity(GROUP_SIZE); CATEGORY_COUNT];
        for (word, &label) in words.iter().zip(&labels) {
            groups[label].push(word.text().to_string());
        }
        Ok(Guess::Partition(groups))
    }
}

/// Fit four centroids to the embeddings
fn fit_centroids(vectors: &[Vec<f32>]) -> Result<Vec<Vec<f64>>, PolicyError> {
    let dim = vectors.first().map_or(0, Vec::len);
    if dim == 0 || vectors.iter().any(|v| v.len() != dim) {
        return Err(PolicyError::Clustering(
            "embeddings must be non-empty and of equal length".to_string(),
        ));
    }

    let flat: Vec<f64> = vectors
        .iter()
        .flat_map(|v| v.iter().map(|&x| f64::from(x)))
        .collect();
    let records = Array2::from_shape_vec((vectors.len(), dim), flat)
        .map_err(|e| PolicyError::Clustering(e.to_string()))?;
    let dataset = DatasetBase::from(records);

    let model = KMeans::params(CATEGORY_COUNT)
        .fit(&dataset)
        .map_err(|e| PolicyError::Clustering(e.to_string()))?;

    Ok(model
        .centroids()
        .rows()
        .into_iter()
        .map(|row| row.to_vec())
        .collect())
}

/// Cluster label per point, with exactly `GROUP_SIZE` points per centroid
///
/// Each centroid offers `GROUP_SIZE` slots; points are matched to slots at
/// minimum total distance.
fn balanced_labels(
    vectors: &[Vec<f32>],
    centroids: &[Vec<f64>],
) -> Result<Vec<usize>, PolicyError> {
    if vectors.len() != centroids.len() * GROUP_SIZE {
        return Err(PolicyError::Clustering(format!(
            "{} points cannot fill {} clusters of {GROUP_SIZE}",
            vectors.len(),
            centroids.len()
        )));
    }

    let costs: Vec<i64> = vectors
        .iter()
        .flat_map(|point| {
            centroids.iter().flat_map(move |centroid| {
                let cost = (euclidean(point, centroid) * DISTANCE_SCALE).round() as i64;
                std::iter::repeat_n(cost, GROUP_SIZE)
            })
        })
        .collect();
    let weights = Matrix::from_vec(vectors.len(), vectors.len(), costs)
        .map_err(|e| PolicyError::Clustering(e.to_string()))?;

    let (_, slots) = kuhn_munkres_min(&weights);
    Ok(slots.into_iter().map(|slot| slot / GROUP_SIZE).collect())
}

fn euclidean(point: &[f32], centroid: &[f64]) -> f64 {
    point
        .iter()
        .zip(centroid)
        .map(|(&x, &c)| (f64::from(x) - c).powi(2))
        .sum::<f64>()
        .sqrt()
}

impl GuessPolicy for KMeansClustering {
    fn name(&self) -> &'static str {
        "kmeans"
    }

    fn next_guess(&mut self, observation: &Observation) -> Result<Option<Guess>, PolicyError> {
        if observation.mode != Mode::AllAtOnce {
            return Err(PolicyError::ModeMismatch {
                policy: self.name(),
                mode: observation.mode,
            });
        }
        if let Some(guess) = &self.guess {
            return Ok(Some(guess.clone()));
        }
        let guess = self.cluster(observation)?;
        Ok(Some(self.guess.insert(guess).clone()))
    }
}
