//! Memoized group and partition scores
//!
//! A group's score aggregates the similarity of all 16 ordered pairs of its
//! members, self-pairs included. Group scores are cached by their sorted
//! member indices for the lifetime of one puzzle attempt. A partition's score
//! is the sum of its four cached group scores; partitions are not memoized,
//! since full-partition ranking scores each one exactly once per attempt.

use super::embedding::cosine_similarity;
use crate::solver::combinations::IndexGroup;
use crate::solver::partition::Partition;
use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;

/// Reduction applied to a group's pairwise similarities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    #[default]
    Mean,
    Median,
    Min,
    Max,
}

impl Aggregation {
    /// Reduce `values` to one score; empty input scores 0
    #[must_use]
    pub fn apply(self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Self::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    f64::midpoint(sorted[mid - 1], sorted[mid])
                } else {
                    sorted[mid]
                }
            }
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(format!(
                "unknown aggregation {other:?} (expected mean, median, min or max)"
            )),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Min => "min",
            Self::Max => "max",
        };
        f.write_str(name)
    }
}

/// Dense symmetric matrix of pairwise similarities
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute cosine similarities for every ordered pair of vectors
    #[must_use]
    pub fn from_embeddings(vectors: &[Vec<f32>]) -> Self {
        Self::from_fn(vectors.len(), |i, j| cosine_similarity(&vectors[i], &vectors[j]))
    }

    /// Build a matrix from an arbitrary pairwise function
    pub fn from_fn(size: usize, mut similarity: impl FnMut(usize, usize) -> f64) -> Self {
        let mut scores = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                scores.push(similarity(i, j));
            }
        }
        Self { size, scores }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.size + j]
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

/// Per-puzzle memo of group scores
#[derive(Debug, Clone)]
pub struct SimilarityCache {
    matrix: SimilarityMatrix,
    aggregation: Aggregation,
    groups: FxHashMap<IndexGroup, f64>,
}

impl SimilarityCache {
    #[must_use]
    pub fn new(matrix: SimilarityMatrix, aggregation: Aggregation) -> Self {
        Self {
            matrix,
            aggregation,
            groups: FxHashMap::default(),
        }
    }

    /// Score a group without touching the memo
    #[must_use]
    pub fn direct_group_score(&self, group: &IndexGroup) -> f64 {
        let mut pairs = [0.0; 16];
        for (slot, (&i, &j)) in pairs.iter_mut().zip(
            group
                .iter()
                .flat_map(|i| group.iter().map(move |j| (i, j))),
        ) {
            *slot = self.matrix.get(usize::from(i), usize::from(j));
        }
        self.aggregation.apply(&pairs)
    }

    /// Memoized group score, keyed by the sorted member indices
    pub fn group_score(&mut self, group: IndexGroup) -> f64 {
        let mut key = group;
        key.sort_unstable();
        if let Some(&score) = self.groups.get(&key) {
            return score;
        }
        let score = self.direct_group_score(&key);
        self.groups.insert(key, score);
        score
    }

    /// Sum of the partition's memoized group scores
    pub fn partition_score(&mut self, partition: &Partition) -> f64 {
        partition
            .groups()
            .iter()
            .map(|&group| self.group_score(group))
            .sum()
    }

    /// Number of distinct groups scored so far
    #[must_use]
    pub fn cached_groups(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub const fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banded_matrix() -> SimilarityMatrix {
        // Indices in the same block of four are similar
        SimilarityMatrix::from_fn(16, |i, j| {
            if i == j {
                1.0
            } else if i / 4 == j / 4 {
                0.8
            } else {
                ((i * 7 + j * 7) % 10) as f64 / 100.0
            }
        })
    }

    #[test]
    fn aggregation_functions() {
        let values = [1.0, 3.0, 2.0, 10.0];
        assert!((Aggregation::Mean.apply(&values) - 4.0).abs() < 1e-12);
        assert!((Aggregation::Median.apply(&values) - 2.5).abs() < 1e-12);
        assert!((Aggregation::Min.apply(&values) - 1.0).abs() < 1e-12);
        assert!((Aggregation::Max.apply(&values) - 10.0).abs() < 1e-12);
        assert!((Aggregation::Median.apply(&[5.0, 1.0, 3.0]) - 3.0).abs() < 1e-12);
        assert!(Aggregation::Mean.apply(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn aggregation_parses_names() {
        assert_eq!("Mean".parse::<Aggregation>(), Ok(Aggregation::Mean));
        assert_eq!("median".parse::<Aggregation>(), Ok(Aggregation::Median));
        assert!("mode".parse::<Aggregation>().is_err());
    }

    #[test]
    fn group_score_includes_self_pairs() {
        let cache = SimilarityCache::new(banded_matrix(), Aggregation::Mean);
        // 4 self-pairs at 1.0 and 12 within-block pairs at 0.8
        let expected = (4.0 + 12.0 * 0.8) / 16.0;
        assert!((cache.direct_group_score(&[0, 1, 2, 3]) - expected).abs() < 1e-12);
    }

    #[test]
    fn cached_score_matches_direct_and_ignores_order() {
        let mut cache = SimilarityCache::new(banded_matrix(), Aggregation::Mean);

        let direct = cache.direct_group_score(&[2, 5, 9, 14]);
        let first = cache.group_score([14, 2, 9, 5]);
        let second = cache.group_score([5, 9, 14, 2]);

        assert!((first - direct).abs() < 1e-12);
        assert!((second - first).abs() < f64::EPSILON);
        assert_eq!(cache.cached_groups(), 1);
    }

    #[test]
    fn partition_score_sums_groups() {
        let mut cache = SimilarityCache::new(banded_matrix(), Aggregation::Mean);
        let partition = Partition::new([
            [0, 1, 2, 3],
            [4, 5, 6, 7],
            [8, 9, 10, 11],
            [12, 13, 14, 15],
        ])
        .unwrap();

        let expected: f64 = partition
            .groups()
            .iter()
            .map(|g| cache.direct_group_score(g))
            .sum();
        let score = cache.partition_score(&partition);

        assert!((score - expected).abs() < 1e-12);
        assert!((cache.partition_score(&partition) - score).abs() < f64::EPSILON);
        assert_eq!(cache.cached_groups(), 4);

        // Sharing three groups adds only the new one to the memo
        let other = Partition::new([
            [0, 1, 2, 3],
            [4, 5, 6, 7],
            [8, 9, 10, 12],
            [11, 13, 14, 15],
        ])
        .unwrap();
        cache.partition_score(&other);
        assert_eq!(cache.cached_groups(), 6);
    }

    #[test]
    fn matrix_from_embeddings_is_symmetric() {
        let vectors = vec![vec![1.0, 0.0], vec![0.6, 0.8], vec![0.0, 1.0]];
        let matrix = SimilarityMatrix::from_embeddings(&vectors);

        assert_eq!(matrix.size(), 3);
        for i in 0..3 {
            assert!((matrix.get(i, i) - 1.0).abs() < 1e-9);
            for j in 0..3 {
                assert!((matrix.get(i, j) - matrix.get(j, i)).abs() < 1e-12);
            }
        }
    }
}
