//! Embedding baseline sweeps

use super::batch::{SweepConfig, SweepOutcome, WorkItem, run_sweep};
use crate::core::PuzzleSet;
use crate::engine::Mode;
use crate::report::ResultStore;
use crate::solver::Policy;
use crate::solver::partition::PartitionTable;
use crate::solver::similarity::{Aggregation, Embedder};
use anyhow::Result;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which embedding baseline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaselineSolver {
    /// Similarity ranking, single-group or full-partition by mode
    #[default]
    Ranking,
    /// Balanced k-means clustering (all-at-once only)
    KMeans,
}

impl BaselineSolver {
    /// Mode used when none is given
    #[must_use]
    pub const fn default_mode(self) -> Mode {
        match self {
            Self::Ranking => Mode::Iterative,
            Self::KMeans => Mode::AllAtOnce,
        }
    }
}

impl FromStr for BaselineSolver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ranking" | "similarity" => Ok(Self::Ranking),
            "kmeans" | "k-means" => Ok(Self::KMeans),
            other => Err(format!(
                "unknown baseline {other:?} (expected ranking or kmeans)"
            )),
        }
    }
}

impl fmt::Display for BaselineSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ranking => f.write_str("ranking"),
            Self::KMeans => f.write_str("kmeans"),
        }
    }
}

/// Baseline choice and how it scores words
pub struct Baseline {
    pub solver: BaselineSolver,
    pub embedder: Arc<dyn Embedder>,
    pub aggregation: Aggregation,
    /// Required for all-at-once ranking
    pub partitions: Option<Arc<PartitionTable>>,
    /// Fixes the word shuffle of every puzzle
    pub seed: Option<u64>,
}

/// Run the baseline once over each of `ids`
///
/// # Errors
/// Returns an error if the sweep cannot run or results cannot be saved.
pub fn run_baseline(
    puzzles: &PuzzleSet,
    ids: &[u32],
    baseline: &Baseline,
    config: &SweepConfig,
    store: &mut ResultStore,
) -> Result<SweepOutcome> {
    let mode = config.game.mode;
    let items: Vec<WorkItem> = ids
        .iter()
        .map(|&puzzle_id| WorkItem {
            puzzle_id,
            seed: baseline.seed,
        })
        .collect();

    run_sweep(puzzles, &items, config, store, |_| match baseline.solver {
        BaselineSolver::Ranking => Policy::similarity(
            mode,
            baseline.embedder.clone(),
            baseline.aggregation,
            baseline.partitions.clone(),
        ),
        BaselineSolver::KMeans => Policy::kmeans(mode, baseline.embedder.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::RunLimits;
    use crate::engine::GameConfig;
    use crate::solver::testing::{CategoryEmbedder, partition_table};

    #[test]
    fn all_at_once_baseline_solves_known_puzzle() {
        let dir = tempfile::tempdir().unwrap();
        let puzzles = PuzzleSet::sample().unwrap();
        let config = SweepConfig {
            game: GameConfig::new(Mode::AllAtOnce, 4),
            limits: RunLimits::default(),
            threads: 1,
            model: "one-hot".to_string(),
            chain_of_thought: None,
        };
        let mut store = ResultStore::open(dir.path().join("baseline.json")).unwrap();

        let baseline = Baseline {
            solver: BaselineSolver::Ranking,
            embedder: Arc::new(CategoryEmbedder),
            aggregation: Aggregation::Mean,
            partitions: Some(partition_table()),
            seed: Some(4),
        };

        let outcome = run_baseline(&puzzles, &[1], &baseline, &config, &mut store).unwrap();

        assert_eq!(outcome.completed, 1);
        let record = &store.records()[0];
        assert!(record.solved_overall);
        assert_eq!(record.solver, "full_partition");
        assert_eq!(record.num_steps, 1);
    }

    #[test]
    fn kmeans_baseline_solves_known_puzzle() {
        let dir = tempfile::tempdir().unwrap();
        let puzzles = PuzzleSet::sample().unwrap();
        let config = SweepConfig {
            game: GameConfig::new(BaselineSolver::KMeans.default_mode(), 500),
            limits: RunLimits::default(),
            threads: 1,
            model: "one-hot".to_string(),
            chain_of_thought: None,
        };
        let mut store = ResultStore::open(dir.path().join("kmeans.json")).unwrap();

        let baseline = Baseline {
            solver: BaselineSolver::KMeans,
            embedder: Arc::new(CategoryEmbedder),
            aggregation: Aggregation::Mean,
            partitions: None,
            seed: Some(2),
        };

        let outcome = run_baseline(&puzzles, &[1], &baseline, &config, &mut store).unwrap();

        assert_eq!(outcome.completed, 1);
        let record = &store.records()[0];
        assert!(record.solved_overall);
        assert_eq!(record.solver, "kmeans");
        assert_eq!(record.num_steps, 1);
    }

    #[test]
    fn solver_names_parse() {
        assert_eq!("kmeans".parse::<BaselineSolver>(), Ok(BaselineSolver::KMeans));
        assert_eq!("Ranking".parse::<BaselineSolver>(), Ok(BaselineSolver::Ranking));
        assert!("dbscan".parse::<BaselineSolver>().is_err());
        assert_eq!(BaselineSolver::KMeans.default_mode(), Mode::AllAtOnce);
    }
}
