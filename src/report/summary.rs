//! Aggregate statistics over a result file

use super::record::PlaythroughRecord;
use crate::core::Difficulty;
use std::collections::BTreeMap;

/// Solve rate and mean solved-at for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DifficultyStats {
    pub solved: usize,
    pub solve_rate: f64,
    /// `None` when no category of this difficulty was solved
    pub mean_solved_at: Option<f64>,
}

/// Totals across many playthroughs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub total: usize,
    pub solved: usize,
    pub solve_rate: f64,
    pub by_difficulty: BTreeMap<Difficulty, DifficultyStats>,
    pub mean_steps: f64,
    pub mean_invalid: f64,
}

fn mean(sum: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

impl Summary {
    #[must_use]
    pub fn from_records(records: &[PlaythroughRecord]) -> Self {
        let total = records.len();
        let solved = records.iter().filter(|r| r.solved_overall).count();

        let by_difficulty = Difficulty::ALL
            .into_iter()
            .map(|difficulty| {
                let at: Vec<usize> = records
                    .iter()
                    .filter_map(|r| r.solved_at.get(&difficulty).copied())
                    .collect();
                let stats = DifficultyStats {
                    solved: at.len(),
                    solve_rate: mean(at.len(), total),
                    mean_solved_at: (!at.is_empty())
                        .then(|| mean(at.iter().sum(), at.len())),
                };
                (difficulty, stats)
            })
            .collect();

        Self {
            total,
            solved,
            solve_rate: mean(solved, total),
            by_difficulty,
            mean_steps: mean(records.iter().map(|r| r.num_steps).sum(), total),
            mean_invalid: mean(records.iter().map(|r| r.num_invalid).sum(), total),
        }
    }
}
