//! Resumable sweeps of independent playthroughs
//!
//! Every work item gets its own game and policy. Items already present in
//! the result store are skipped, and the store is rewritten after each
//! finished item so an interrupted sweep can pick up where it stopped.

use super::playthrough::{RunError, RunLimits, run_playthrough};
use crate::core::PuzzleSet;
use crate::engine::{GameConfig, PuzzleGame};
use crate::report::{PlaythroughRecord, ResultStore};
use crate::solver::{GuessPolicy, Policy, PolicyError};
use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// One puzzle attempt within a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    pub puzzle_id: u32,
    pub seed: Option<u64>,
}

/// Settings shared by every item of a sweep
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub game: GameConfig,
    pub limits: RunLimits,
    /// Worker threads; 0 lets rayon decide
    pub threads: usize,
    /// Model name written into each record
    pub model: String,
    pub chain_of_thought: Option<bool>,
}

/// Counts reported when a sweep ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration: Duration,
}

/// Result file name for a solver, model and prompting variant
#[must_use]
pub fn results_file_name(solver: &str, model: &str, chain_of_thought: Option<bool>) -> String {
    let model: String = model
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '-' })
        .collect();
    match chain_of_thought {
        Some(cot) => format!("{solver}_{model}_cot-{cot}_results.json"),
        None => format!("{solver}_{model}_results.json"),
    }
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")?
            .progress_chars("█▓▒░"),
    );
    Ok(pb)
}

fn play_item<F>(
    puzzles: &PuzzleSet,
    item: WorkItem,
    config: &SweepConfig,
    make_policy: &F,
) -> Result<PlaythroughRecord, RunError>
where
    F: Fn(WorkItem) -> Result<Policy, PolicyError>,
{
    let puzzle = puzzles.get(item.puzzle_id)?.clone();
    let game_config = item
        .seed
        .map_or(config.game, |seed| config.game.with_seed(seed));
    let mut game = PuzzleGame::new(puzzle, game_config);
    let mut policy = make_policy(item)?;

    let run = run_playthrough(&mut game, &mut policy, config.limits)?;

    Ok(PlaythroughRecord {
        solver: policy.name().to_string(),
        model: config.model.clone(),
        mode: game_config.mode,
        chain_of_thought: config.chain_of_thought,
        puzzle_id: item.puzzle_id,
        seed: item.seed,
        solved_overall: run.solved,
        solved_at: run.solved_at,
        num_steps: run.steps,
        num_invalid: run.invalid,
        guesses: run.guesses,
    })
}

/// Play every pending item on a rayon pool, appending results to `store`
///
/// Items whose playthrough fails are logged and counted; they are not
/// recorded, so a later sweep retries them.
///
/// # Errors
/// Returns an error if the thread pool cannot be built or the store cannot
/// be written.
pub fn run_sweep<F>(
    puzzles: &PuzzleSet,
    items: &[WorkItem],
    config: &SweepConfig,
    store: &mut ResultStore,
    make_policy: F,
) -> Result<SweepOutcome>
where
    F: Fn(WorkItem) -> Result<Policy, PolicyError> + Sync,
{
    let start = Instant::now();
    let done = store.completed();
    let pending: Vec<WorkItem> = items
        .iter()
        .copied()
        .filter(|item| !done.contains(&(item.puzzle_id, item.seed)))
        .collect();
    let skipped = items.len() - pending.len();
    info!(pending = pending.len(), skipped, "starting sweep");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let pb = progress_bar(pending.len())?;
    let store = Mutex::new(store);
    let completed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    pool.install(|| {
        pending.par_iter().try_for_each(|&item| -> Result<()> {
            match play_item(puzzles, item, config, &make_policy) {
                Ok(record) => {
                    let solved = record.solved_overall;
                    store
                        .lock()
                        .map_err(|_| anyhow!("result store lock poisoned"))?
                        .append(record)?;
                    completed.fetch_add(1, Ordering::Relaxed);
                    pb.set_message(format!(
                        "puzzle {} {}",
                        item.puzzle_id,
                        if solved { "solved" } else { "unsolved" }
                    ));
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    warn!(puzzle = item.puzzle_id, seed = ?item.seed, error = %e, "playthrough failed");
                }
            }
            pb.inc(1);
            Ok(())
        })
    })?;
    pb.finish_and_clear();

    Ok(SweepOutcome {
        completed: completed.into_inner(),
        skipped,
        failed: failed.into_inner(),
        duration: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Mode;
    use crate::solver::similarity::Aggregation;
    use crate::solver::testing::CategoryEmbedder;
    use std::sync::Arc;

    fn config() -> SweepConfig {
        SweepConfig {
            game: GameConfig::new(Mode::Iterative, 4),
            limits: RunLimits::default(),
            threads: 2,
            model: "one-hot".to_string(),
            chain_of_thought: None,
        }
    }

    fn similarity(_: WorkItem) -> Result<Policy, PolicyError> {
        Policy::similarity(
            Mode::Iterative,
            Arc::new(CategoryEmbedder),
            Aggregation::Mean,
            None,
        )
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(
            results_file_name("agent", "org/model:v1", Some(true)),
            "agent_org-model-v1_cot-true_results.json"
        );
        assert_eq!(
            results_file_name("single_group", "table", None),
            "single_group_table_results.json"
        );
    }

    #[test]
    fn sweep_records_and_resumes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let puzzles = PuzzleSet::sample().unwrap();
        let items = [
            WorkItem { puzzle_id: 1, seed: Some(0) },
            WorkItem { puzzle_id: 1, seed: Some(1) },
        ];

        let mut store = ResultStore::open(&path).unwrap();
        let first = run_sweep(&puzzles, &items, &config(), &mut store, similarity).unwrap();
        assert_eq!(first.completed, 2);
        assert_eq!(first.failed, 0);
        assert!(store.records().iter().all(|r| r.solved_overall));
        assert!(store.records().iter().all(|r| r.solver == "single_group"));

        let mut reopened = ResultStore::open(&path).unwrap();
        let second = run_sweep(&puzzles, &items, &config(), &mut reopened, similarity).unwrap();
        assert_eq!(second.completed, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(reopened.records().len(), 2);
    }

    #[test]
    fn failures_are_counted_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let puzzles = PuzzleSet::sample().unwrap();
        let items = [WorkItem { puzzle_id: 99, seed: None }];

        let mut store = ResultStore::open(dir.path().join("results.json")).unwrap();
        let outcome = run_sweep(&puzzles, &items, &config(), &mut store, similarity).unwrap();

        assert_eq!(outcome.failed, 1);
        assert!(store.records().is_empty());
    }
}
