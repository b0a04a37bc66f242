//! Language-model agent sweep

use super::batch::{SweepConfig, SweepOutcome, WorkItem, run_sweep};
use crate::core::PuzzleSet;
use crate::provider::ChatModel;
use crate::report::ResultStore;
use crate::solver::Policy;
use crate::solver::agent::AgentOptions;
use anyhow::Result;
use std::sync::Arc;

/// Every puzzle id paired with every seed
#[must_use]
pub fn agent_work_items(ids: &[u32], seeds: &[u64]) -> Vec<WorkItem> {
    ids.iter()
        .flat_map(|&puzzle_id| {
            seeds.iter().map(move |&seed| WorkItem {
                puzzle_id,
                seed: Some(seed),
            })
        })
        .collect()
}

/// Run the agent over `ids` x `seeds`
///
/// The seed is passed to the model and also fixes the word shuffle.
///
/// # Errors
/// Returns an error if the sweep cannot run or results cannot be saved.
pub fn run_agent(
    puzzles: &PuzzleSet,
    ids: &[u32],
    seeds: &[u64],
    model: Arc<dyn ChatModel>,
    options: &AgentOptions,
    config: &SweepConfig,
    store: &mut ResultStore,
) -> Result<SweepOutcome> {
    let mode = config.game.mode;
    let items = agent_work_items(ids, seeds);

    run_sweep(puzzles, &items, config, store, |item| {
        Ok(Policy::agent(mode, model.clone(), options.clone(), item.seed))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::RunLimits;
    use crate::engine::{GameConfig, Mode};
    use crate::solver::testing::ScriptedModel;

    #[test]
    fn work_items_cover_ids_and_seeds() {
        let items = agent_work_items(&[3, 5], &[0, 1, 2]);
        assert_eq!(items.len(), 6);
        assert_eq!(items[4], WorkItem { puzzle_id: 5, seed: Some(1) });
    }

    #[test]
    fn agent_sweep_records_chain_of_thought_flag() {
        let dir = tempfile::tempdir().unwrap();
        let puzzles = PuzzleSet::sample().unwrap();
        let reply = "<ANSWER>\n[Shift, Tab, Return, Option]\n[Kayak, Level, Racecar, Madam]\n\
                     [Bridge, Hearts, Poker, Rummy]\n[Basket, Foot, Snow, Eye]\n</ANSWER>";
        let model = Arc::new(ScriptedModel::new(vec![reply]));
        let config = SweepConfig {
            game: GameConfig::new(Mode::AllAtOnce, 5),
            limits: RunLimits::default(),
            threads: 1,
            model: "scripted".to_string(),
            chain_of_thought: Some(true),
        };
        let mut options = AgentOptions::new("scripted");
        options.chain_of_thought = true;
        let mut store = ResultStore::open(dir.path().join("agent.json")).unwrap();

        let outcome =
            run_agent(&puzzles, &[2], &[42], model, &options, &config, &mut store).unwrap();

        assert_eq!(outcome.completed, 1);
        let record = &store.records()[0];
        assert!(record.solved_overall);
        assert_eq!(record.chain_of_thought, Some(true));
        assert_eq!(record.seed, Some(42));
        assert_eq!(record.solver, "agent");
    }
}
