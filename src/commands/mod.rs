//! Command implementations

pub mod agent;
pub mod baseline;
pub mod batch;
pub mod enumerate;
pub mod play;
pub mod playthrough;

pub use agent::{agent_work_items, run_agent};
pub use baseline::{Baseline, BaselineSolver, run_baseline};
pub use batch::{SweepConfig, SweepOutcome, WorkItem, results_file_name, run_sweep};
pub use enumerate::{EnumerationResult, run_enumerate};
pub use play::{parse_input, run_play};
pub use playthrough::{Playthrough, RunError, RunLimits, run_playthrough};
