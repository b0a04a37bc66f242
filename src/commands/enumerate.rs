//! Offline partition enumeration

use crate::solver::partition::PartitionTable;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What the enumeration produced
pub struct EnumerationResult {
    pub count: usize,
    pub path: PathBuf,
    pub duration: Duration,
}

/// Enumerate every partition and write the table to `path`
///
/// # Errors
/// Returns an error if the table cannot be written.
pub fn run_enumerate(path: &Path) -> Result<EnumerationResult> {
    let start = Instant::now();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Enumerating partitions...");

    let table = PartitionTable::build();

    spinner.set_message(format!("Writing {}...", path.display()));
    table
        .save(path)
        .with_context(|| format!("Failed to save partition table to {}", path.display()))?;
    spinner.finish_and_clear();

    Ok(EnumerationResult {
        count: table.len(),
        path: path.to_path_buf(),
        duration: start.elapsed(),
    })
}
