//! Resumable JSON result files

use super::record::{PlaythroughRecord, RecordKey};
use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A JSON array of records, rewritten after every append
#[derive(Debug)]
pub struct ResultStore {
    path: PathBuf,
    records: Vec<PlaythroughRecord>,
}

impl ResultStore {
    /// Open `path`, starting empty if it does not exist
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read results from {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse results in {}", path.display()))?
        } else {
            Vec::new()
        };

        debug!(path = %path.display(), records = records.len(), "opened result store");
        Ok(Self { path, records })
    }

    /// Keys already present, to be skipped on resume
    #[must_use]
    pub fn completed(&self) -> FxHashSet<RecordKey> {
        self.records.iter().map(PlaythroughRecord::key).collect()
    }

    /// Append a record and persist the whole file
    ///
    /// The file is replaced atomically so an interrupted write never leaves
    /// a truncated array behind.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn append(&mut self, record: PlaythroughRecord) -> Result<()> {
        self.records.push(record);
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }

    #[must_use]
    pub fn records(&self) -> &[PlaythroughRecord] {
        &self.records
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Mode;
    use std::collections::BTreeMap;

    fn record(puzzle_id: u32, seed: Option<u64>) -> PlaythroughRecord {
        PlaythroughRecord {
            solver: "agent".to_string(),
            model: "test-model".to_string(),
            mode: Mode::AllAtOnce,
            chain_of_thought: Some(false),
            puzzle_id,
            seed,
            solved_overall: true,
            solved_at: BTreeMap::new(),
            num_steps: 1,
            num_invalid: 0,
            guesses: Vec::new(),
        }
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::open(dir.path().join("none.json")).unwrap();
        assert!(store.records().is_empty());
        assert!(store.completed().is_empty());
    }

    #[test]
    fn appended_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("agent.json");

        let mut store = ResultStore::open(&path).unwrap();
        store.append(record(1, Some(0))).unwrap();
        store.append(record(1, Some(1))).unwrap();

        let reopened = ResultStore::open(&path).unwrap();
        assert_eq!(reopened.records().len(), 2);
        let completed = reopened.completed();
        assert!(completed.contains(&(1, Some(1))));
        assert!(!completed.contains(&(2, Some(0))));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[{").unwrap();
        assert!(ResultStore::open(&path).is_err());
    }
}
