//! Persisted partition table
//!
//! Layout: magic `CXP1`, `u32` little-endian count, then one little-endian
//! `u64` per partition as produced by [`Partition::pack`].

use super::{PARTITION_COUNT, Partition, PartitionError, enumerate_partitions};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

const MAGIC: &[u8; 4] = b"CXP1";
const HEADER_LEN: usize = 8;

/// Failures reading or writing the partition table
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("partition table I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("not a partition table (bad magic)")]
    BadMagic,

    #[error("partition table truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("partition {index} is corrupt: {source}")]
    Corrupt {
        index: usize,
        #[source]
        source: PartitionError,
    },
}

/// Every partition of 16 indices, in canonical order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTable {
    partitions: Vec<Partition>,
}

impl PartitionTable {
    /// Enumerate the table in memory
    #[must_use]
    pub fn build() -> Self {
        let partitions = enumerate_partitions();
        debug!(count = partitions.len(), "enumerated partitions");
        Self { partitions }
    }

    #[must_use]
    pub const fn from_partitions(partitions: Vec<Partition>) -> Self {
        Self { partitions }
    }

    /// Write the table to `path`
    ///
    /// # Errors
    /// Returns `StoreError::Io` on write failure.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let count = u32::try_from(self.partitions.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many partitions"))?;

        let mut writer = BufWriter::new(fs::File::create(path)?);
        writer.write_all(MAGIC)?;
        writer.write_all(&count.to_le_bytes())?;
        for partition in &self.partitions {
            writer.write_all(&partition.pack().to_le_bytes())?;
        }
        writer.flush()?;

        info!(path = %path.display(), count, "saved partition table");
        Ok(())
    }

    /// Read and validate a table from `path`
    ///
    /// # Errors
    /// Returns `StoreError` if the file is unreadable, has the wrong magic,
    /// is shorter than its header claims, or holds an invalid partition.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let bytes = fs::read(path.as_ref())?;
        let table = Self::decode(&bytes)?;
        debug!(path = %path.as_ref().display(), count = table.len(), "loaded partition table");
        Ok(table)
    }

    fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.len() < HEADER_LEN {
            return Err(StoreError::Truncated {
                expected: HEADER_LEN,
                found: bytes.len(),
            });
        }
        let (header, body) = bytes.split_at(HEADER_LEN);
        if &header[..4] != MAGIC {
            return Err(StoreError::BadMagic);
        }

        let mut count_bytes = [0u8; 4];
        count_bytes.copy_from_slice(&header[4..]);
        let count = u32::from_le_bytes(count_bytes) as usize;

        let expected = HEADER_LEN + count * 8;
        if bytes.len() < expected {
            return Err(StoreError::Truncated {
                expected,
                found: bytes.len(),
            });
        }

        let partitions = body
            .chunks_exact(8)
            .take(count)
            .enumerate()
            .map(|(index, chunk)| {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                Partition::unpack(u64::from_le_bytes(word))
                    .map_err(|source| StoreError::Corrupt { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { partitions })
    }

    /// Load the table, building and saving it first if `path` is missing
    ///
    /// # Errors
    /// Returns `StoreError` if an existing file is invalid or the new file
    /// cannot be written.
    pub fn load_or_build<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        info!(path = %path.display(), "partition table missing, building");
        let table = Self::build();
        table.save(path)?;
        Ok(table)
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Partition] {
        &self.partitions
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// True when the table holds the full enumeration
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.partitions.len() == PARTITION_COUNT
    }
}
