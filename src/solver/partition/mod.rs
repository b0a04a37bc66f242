//! Partitions of the 16 word indices into four unordered groups of four

mod enumerator;
mod store;

pub use enumerator::{PARTITION_COUNT, enumerate_partitions, for_each_partition};
pub use store::{PartitionTable, StoreError};

use crate::core::{CATEGORY_COUNT, GROUP_SIZE, WORD_COUNT};
use crate::solver::combinations::IndexGroup;

/// Groups that do not form a partition of `0..16`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    #[error("index {0} is outside the 16-word universe")]
    OutOfRange(u8),

    #[error("index {0} appears more than once")]
    Duplicate(u8),
}

/// A canonical partition: members ascending within each group, groups in
/// lexicographic order
///
/// Two partitions that differ only by group or member order compare equal
/// once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Partition([IndexGroup; CATEGORY_COUNT]);

impl Partition {
    /// Canonicalize and validate four groups
    ///
    /// # Errors
    /// Returns `PartitionError` unless the groups cover `0..16` exactly once.
    pub fn new(groups: [IndexGroup; CATEGORY_COUNT]) -> Result<Self, PartitionError> {
        let mut seen = [false; WORD_COUNT];
        for &index in groups.iter().flatten() {
            let slot = seen
                .get_mut(usize::from(index))
                .ok_or(PartitionError::OutOfRange(index))?;
            if *slot {
                return Err(PartitionError::Duplicate(index));
            }
            *slot = true;
        }

        let mut groups = groups;
        for group in &mut groups {
            group.sort_unstable();
        }
        groups.sort_unstable();
        Ok(Self(groups))
    }

    /// Wrap groups already known to be a canonical partition
    pub(crate) const fn from_canonical(groups: [IndexGroup; CATEGORY_COUNT]) -> Self {
        Self(groups)
    }

    #[inline]
    #[must_use]
    pub const fn groups(&self) -> &[IndexGroup; CATEGORY_COUNT] {
        &self.0
    }

    /// Pack the 16 indices into nibbles, group-major
    #[must_use]
    pub fn pack(&self) -> u64 {
        self.0
            .iter()
            .flatten()
            .enumerate()
            .fold(0, |acc, (slot, &index)| acc | (u64::from(index) << (slot * 4)))
    }

    /// Inverse of [`Partition::pack`], re-validated
    ///
    /// # Errors
    /// Returns `PartitionError` if the nibbles do not form a partition.
    pub fn unpack(packed: u64) -> Result<Self, PartitionError> {
        let mut groups = [[0u8; GROUP_SIZE]; CATEGORY_COUNT];
        for (slot, index) in groups.iter_mut().flatten().enumerate() {
            // Masked to four bits, so the cast is lossless
            *index = ((packed >> (slot * 4)) & 0xF) as u8;
        }
        Self::new(groups)
    }
}
