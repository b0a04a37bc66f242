//! Exhaustive enumeration of canonical partitions
//!
//! Each partition is generated exactly once by anchoring: the group holding
//! the smallest unused index is always chosen next. No deduplication pass is
//! needed and the output is already in canonical order.

use super::Partition;
use crate::core::{CATEGORY_COUNT, GROUP_SIZE, WORD_COUNT};
use crate::solver::combinations::IndexGroup;
use rayon::prelude::*;

/// Ways to split 16 items into four unordered groups of four
///
/// 16! / ((4!)^4 * 4!) = C(15,3) * C(11,3) * C(7,3)
pub const PARTITION_COUNT: usize = 2_627_625;

/// Visit every partition of `items` into unordered groups of four
///
/// `items` must be ascending and its length a multiple of four. Groups are
/// passed ascending, ordered by their smallest member.
pub fn for_each_partition(items: &[u8], visit: &mut impl FnMut(&[IndexGroup])) {
    debug_assert!(items.len() % GROUP_SIZE == 0);
    let mut groups = Vec::with_capacity(items.len() / GROUP_SIZE);
    extend(items, &mut groups, visit);
}

fn extend(remaining: &[u8], groups: &mut Vec<IndexGroup>, visit: &mut impl FnMut(&[IndexGroup])) {
    if remaining.is_empty() {
        visit(groups);
        return;
    }

    for group in anchored_groups(remaining) {
        let rest: Vec<u8> = remaining
            .iter()
            .copied()
            .filter(|index| !group.contains(index))
            .collect();
        groups.push(group);
        extend(&rest, groups, visit);
        groups.pop();
    }
}

/// Groups containing the first item plus any three of the others
fn anchored_groups(items: &[u8]) -> Vec<IndexGroup> {
    let Some((&anchor, others)) = items.split_first() else {
        return Vec::new();
    };
    let n = others.len();
    let mut out = Vec::new();
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                out.push([anchor, others[a], others[b], others[c]]);
            }
        }
    }
    out
}

/// Enumerate all partitions of `0..16` in canonical order
///
/// The 455 choices of first group are fanned out across the rayon pool;
/// collection preserves their order.
#[must_use]
pub fn enumerate_partitions() -> Vec<Partition> {
    // WORD_COUNT is 16, so the cast cannot truncate
    let universe: Vec<u8> = (0..WORD_COUNT as u8).collect();

    anchored_groups(&universe)
        .par_iter()
        .flat_map_iter(|first| {
            let rest: Vec<u8> = universe
                .iter()
                .copied()
                .filter(|index| !first.contains(index))
                .collect();
            let mut out = Vec::new();
            for_each_partition(&rest, &mut |groups| {
                let mut all = [*first; CATEGORY_COUNT];
                all[1..].copy_from_slice(groups);
                out.push(Partition::from_canonical(all));
            });
            out
        })
        .collect()
}
