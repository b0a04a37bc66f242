//! Size-4 combinations over small index sets

use crate::core::GROUP_SIZE;

/// A group of word indices, ascending
pub type IndexGroup = [u8; GROUP_SIZE];

/// All size-4 combinations of `items`, in lexicographic order of positions
///
/// # Examples
/// ```
/// use connections_eval::solver::combinations4;
///
/// let groups = combinations4(&[0, 1, 2, 3, 4]);
/// assert_eq!(groups.len(), 5);
/// assert_eq!(groups[0], [0, 1, 2, 3]);
/// ```
#[must_use]
pub fn combinations4(items: &[u8]) -> Vec<IndexGroup> {
    let n = items.len();
    let mut out = Vec::with_capacity(binomial(n, GROUP_SIZE));

    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    out.push([items[a], items[b], items[c], items[d]]);
                }
            }
        }
    }

    out
}

/// Binomial coefficient C(n, k)
#[must_use]
pub const fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = if k > n - k { n - k } else { k };
    let mut result = 1;
    let mut i = 0;
    while i < k {
        result = result * (n - i) / (i + 1);
        i += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_binomial() {
        let items: Vec<u8> = (0..16).collect();
        assert_eq!(combinations4(&items).len(), 1820);
        assert_eq!(combinations4(&items[..12]).len(), binomial(12, 4));
        assert_eq!(combinations4(&items[..3]).len(), 0);
    }

    #[test]
    fn groups_are_ascending_when_input_is() {
        let items = [1, 4, 6, 9, 12, 15];
        for group in combinations4(&items) {
            assert!(group.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn binomial_values() {
        assert_eq!(binomial(16, 4), 1820);
        assert_eq!(binomial(15, 3), 455);
        assert_eq!(binomial(4, 4), 1);
        assert_eq!(binomial(3, 4), 0);
    }
}
