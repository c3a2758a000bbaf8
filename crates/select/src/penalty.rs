//! Segment-reuse penalty of a subset of combinations.

use kcs_segments::Combination;

/// Penalty for one member appearing `count` times at one segment position.
///
/// | count | penalty |
/// |-------|---------|
/// | 0–2 | 0 |
/// | 3 | 1 |
/// | 4 | 5 |
/// | ≥ 5 | 100 |
pub fn count_penalty(count: usize) -> u32 {
    match count {
        0..=2 => 0,
        3 => 1,
        4 => 5,
        _ => 100,
    }
}

/// Total reuse penalty of `subset`: [`count_penalty`] summed over every
/// member at every segment position.
///
/// # Example
///
/// ```
/// use kcs_segments::Combination;
/// use kcs_select::reuse_penalty;
///
/// // Member 0 used 3 times at position 0, all distinct at position 1.
/// let subset: Vec<Combination> = (0..3).map(|i| Combination::new(vec![0, i])).collect();
/// assert_eq!(reuse_penalty(&subset), 1);
/// ```
pub fn reuse_penalty(subset: &[Combination]) -> u32 {
    let refs: Vec<&Combination> = subset.iter().collect();
    let mut column = Vec::with_capacity(refs.len());
    penalty_of(&refs, &mut column)
}

/// Penalty of `subset` using a caller-owned scratch column.
///
/// Members at each position are sorted in `column` and counted in runs, so
/// the cost depends on the subset size only, never on member index values.
pub(crate) fn penalty_of(subset: &[&Combination], column: &mut Vec<usize>) -> u32 {
    let n_positions = subset.first().map_or(0, |c| c.len());
    let mut total = 0;
    for position in 0..n_positions {
        column.clear();
        column.extend(subset.iter().filter_map(|c| c.members().get(position)));
        column.sort_unstable();
        total += column
            .chunk_by(|a, b| a == b)
            .map(|run| count_penalty(run.len()))
            .sum::<u32>();
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `n` copies of `member` at position 0; position 1 filled with
    /// distinct members.
    fn repeated(member: usize, n: usize, total: usize) -> Vec<Combination> {
        (0..total)
            .map(|i| {
                let first = if i < n { member } else { 10 + i };
                Combination::new(vec![first, 20 + i])
            })
            .collect()
    }

    #[test]
    fn test_count_penalty_table() {
        assert_eq!(count_penalty(0), 0);
        assert_eq!(count_penalty(1), 0);
        assert_eq!(count_penalty(2), 0);
        assert_eq!(count_penalty(3), 1);
        assert_eq!(count_penalty(4), 5);
        assert_eq!(count_penalty(5), 100);
        assert_eq!(count_penalty(8), 100);
    }

    #[test]
    fn test_single_member_repeated() {
        assert_eq!(reuse_penalty(&repeated(3, 2, 8)), 0);
        assert_eq!(reuse_penalty(&repeated(3, 3, 8)), 1);
        assert_eq!(reuse_penalty(&repeated(3, 4, 8)), 5);
        assert_eq!(reuse_penalty(&repeated(3, 5, 8)), 100);
    }

    #[test]
    fn test_positions_are_independent() {
        // member 1 three times at position 0 and three times at position 1
        let subset: Vec<Combination> = vec![
            Combination::new(vec![1, 1]),
            Combination::new(vec![1, 1]),
            Combination::new(vec![1, 1]),
            Combination::new(vec![2, 3]),
        ];
        assert_eq!(reuse_penalty(&subset), 2);
    }

    #[test]
    fn test_penalties_add_across_members() {
        // position 0: member 0 x4 (5) + member 1 x4 (5)
        let subset: Vec<Combination> = (0..8)
            .map(|i| Combination::new(vec![i / 4, i]))
            .collect();
        assert_eq!(reuse_penalty(&subset), 10);
    }

    #[test]
    fn test_large_member_indices() {
        let subset = vec![
            Combination::new(vec![usize::MAX, 0]),
            Combination::new(vec![usize::MAX, 1]),
            Combination::new(vec![usize::MAX, 2]),
            Combination::new(vec![u32::MAX as usize, 3]),
        ];
        assert_eq!(reuse_penalty(&subset), 1);
    }

    #[test]
    fn test_empty_subset() {
        assert_eq!(reuse_penalty(&[]), 0);
    }
}
