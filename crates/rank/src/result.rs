//! Output types for combination ranking.

use kcs_segments::Combination;

/// One combination kept by the ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    /// Index of the combination in its [`kcs_segments::CombinationSpace`].
    pub index: u64,
    /// Member-per-segment assignment.
    pub combination: Combination,
    /// Recombined mean of the ranking variable.
    pub mean: f64,
    /// Absolute distance `|mean - target|`.
    pub distance: f64,
}

/// Ordered result of a top-K ranking query.
///
/// Candidates are sorted by ascending distance; ties keep lexicographic
/// order of the combinations.
#[derive(Debug, Clone)]
pub struct RankedCandidates {
    candidates: Vec<RankedCandidate>,
    target: f64,
    space_size: u64,
    requested: usize,
}

impl RankedCandidates {
    pub(crate) fn new(
        candidates: Vec<RankedCandidate>,
        target: f64,
        space_size: u64,
        requested: usize,
    ) -> Self {
        Self {
            candidates,
            target,
            space_size,
            requested,
        }
    }

    /// Returns the ranked candidates, closest first.
    pub fn candidates(&self) -> &[RankedCandidate] {
        &self.candidates
    }

    /// Iterates over the ranked combinations, closest first.
    pub fn combinations(&self) -> impl Iterator<Item = &Combination> {
        self.candidates.iter().map(|c| &c.combination)
    }

    /// Consumes the result and returns the combinations, closest first.
    pub fn into_combinations(self) -> Vec<Combination> {
        self.candidates.into_iter().map(|c| c.combination).collect()
    }

    /// Returns the number of kept candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` if nothing was kept.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the target the distances were measured against.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns the size of the searched combination space.
    pub fn space_size(&self) -> u64 {
        self.space_size
    }

    /// Returns the requested `top_k`.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Returns `false` when the space held fewer than `top_k` combinations.
    pub fn top_k_honoured(&self) -> bool {
        self.candidates.len() == self.requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(index: u64, distance: f64) -> RankedCandidate {
        RankedCandidate {
            index,
            combination: Combination::new(vec![index as usize]),
            mean: distance,
            distance,
        }
    }

    #[test]
    fn test_accessors() {
        let r = RankedCandidates::new(vec![candidate(3, 0.1), candidate(1, 0.4)], 2.0, 9, 2);
        assert_eq!(r.len(), 2);
        assert!(!r.is_empty());
        assert_eq!(r.target(), 2.0);
        assert_eq!(r.space_size(), 9);
        assert!(r.top_k_honoured());
        let combos: Vec<_> = r.combinations().cloned().collect();
        assert_eq!(combos, vec![Combination::new(vec![3]), Combination::new(vec![1])]);
    }

    #[test]
    fn test_top_k_not_honoured() {
        let r = RankedCandidates::new(vec![candidate(0, 0.0)], 0.0, 1, 5);
        assert!(!r.top_k_honoured());
        assert_eq!(r.requested(), 5);
        assert_eq!(r.into_combinations(), vec![Combination::new(vec![0])]);
    }
}
