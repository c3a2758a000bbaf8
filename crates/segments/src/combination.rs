//! Combinations of ensemble members over segment positions.

use std::fmt;

use serde::Serialize;

use crate::error::SegmentsError;

/// One synthetic recombined series: `members()[s]` is the ensemble member
/// supplying segment `s`.
///
/// Combinations are plain values. The same member may appear at several
/// positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Combination(Vec<usize>);

impl Combination {
    /// Wraps a member-per-segment assignment vector.
    pub fn new(members: Vec<usize>) -> Self {
        Self(members)
    }

    /// Returns the member index for each segment position.
    pub fn members(&self) -> &[usize] {
        &self.0
    }

    /// Returns the number of segment positions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the combination has no positions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the combination and returns the assignment vector.
    pub fn into_members(self) -> Vec<usize> {
        self.0
    }
}

impl From<Vec<usize>> for Combination {
    fn from(members: Vec<usize>) -> Self {
        Self(members)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

/// The Cartesian space of all combinations for `n_members` and `n_segments`.
///
/// Each combination has a unique index in `[0, size)`. Segment 0 is the most
/// significant base-`n_members` digit, so index order is the lexicographic
/// order of the assignment vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinationSpace {
    n_members: usize,
    n_segments: usize,
    size: u64,
}

impl CombinationSpace {
    /// Creates the space, checking that its size fits in a `u64`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SegmentsError::InvalidDimensions`] | zero members or segments |
    /// | [`SegmentsError::SpaceOverflow`] | `n_members ^ n_segments > u64::MAX` |
    pub fn new(n_members: usize, n_segments: usize) -> Result<Self, SegmentsError> {
        if n_members == 0 || n_segments == 0 {
            return Err(SegmentsError::InvalidDimensions {
                n_members,
                n_segments,
            });
        }
        let overflow = SegmentsError::SpaceOverflow {
            n_members,
            n_segments,
        };
        let exp = u32::try_from(n_segments).map_err(|_| overflow.clone())?;
        let size = (n_members as u64).checked_pow(exp).ok_or(overflow)?;
        Ok(Self {
            n_members,
            n_segments,
            size,
        })
    }

    /// Returns the number of ensemble members.
    pub fn n_members(&self) -> usize {
        self.n_members
    }

    /// Returns the number of segment positions.
    pub fn n_segments(&self) -> usize {
        self.n_segments
    }

    /// Returns the number of combinations, `n_members ^ n_segments`.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Writes the combination at `index` into `out` without allocating.
    ///
    /// Debug-asserts `index < size` and `out.len() == n_segments`.
    pub fn decode_into(&self, mut index: u64, out: &mut [usize]) {
        debug_assert!(index < self.size);
        debug_assert_eq!(out.len(), self.n_segments);
        let base = self.n_members as u64;
        for slot in out.iter_mut().rev() {
            *slot = (index % base) as usize;
            index /= base;
        }
    }

    /// Returns the combination at `index`.
    pub fn decode(&self, index: u64) -> Combination {
        let mut members = vec![0; self.n_segments];
        self.decode_into(index, &mut members);
        Combination(members)
    }

    /// Checks that `combination` has `n_segments` entries, each `< n_members`.
    pub fn check(&self, combination: &Combination) -> Result<(), SegmentsError> {
        if combination.len() != self.n_segments {
            return Err(SegmentsError::LengthMismatch {
                expected: self.n_segments,
                got: combination.len(),
            });
        }
        if let Some(&member) = combination.members().iter().find(|&&m| m >= self.n_members) {
            return Err(SegmentsError::MemberOutOfRange {
                member,
                n_members: self.n_members,
            });
        }
        Ok(())
    }

    /// Iterates over every combination in index order.
    pub fn iter(&self) -> impl Iterator<Item = Combination> + '_ {
        (0..self.size).map(|i| self.decode(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_with_dash() {
        let c = Combination::new(vec![1, 3, 4, 1, 6, 7]);
        assert_eq!(c.to_string(), "1-3-4-1-6-7");
    }

    #[test]
    fn space_size() {
        assert_eq!(CombinationSpace::new(8, 6).unwrap().size(), 262_144);
        assert_eq!(CombinationSpace::new(3, 2).unwrap().size(), 9);
        assert_eq!(CombinationSpace::new(1, 6).unwrap().size(), 1);
    }

    #[test]
    fn space_rejects_zero_dimensions() {
        assert!(matches!(
            CombinationSpace::new(0, 6),
            Err(SegmentsError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            CombinationSpace::new(8, 0),
            Err(SegmentsError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn space_overflow() {
        assert!(matches!(
            CombinationSpace::new(100, 20),
            Err(SegmentsError::SpaceOverflow {
                n_members: 100,
                n_segments: 20
            })
        ));
    }

    #[test]
    fn decode_is_lexicographic() {
        let space = CombinationSpace::new(3, 2).unwrap();
        let all: Vec<Vec<usize>> = space.iter().map(Combination::into_members).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
                vec![2, 0],
                vec![2, 1],
                vec![2, 2],
            ]
        );
    }

    #[test]
    fn decode_digits_are_base_n_members() {
        let space = CombinationSpace::new(4, 3).unwrap();
        // 27 = 1*16 + 2*4 + 3
        assert_eq!(space.decode(27).into_members(), vec![1, 2, 3]);
        assert_eq!(space.decode(63).into_members(), vec![3, 3, 3]);
    }

    #[test]
    fn check_rejects_bad_combinations() {
        let space = CombinationSpace::new(3, 2).unwrap();
        assert!(matches!(
            space.check(&Combination::new(vec![0, 1, 2])),
            Err(SegmentsError::LengthMismatch {
                expected: 2,
                got: 3
            })
        ));
        assert!(matches!(
            space.check(&Combination::new(vec![0, 3])),
            Err(SegmentsError::MemberOutOfRange {
                member: 3,
                n_members: 3
            })
        ));
    }

    #[test]
    fn ordering_matches_index_order() {
        let space = CombinationSpace::new(5, 3).unwrap();
        let a = space.decode(17);
        let b = space.decode(18);
        assert!(a < b);
    }
}
