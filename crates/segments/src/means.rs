//! Seasonal-mean lookup tables per ensemble member and segment.

use crate::combination::{Combination, CombinationSpace};
use crate::error::SegmentsError;
use crate::season::{Season, Variable};

const N_SEASONS: usize = Season::ALL.len();
const N_VARIABLES: usize = Variable::ALL.len();

/// Immutable table of seasonal means keyed by
/// `(member, segment, season, variable)` for one period.
///
/// Built once with [`SegmentMeansBuilder`]; never mutated afterwards.
/// Entries that were not supplied are reported as
/// [`SegmentsError::MissingValue`] by [`SegmentMeans::grid`].
///
/// # Example
///
/// ```
/// use kcs_segments::{Season, SegmentMeans, Variable};
///
/// let mut builder = SegmentMeans::builder(2, 3).unwrap();
/// for member in 0..2 {
///     for segment in 0..3 {
///         builder
///             .insert(member, segment, Season::Djf, Variable::Pr, 2.0 + member as f64)
///             .unwrap();
///     }
/// }
/// let means = builder.build();
/// let grid = means.grid(Season::Djf, Variable::Pr).unwrap();
/// assert_eq!(grid.value(1, 2), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct SegmentMeans {
    n_members: usize,
    n_segments: usize,
    /// Flat `[member][segment][season][variable]`; NaN marks a missing entry.
    values: Vec<f64>,
}

impl SegmentMeans {
    /// Starts a builder for a table of `n_members × n_segments`.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentsError::InvalidDimensions`] if either dimension is 0,
    /// or [`SegmentsError::TableTooLarge`] if the entry count overflows.
    pub fn builder(n_members: usize, n_segments: usize) -> Result<SegmentMeansBuilder, SegmentsError> {
        let n_cells = checked_cells(n_members, n_segments)?;
        let len = n_cells
            .checked_mul(N_SEASONS * N_VARIABLES)
            .ok_or(SegmentsError::TableTooLarge {
                n_members,
                n_segments,
            })?;
        Ok(SegmentMeansBuilder {
            table: SegmentMeans {
                n_members,
                n_segments,
                values: vec![f64::NAN; len],
            },
        })
    }

    /// Builds a complete table by evaluating `f(member, segment, season, variable)`
    /// for every key.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentsError::InvalidDimensions`] or
    /// [`SegmentsError::NonFiniteValue`].
    pub fn from_fn<F>(n_members: usize, n_segments: usize, mut f: F) -> Result<Self, SegmentsError>
    where
        F: FnMut(usize, usize, Season, Variable) -> f64,
    {
        let mut builder = Self::builder(n_members, n_segments)?;
        for member in 0..n_members {
            for segment in 0..n_segments {
                for season in Season::ALL {
                    for variable in Variable::ALL {
                        let value = f(member, segment, season, variable);
                        builder.insert(member, segment, season, variable, value)?;
                    }
                }
            }
        }
        Ok(builder.build())
    }

    /// Returns the number of ensemble members.
    pub fn n_members(&self) -> usize {
        self.n_members
    }

    /// Returns the number of segments.
    pub fn n_segments(&self) -> usize {
        self.n_segments
    }

    /// Returns the combination space spanned by this table.
    pub fn space(&self) -> Result<CombinationSpace, SegmentsError> {
        CombinationSpace::new(self.n_members, self.n_segments)
    }

    /// Returns a single entry, or `None` if it was never supplied or is out
    /// of range.
    pub fn get(&self, member: usize, segment: usize, season: Season, variable: Variable) -> Option<f64> {
        if member >= self.n_members || segment >= self.n_segments {
            return None;
        }
        let v = self.values[flat_index(self.n_segments, member, segment, season, variable)];
        (!v.is_nan()).then_some(v)
    }

    /// Extracts the dense `n_members × n_segments` grid for one season and
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentsError::MissingValue`] for the first absent entry.
    pub fn grid(&self, season: Season, variable: Variable) -> Result<MeanGrid, SegmentsError> {
        let mut values = Vec::with_capacity(self.n_members * self.n_segments);
        for member in 0..self.n_members {
            for segment in 0..self.n_segments {
                let v = self
                    .get(member, segment, season, variable)
                    .ok_or(SegmentsError::MissingValue {
                        member,
                        segment,
                        season,
                        variable,
                    })?;
                values.push(v);
            }
        }
        Ok(MeanGrid {
            n_members: self.n_members,
            n_segments: self.n_segments,
            values,
        })
    }
}

/// Number of `(member, segment)` cells, checked for zero and overflow.
fn checked_cells(n_members: usize, n_segments: usize) -> Result<usize, SegmentsError> {
    if n_members == 0 || n_segments == 0 {
        return Err(SegmentsError::InvalidDimensions {
            n_members,
            n_segments,
        });
    }
    n_members
        .checked_mul(n_segments)
        .ok_or(SegmentsError::TableTooLarge {
            n_members,
            n_segments,
        })
}

fn flat_index(n_segments: usize, member: usize, segment: usize, season: Season, variable: Variable) -> usize {
    ((member * n_segments + segment) * N_SEASONS + season.index()) * N_VARIABLES + variable.index()
}

/// Incremental builder for [`SegmentMeans`].
#[derive(Debug, Clone)]
pub struct SegmentMeansBuilder {
    table: SegmentMeans,
}

impl SegmentMeansBuilder {
    /// Sets one entry. Later inserts for the same key overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SegmentsError::MemberOutOfRange`] | `member >= n_members` |
    /// | [`SegmentsError::SegmentOutOfRange`] | `segment >= n_segments` |
    /// | [`SegmentsError::NonFiniteValue`] | `value` is NaN or infinite |
    pub fn insert(
        &mut self,
        member: usize,
        segment: usize,
        season: Season,
        variable: Variable,
        value: f64,
    ) -> Result<&mut Self, SegmentsError> {
        let t = &mut self.table;
        if member >= t.n_members {
            return Err(SegmentsError::MemberOutOfRange {
                member,
                n_members: t.n_members,
            });
        }
        if segment >= t.n_segments {
            return Err(SegmentsError::SegmentOutOfRange {
                segment,
                n_segments: t.n_segments,
            });
        }
        if !value.is_finite() {
            return Err(SegmentsError::NonFiniteValue {
                member,
                segment,
                season,
                variable,
            });
        }
        t.values[flat_index(t.n_segments, member, segment, season, variable)] = value;
        Ok(self)
    }

    /// Freezes the table.
    pub fn build(self) -> SegmentMeans {
        self.table
    }
}

/// Dense member-major grid of one season/variable slice of a [`SegmentMeans`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeanGrid {
    n_members: usize,
    n_segments: usize,
    values: Vec<f64>,
}

impl MeanGrid {
    /// Creates a grid from member-major values (`values[member * n_segments + segment]`).
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SegmentsError::InvalidDimensions`] | zero members or segments |
    /// | [`SegmentsError::TableTooLarge`] | `n_members * n_segments` overflows |
    /// | [`SegmentsError::GridShapeMismatch`] | `values.len() != n_members * n_segments` |
    /// | [`SegmentsError::NonFiniteGridValue`] | any value is NaN or infinite |
    pub fn new(n_members: usize, n_segments: usize, values: Vec<f64>) -> Result<Self, SegmentsError> {
        let expected = checked_cells(n_members, n_segments)?;
        if values.len() != expected {
            return Err(SegmentsError::GridShapeMismatch {
                expected,
                got: values.len(),
            });
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(SegmentsError::NonFiniteGridValue {
                member: pos / n_segments,
                segment: pos % n_segments,
            });
        }
        Ok(Self {
            n_members,
            n_segments,
            values,
        })
    }

    /// Returns the number of ensemble members.
    pub fn n_members(&self) -> usize {
        self.n_members
    }

    /// Returns the number of segments.
    pub fn n_segments(&self) -> usize {
        self.n_segments
    }

    /// Returns the mean for one member and segment.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn value(&self, member: usize, segment: usize) -> f64 {
        assert!(member < self.n_members && segment < self.n_segments);
        self.values[member * self.n_segments + segment]
    }

    /// Mean over all members and segments.
    ///
    /// Equal to the average recombined mean over the whole combination space.
    pub fn overall_mean(&self) -> f64 {
        kcs_stats::mean(&self.values)
    }

    /// Mean over segments of the member chosen for each segment.
    ///
    /// Debug-asserts that `members.len() == n_segments`; members must be
    /// `< n_members`.
    pub fn recombined_mean(&self, members: &[usize]) -> f64 {
        debug_assert_eq!(members.len(), self.n_segments);
        let sum: f64 = members
            .iter()
            .enumerate()
            .map(|(segment, &member)| self.values[member * self.n_segments + segment])
            .sum();
        sum / self.n_segments as f64
    }

    /// Checked variant of [`MeanGrid::recombined_mean`] for a [`Combination`].
    ///
    /// # Errors
    ///
    /// Returns [`SegmentsError::LengthMismatch`] or
    /// [`SegmentsError::MemberOutOfRange`].
    pub fn combination_mean(&self, combination: &Combination) -> Result<f64, SegmentsError> {
        CombinationSpace::new(self.n_members, self.n_segments)?.check(combination)?;
        Ok(self.recombined_mean(combination.members()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> SegmentMeans {
        SegmentMeans::from_fn(3, 2, |m, s, season, var| {
            let base = match (season, var) {
                (Season::Djf, Variable::Pr) => 100.0,
                (Season::Jja, Variable::Tas) => 20.0,
                _ => 1.0,
            };
            base + (m * 10 + s) as f64
        })
        .unwrap()
    }

    #[test]
    fn builder_rejects_zero_dimensions() {
        assert!(matches!(
            SegmentMeans::builder(0, 2),
            Err(SegmentsError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn builder_rejects_overflowing_dimensions() {
        assert!(matches!(
            SegmentMeans::builder(usize::MAX, 2),
            Err(SegmentsError::TableTooLarge { .. })
        ));
        assert!(matches!(
            SegmentMeans::builder(usize::MAX / 4, 1),
            Err(SegmentsError::TableTooLarge { .. })
        ));
        assert!(matches!(
            MeanGrid::new(usize::MAX, 3, vec![]),
            Err(SegmentsError::TableTooLarge { .. })
        ));
    }

    #[test]
    fn insert_validates_keys_and_values() {
        let mut b = SegmentMeans::builder(2, 2).unwrap();
        assert!(matches!(
            b.insert(2, 0, Season::Djf, Variable::Pr, 1.0),
            Err(SegmentsError::MemberOutOfRange { member: 2, .. })
        ));
        assert!(matches!(
            b.insert(0, 5, Season::Djf, Variable::Pr, 1.0),
            Err(SegmentsError::SegmentOutOfRange { segment: 5, .. })
        ));
        assert!(matches!(
            b.insert(0, 0, Season::Djf, Variable::Pr, f64::NAN),
            Err(SegmentsError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn grid_reports_first_missing_value() {
        let mut b = SegmentMeans::builder(2, 2).unwrap();
        b.insert(0, 0, Season::Jja, Variable::Tas, 18.0).unwrap();
        b.insert(0, 1, Season::Jja, Variable::Tas, 18.5).unwrap();
        let means = b.build();
        let err = means.grid(Season::Jja, Variable::Tas).unwrap_err();
        assert_eq!(
            err,
            SegmentsError::MissingValue {
                member: 1,
                segment: 0,
                season: Season::Jja,
                variable: Variable::Tas,
            }
        );
    }

    #[test]
    fn get_returns_none_for_missing_or_out_of_range() {
        let means = SegmentMeans::builder(1, 1).unwrap().build();
        assert_eq!(means.get(0, 0, Season::Djf, Variable::Pr), None);
        assert_eq!(means.get(3, 0, Season::Djf, Variable::Pr), None);
    }

    #[test]
    fn grid_is_member_major() {
        let grid = table().grid(Season::Djf, Variable::Pr).unwrap();
        assert_eq!(grid.value(0, 0), 100.0);
        assert_eq!(grid.value(0, 1), 101.0);
        assert_eq!(grid.value(2, 1), 121.0);
    }

    #[test]
    fn grid_overall_mean() {
        let grid = table().grid(Season::Djf, Variable::Pr).unwrap();
        // 100,101,110,111,120,121 -> mean 110.5
        assert_relative_eq!(grid.overall_mean(), 110.5, epsilon = 1e-12);
    }

    #[test]
    fn recombined_mean_picks_member_per_segment() {
        let grid = table().grid(Season::Jja, Variable::Tas).unwrap();
        // segment 0 from member 2 (40.0), segment 1 from member 0 (21.0)
        assert_relative_eq!(grid.recombined_mean(&[2, 0]), 30.5, epsilon = 1e-12);
    }

    #[test]
    fn combination_mean_checks_shape() {
        let grid = table().grid(Season::Djf, Variable::Pr).unwrap();
        assert!(grid.combination_mean(&Combination::new(vec![0])).is_err());
        assert!(grid.combination_mean(&Combination::new(vec![0, 3])).is_err());
        assert_relative_eq!(
            grid.combination_mean(&Combination::new(vec![1, 1])).unwrap(),
            110.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn mean_grid_new_validates() {
        assert!(matches!(
            MeanGrid::new(2, 2, vec![1.0; 3]),
            Err(SegmentsError::GridShapeMismatch {
                expected: 4,
                got: 3
            })
        ));
        assert!(matches!(
            MeanGrid::new(2, 2, vec![1.0, f64::INFINITY, 1.0, 1.0]),
            Err(SegmentsError::NonFiniteGridValue {
                member: 0,
                segment: 1
            })
        ));
    }
}
