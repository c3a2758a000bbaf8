//! Segment index model for KCS resampling.
//!
//! A period of `period_years` is cut into `n_segments` blocks of
//! `step_years`. Every ensemble member supplies one seasonal mean per
//! `(segment, season, variable)`. A [`Combination`] picks one member per
//! segment and so defines a synthetic recombined series.
//!
//! | Type | Role |
//! |------|------|
//! | [`SegmentMeans`] | immutable `(member, segment, season, variable) → mean` table |
//! | [`MeanGrid`] | dense member × segment slice for one season and variable |
//! | [`Combination`] | member-per-segment assignment vector |
//! | [`CombinationSpace`] | indexed Cartesian space of all combinations |

mod combination;
mod error;
mod means;
mod season;

pub use combination::{Combination, CombinationSpace};
pub use error::SegmentsError;
pub use means::{MeanGrid, SegmentMeans, SegmentMeansBuilder};
pub use season::{Season, Variable};

/// Number of segments a period of `period_years` splits into.
///
/// Returns `None` if `step_years` is 0 or does not divide `period_years`.
pub fn n_segments(period_years: usize, step_years: usize) -> Option<usize> {
    if step_years == 0 || period_years == 0 || !period_years.is_multiple_of(step_years) {
        return None;
    }
    Some(period_years / step_years)
}
