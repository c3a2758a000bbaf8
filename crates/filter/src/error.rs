//! Error types for the kcs-filter crate.

use kcs_segments::SegmentsError;

/// Error type for all fallible operations in the kcs-filter crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    /// Returned when a percentile bound is non-finite, outside `[0, 100]`,
    /// or has `low > high`.
    #[error("invalid percentile bound [{low}, {high}]: need 0 <= low <= high <= 100")]
    InvalidBound {
        /// Lower percentile.
        low: f64,
        /// Upper percentile.
        high: f64,
    },

    /// Returned when the candidate population is empty.
    #[error("candidate population is empty")]
    EmptyPopulation,

    /// Segment table or combination error.
    #[error(transparent)]
    Segments(#[from] SegmentsError),
}
