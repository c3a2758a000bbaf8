//! Error types for the kcs-segments crate.

use crate::season::{Season, Variable};

/// Error type for all fallible operations in the kcs-segments crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SegmentsError {
    /// Returned when a table or space is built with zero members or segments.
    #[error("dimensions must be >= 1, got {n_members} members x {n_segments} segments")]
    InvalidDimensions {
        /// Number of ensemble members.
        n_members: usize,
        /// Number of segments.
        n_segments: usize,
    },

    /// Returned when an ensemble-member index is out of range.
    #[error("member index {member} out of range for {n_members} members")]
    MemberOutOfRange {
        /// The offending member index.
        member: usize,
        /// Number of ensemble members.
        n_members: usize,
    },

    /// Returned when a segment index is out of range.
    #[error("segment index {segment} out of range for {n_segments} segments")]
    SegmentOutOfRange {
        /// The offending segment index.
        segment: usize,
        /// Number of segments.
        n_segments: usize,
    },

    /// Returned when a seasonal mean is NaN or infinite.
    #[error("non-finite {variable} {season} mean for member {member}, segment {segment}")]
    NonFiniteValue {
        /// Ensemble member index.
        member: usize,
        /// Segment index.
        segment: usize,
        /// Season of the value.
        season: Season,
        /// Variable of the value.
        variable: Variable,
    },

    /// Returned when a directly supplied grid value is NaN or infinite.
    #[error("non-finite grid value for member {member}, segment {segment}")]
    NonFiniteGridValue {
        /// Ensemble member index.
        member: usize,
        /// Segment index.
        segment: usize,
    },

    /// Returned when a required seasonal mean was never supplied.
    #[error("missing {variable} {season} mean for member {member}, segment {segment}")]
    MissingValue {
        /// Ensemble member index.
        member: usize,
        /// Segment index.
        segment: usize,
        /// Season of the value.
        season: Season,
        /// Variable of the value.
        variable: Variable,
    },

    /// Returned when `n_members ^ n_segments` does not fit in a `u64`.
    #[error("combination space {n_members}^{n_segments} overflows u64")]
    SpaceOverflow {
        /// Number of ensemble members.
        n_members: usize,
        /// Number of segments.
        n_segments: usize,
    },

    /// Returned when `n_members * n_segments` table entries overflow `usize`.
    #[error("table of {n_members} members x {n_segments} segments is too large")]
    TableTooLarge {
        /// Number of ensemble members.
        n_members: usize,
        /// Number of segments.
        n_segments: usize,
    },

    /// Returned when a combination has the wrong number of segments.
    #[error("combination has {got} segments, expected {expected}")]
    LengthMismatch {
        /// Expected number of segments.
        expected: usize,
        /// Actual combination length.
        got: usize,
    },

    /// Returned when a grid is built from a value buffer of the wrong size.
    #[error("grid expects {expected} values, got {got}")]
    GridShapeMismatch {
        /// Expected `n_members * n_segments`.
        expected: usize,
        /// Actual buffer length.
        got: usize,
    },

    /// Returned when a season label cannot be parsed.
    #[error("unknown season label {label:?} (expected DJF, MAM, JJA or SON)")]
    UnknownSeason {
        /// The unparsed label.
        label: String,
    },

    /// Returned when a variable name cannot be parsed.
    #[error("unknown variable {name:?} (expected pr or tas)")]
    UnknownVariable {
        /// The unparsed name.
        name: String,
    },
}
