//! Error types for the kcs-select crate.

/// Error type for all fallible operations in the kcs-select crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// Returned when the subset size is zero.
    #[error("n_sample must be >= 1, got {n_sample}")]
    InvalidNSample {
        /// The invalid subset size.
        n_sample: usize,
    },

    /// Returned when the number of trials is zero.
    #[error("n_trials must be >= 1, got {n_trials}")]
    InvalidNTrials {
        /// The invalid trial count.
        n_trials: usize,
    },

    /// Returned when there are no candidates to draw from.
    #[error("no candidates to select from")]
    EmptyCandidates,

    /// Returned when candidates do not all have the same number of segments.
    #[error("candidate {index} has {got} segments, expected {expected}")]
    LengthMismatch {
        /// Position of the offending candidate.
        index: usize,
        /// Length of the first candidate.
        expected: usize,
        /// Length of the offending candidate.
        got: usize,
    },
}
