//! Error types for the kcs-rank crate.

use kcs_segments::SegmentsError;

/// Error type for all fallible operations in the kcs-rank crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RankError {
    /// Returned when top_k is zero.
    #[error("top_k must be >= 1, got {top_k}")]
    InvalidTopK {
        /// The invalid top_k value.
        top_k: usize,
    },

    /// Returned when the ranking target is NaN or infinite.
    #[error("ranking target must be finite, got {target}")]
    NonFiniteTarget {
        /// The invalid target.
        target: f64,
    },

    /// Segment table or combination space error.
    #[error(transparent)]
    Segments(#[from] SegmentsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_top_k() {
        let e = RankError::InvalidTopK { top_k: 0 };
        assert_eq!(e.to_string(), "top_k must be >= 1, got 0");
    }

    #[test]
    fn error_non_finite_target() {
        let e = RankError::NonFiniteTarget { target: f64::NAN };
        assert_eq!(e.to_string(), "ranking target must be finite, got NaN");
    }

    #[test]
    fn error_segments_transparent() {
        let e = RankError::from(SegmentsError::SpaceOverflow {
            n_members: 100,
            n_segments: 20,
        });
        assert_eq!(e.to_string(), "combination space 100^20 overflows u64");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<RankError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<RankError>();
    }
}
