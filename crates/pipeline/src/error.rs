//! Error types for the kcs-pipeline crate.

use std::fmt;

use kcs_filter::FilterError;
use kcs_rank::RankError;
use kcs_segments::SegmentsError;
use kcs_select::SelectError;
use serde::Serialize;

/// Which of a scenario's two populations a stage ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Reference (control) period.
    Control,
    /// Scenario (future) period.
    Future,
}

impl Period {
    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Period::Control => "control",
            Period::Future => "future",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for all fallible operations in the kcs-pipeline crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    /// Returned before any search when the configuration or inputs are
    /// inconsistent.
    #[error("invalid configuration: {reason}")]
    Configuration {
        /// Human-readable description.
        reason: String,
    },

    /// Returned when filter 2 leaves fewer than `n_sample` candidates.
    #[error(
        "scenario {scenario}: only {available} {period} candidates survive the percentile filter, need {required}"
    )]
    InsufficientCandidates {
        /// Scenario name.
        scenario: String,
        /// Population that ran short.
        period: Period,
        /// Survivors of filter 2.
        available: usize,
        /// Required subset size.
        required: usize,
    },

    /// Ranking error.
    #[error(transparent)]
    Rank(#[from] RankError),

    /// Filtering error.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Selection error.
    #[error(transparent)]
    Select(#[from] SelectError),

    /// Segment table error.
    #[error(transparent)]
    Segments(#[from] SegmentsError),
}

impl PipelineError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        PipelineError::Configuration {
            reason: reason.into(),
        }
    }
}
