//! Configuration for combination ranking.

use crate::error::RankError;

/// Configuration for a top-K ranking query.
///
/// # Example
///
/// ```
/// use kcs_rank::RankConfig;
///
/// let config = RankConfig::new(500);
/// assert_eq!(config.top_k(), 500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankConfig {
    /// Number of closest combinations to keep.
    top_k: usize,
}

impl RankConfig {
    /// Default number of combinations kept.
    pub const DEFAULT_TOP_K: usize = 1000;

    /// Creates a configuration keeping the `top_k` closest combinations.
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Sets the number of combinations to keep.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Returns the number of combinations to keep.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Validates this configuration.
    ///
    /// Returns an error if `top_k < 1`.
    pub fn validate(&self) -> Result<(), RankError> {
        if self.top_k < 1 {
            return Err(RankError::InvalidTopK { top_k: self.top_k });
        }
        Ok(())
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOP_K)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(RankConfig::default().top_k(), 1000);
    }

    #[test]
    fn test_builder() {
        let cfg = RankConfig::default().with_top_k(25);
        assert_eq!(cfg.top_k(), 25);
    }

    #[test]
    fn test_validate_invalid_top_k() {
        let result = RankConfig::new(0).validate();
        assert!(
            matches!(result, Err(RankError::InvalidTopK { top_k: 0 })),
            "expected InvalidTopK, got {result:?}"
        );
    }
}
