//! Configuration for penalty-minimising subset selection.

use crate::error::SelectError;

/// Configuration for [`select_min_penalty`](crate::select_min_penalty).
///
/// # Example
///
/// ```
/// use kcs_select::SelectConfig;
///
/// let config = SelectConfig::default().with_n_trials(500).with_seed(7);
/// assert_eq!(config.n_sample(), 8);
/// assert_eq!(config.n_trials(), 500);
/// assert_eq!(config.seed(), Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectConfig {
    /// Combinations per subset (default 8).
    n_sample: usize,
    /// Random subsets tried (default 10 000).
    n_trials: usize,
    /// Base seed; drawn from the OS when `None`.
    seed: Option<u64>,
}

impl Default for SelectConfig {
    /// Returns `n_sample = 8`, `n_trials = 10_000`, `seed = None`.
    fn default() -> Self {
        Self {
            n_sample: 8,
            n_trials: 10_000,
            seed: None,
        }
    }
}

impl SelectConfig {
    /// Sets the subset size.
    pub fn with_n_sample(mut self, n_sample: usize) -> Self {
        self.n_sample = n_sample;
        self
    }

    /// Sets the number of trials.
    pub fn with_n_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = n_trials;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the base seed.
    pub fn with_seed_opt(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the subset size.
    pub fn n_sample(&self) -> usize {
        self.n_sample
    }

    /// Returns the number of trials.
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    /// Returns the base seed, if set.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SelectError> {
        if self.n_sample == 0 {
            return Err(SelectError::InvalidNSample {
                n_sample: self.n_sample,
            });
        }
        if self.n_trials == 0 {
            return Err(SelectError::InvalidNTrials {
                n_trials: self.n_trials,
            });
        }
        Ok(())
    }
}
