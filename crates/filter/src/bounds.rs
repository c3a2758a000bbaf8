//! Percentile bounds for the secondary statistics.

use serde::Serialize;

use crate::error::FilterError;
use crate::secondary::Statistic;

/// Inclusive percentile range `[low, high]` on the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileBound {
    low: f64,
    high: f64,
}

impl PercentileBound {
    /// Creates a bound.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidBound`] unless
    /// `0 <= low <= high <= 100` and both are finite.
    pub fn new(low: f64, high: f64) -> Result<Self, FilterError> {
        let valid = low.is_finite()
            && high.is_finite()
            && (0.0..=100.0).contains(&low)
            && (0.0..=100.0).contains(&high)
            && low <= high;
        if !valid {
            return Err(FilterError::InvalidBound { low, high });
        }
        Ok(Self { low, high })
    }

    /// Returns the lower percentile.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Returns the upper percentile.
    pub fn high(&self) -> f64 {
        self.high
    }
}

impl TryFrom<[f64; 2]> for PercentileBound {
    type Error = FilterError;

    fn try_from([low, high]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(low, high)
    }
}

/// One [`PercentileBound`] per secondary statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionBounds {
    /// Bound on summer (JJA) precipitation.
    pub pr_summer: PercentileBound,
    /// Bound on winter (DJF) temperature.
    pub tas_winter: PercentileBound,
    /// Bound on summer (JJA) temperature.
    pub tas_summer: PercentileBound,
}

impl DistributionBounds {
    /// Groups three validated bounds.
    pub fn new(
        pr_summer: PercentileBound,
        tas_winter: PercentileBound,
        tas_summer: PercentileBound,
    ) -> Self {
        Self {
            pr_summer,
            tas_winter,
            tas_summer,
        }
    }

    /// Returns the bound for `statistic`.
    pub fn get(&self, statistic: Statistic) -> PercentileBound {
        match statistic {
            Statistic::PrSummer => self.pr_summer,
            Statistic::TasWinter => self.tas_winter,
            Statistic::TasSummer => self.tas_summer,
        }
    }
}
