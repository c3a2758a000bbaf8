//! Percentile-bound filtering of a candidate population.

use kcs_segments::{Combination, SegmentMeans};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::bounds::DistributionBounds;
use crate::error::FilterError;
use crate::secondary::{SecondaryGrids, SecondaryStats, Statistic};

/// Inclusive value range computed from a population's percentiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    /// Value at the lower percentile.
    pub low: f64,
    /// Value at the upper percentile.
    pub high: f64,
}

impl ValueRange {
    /// Returns `true` if `low <= value <= high`.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Value ranges actually applied, one per statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatLimits {
    /// Range applied to summer precipitation.
    pub pr_summer: ValueRange,
    /// Range applied to winter temperature.
    pub tas_winter: ValueRange,
    /// Range applied to summer temperature.
    pub tas_summer: ValueRange,
}

impl StatLimits {
    /// Returns the range for `statistic`.
    pub fn get(&self, statistic: Statistic) -> ValueRange {
        match statistic {
            Statistic::PrSummer => self.pr_summer,
            Statistic::TasWinter => self.tas_winter,
            Statistic::TasSummer => self.tas_summer,
        }
    }

    /// Returns `true` if every statistic of `stats` lies in its range.
    pub fn admits(&self, stats: &SecondaryStats) -> bool {
        Statistic::ALL
            .iter()
            .all(|&s| self.get(s).contains(stats.get(s)))
    }
}

/// A candidate that passed the filter, with its statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredCandidate {
    /// Member-per-segment assignment.
    pub combination: Combination,
    /// Secondary statistics of the combination.
    pub stats: SecondaryStats,
}

/// Survivors of a percentile filter, in input order.
#[derive(Debug, Clone)]
pub struct FilteredCandidates {
    candidates: Vec<FilteredCandidate>,
    limits: StatLimits,
    population: usize,
}

impl FilteredCandidates {
    /// Returns the survivors.
    pub fn candidates(&self) -> &[FilteredCandidate] {
        &self.candidates
    }

    /// Iterates over the surviving combinations.
    pub fn combinations(&self) -> impl Iterator<Item = &Combination> {
        self.candidates.iter().map(|c| &c.combination)
    }

    /// Consumes the result and returns the surviving combinations.
    pub fn into_combinations(self) -> Vec<Combination> {
        self.candidates.into_iter().map(|c| c.combination).collect()
    }

    /// Returns the number of survivors.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` if no candidate survived.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the value ranges that were applied.
    pub fn limits(&self) -> &StatLimits {
        &self.limits
    }

    /// Returns the size of the filtered population.
    pub fn population(&self) -> usize {
        self.population
    }
}

/// Value range of `statistic` across `stats` at the percentiles of `bounds`.
fn value_range(stats: &[SecondaryStats], statistic: Statistic, bounds: &DistributionBounds) -> ValueRange {
    let values: Vec<f64> = stats.iter().map(|s| s.get(statistic)).collect();
    let sorted = kcs_stats::sorted(&values);
    let bound = bounds.get(statistic);
    ValueRange {
        low: kcs_stats::percentile(&sorted, bound.low()),
        high: kcs_stats::percentile(&sorted, bound.high()),
    }
}

/// Keeps the candidates whose secondary statistics all fall inside the
/// population's own percentile ranges.
///
/// For each [`Statistic`] the range is `[P(low), P(high)]` of that
/// statistic over `candidates` (type-7 interpolation, as NumPy's default
/// `percentile`). A candidate survives iff all three statistics lie in
/// their ranges, bounds inclusive. Survivors keep input order.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`FilterError::EmptyPopulation`] | `candidates` is empty |
/// | [`FilterError::Segments`] | missing grid entries or a combination that does not fit `means` |
///
/// # Example
///
/// ```
/// use kcs_filter::{DistributionBounds, PercentileBound, filter_by_percentiles};
/// use kcs_segments::{Combination, SegmentMeans};
///
/// let means = SegmentMeans::from_fn(4, 1, |m, _, _, _| m as f64).unwrap();
/// let candidates: Vec<Combination> = (0..4).map(|m| Combination::new(vec![m])).collect();
/// let all = PercentileBound::new(0.0, 100.0).unwrap();
/// let bounds = DistributionBounds::new(all, all, all);
///
/// let out = filter_by_percentiles(&candidates, &means, &bounds).unwrap();
/// assert_eq!(out.len(), 4);
/// ```
#[tracing::instrument(skip_all, fields(population = candidates.len()))]
pub fn filter_by_percentiles(
    candidates: &[Combination],
    means: &SegmentMeans,
    bounds: &DistributionBounds,
) -> Result<FilteredCandidates, FilterError> {
    if candidates.is_empty() {
        return Err(FilterError::EmptyPopulation);
    }

    let grids = SecondaryGrids::new(means)?;
    let stats: Vec<SecondaryStats> = candidates
        .par_iter()
        .map(|c| grids.stats(c))
        .collect::<Result<_, _>>()?;

    let limits = StatLimits {
        pr_summer: value_range(&stats, Statistic::PrSummer, bounds),
        tas_winter: value_range(&stats, Statistic::TasWinter, bounds),
        tas_summer: value_range(&stats, Statistic::TasSummer, bounds),
    };

    let survivors: Vec<FilteredCandidate> = candidates
        .iter()
        .zip(stats)
        .filter(|(_, s)| limits.admits(s))
        .map(|(c, s)| FilteredCandidate {
            combination: c.clone(),
            stats: s,
        })
        .collect();

    debug!(
        survivors = survivors.len(),
        pr_summer = ?limits.pr_summer,
        tas_winter = ?limits.tas_winter,
        tas_summer = ?limits.tas_summer,
        "percentile filter applied"
    );

    Ok(FilteredCandidates {
        candidates: survivors,
        limits,
        population: candidates.len(),
    })
}
