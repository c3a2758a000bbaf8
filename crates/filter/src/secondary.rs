//! Secondary statistics of a recombined series.

use std::fmt;

use kcs_segments::{Combination, CombinationSpace, MeanGrid, Season, SegmentMeans, Variable};
use serde::Serialize;

use crate::error::FilterError;

/// The three statistics a candidate is filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// Summer (JJA) precipitation.
    PrSummer,
    /// Winter (DJF) temperature.
    TasWinter,
    /// Summer (JJA) temperature.
    TasSummer,
}

impl Statistic {
    /// All statistics in evaluation order.
    pub const ALL: [Statistic; 3] = [
        Statistic::PrSummer,
        Statistic::TasWinter,
        Statistic::TasSummer,
    ];

    /// Snake-case name (`pr_summer`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Statistic::PrSummer => "pr_summer",
            Statistic::TasWinter => "tas_winter",
            Statistic::TasSummer => "tas_summer",
        }
    }

    /// Season the statistic aggregates.
    pub fn season(self) -> Season {
        match self {
            Statistic::PrSummer | Statistic::TasSummer => Season::Jja,
            Statistic::TasWinter => Season::Djf,
        }
    }

    /// Variable the statistic aggregates.
    pub fn variable(self) -> Variable {
        match self {
            Statistic::PrSummer => Variable::Pr,
            Statistic::TasWinter | Statistic::TasSummer => Variable::Tas,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recombined means of one candidate for each [`Statistic`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SecondaryStats {
    /// Summer precipitation.
    pub pr_summer: f64,
    /// Winter temperature.
    pub tas_winter: f64,
    /// Summer temperature.
    pub tas_summer: f64,
}

impl SecondaryStats {
    /// Returns the value of `statistic`.
    pub fn get(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::PrSummer => self.pr_summer,
            Statistic::TasWinter => self.tas_winter,
            Statistic::TasSummer => self.tas_summer,
        }
    }
}

/// The three dense grids needed to compute [`SecondaryStats`] for a period.
#[derive(Debug, Clone)]
pub struct SecondaryGrids {
    space: CombinationSpace,
    pr_summer: MeanGrid,
    tas_winter: MeanGrid,
    tas_summer: MeanGrid,
}

impl SecondaryGrids {
    /// Extracts the JJA-pr, DJF-tas and JJA-tas grids from `means`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Segments`] if any needed entry is missing.
    pub fn new(means: &SegmentMeans) -> Result<Self, FilterError> {
        let grid = |s: Statistic| means.grid(s.season(), s.variable());
        Ok(Self {
            space: means.space()?,
            pr_summer: grid(Statistic::PrSummer)?,
            tas_winter: grid(Statistic::TasWinter)?,
            tas_summer: grid(Statistic::TasSummer)?,
        })
    }

    /// Computes the statistics of `combination`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Segments`] if the combination does not fit the
    /// table dimensions.
    pub fn stats(&self, combination: &Combination) -> Result<SecondaryStats, FilterError> {
        self.space.check(combination)?;
        let members = combination.members();
        Ok(SecondaryStats {
            pr_summer: self.pr_summer.recombined_mean(members),
            tas_winter: self.tas_winter.recombined_mean(members),
            tas_summer: self.tas_summer.recombined_mean(members),
        })
    }
}
