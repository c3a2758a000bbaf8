//! Distribution filter for KCS resampling (filter 2).
//!
//! Each candidate combination is summarised by three [`SecondaryStats`]
//! (summer precipitation, winter temperature, summer temperature) taken as
//! recombined means. Value ranges are read off the population's own
//! percentiles and only candidates inside all three ranges survive.
//!
//! | Statistic | Season | Variable |
//! |-----------|--------|----------|
//! | `pr_summer` | JJA | `pr` |
//! | `tas_winter` | DJF | `tas` |
//! | `tas_summer` | JJA | `tas` |

pub mod bounds;
pub mod error;
pub mod filter;
pub mod secondary;

pub use bounds::{DistributionBounds, PercentileBound};
pub use error::FilterError;
pub use filter::{FilteredCandidate, FilteredCandidates, StatLimits, ValueRange, filter_by_percentiles};
pub use secondary::{SecondaryGrids, SecondaryStats, Statistic};
