//! Season and variable labels for seasonal-mean tables.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SegmentsError;

/// Meteorological season over which a segment mean is aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Season {
    /// December, January, February (winter).
    #[serde(rename = "DJF")]
    Djf,
    /// March, April, May.
    #[serde(rename = "MAM")]
    Mam,
    /// June, July, August (summer).
    #[serde(rename = "JJA")]
    Jja,
    /// September, October, November.
    #[serde(rename = "SON")]
    Son,
}

impl Season {
    /// All seasons in table order.
    pub const ALL: [Season; 4] = [Season::Djf, Season::Mam, Season::Jja, Season::Son];

    /// Three-letter label (`DJF`, `MAM`, `JJA`, `SON`).
    pub fn label(self) -> &'static str {
        match self {
            Season::Djf => "DJF",
            Season::Mam => "MAM",
            Season::Jja => "JJA",
            Season::Son => "SON",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = SegmentsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DJF" => Ok(Season::Djf),
            "MAM" => Ok(Season::Mam),
            "JJA" => Ok(Season::Jja),
            "SON" => Ok(Season::Son),
            _ => Err(SegmentsError::UnknownSeason {
                label: s.to_string(),
            }),
        }
    }
}

/// Climate variable of a seasonal mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variable {
    /// Precipitation flux.
    Pr,
    /// Near-surface air temperature.
    Tas,
}

impl Variable {
    /// All variables in table order.
    pub const ALL: [Variable; 2] = [Variable::Pr, Variable::Tas];

    /// CMIP short name (`pr`, `tas`).
    pub fn short_name(self) -> &'static str {
        match self {
            Variable::Pr => "pr",
            Variable::Tas => "tas",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Variable {
    type Err = SegmentsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pr" => Ok(Variable::Pr),
            "tas" => Ok(Variable::Tas),
            _ => Err(SegmentsError::UnknownVariable {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_round_trip_labels() {
        for season in Season::ALL {
            assert_eq!(season.label().parse::<Season>().unwrap(), season);
        }
    }

    #[test]
    fn season_parse_is_case_insensitive() {
        assert_eq!("djf".parse::<Season>().unwrap(), Season::Djf);
        assert_eq!("Jja".parse::<Season>().unwrap(), Season::Jja);
    }

    #[test]
    fn season_parse_rejects_unknown() {
        let err = "winter".parse::<Season>().unwrap_err();
        assert!(matches!(err, SegmentsError::UnknownSeason { .. }));
    }

    #[test]
    fn variable_parse() {
        assert_eq!("pr".parse::<Variable>().unwrap(), Variable::Pr);
        assert_eq!("TAS".parse::<Variable>().unwrap(), Variable::Tas);
        assert!(matches!(
            "tasmax".parse::<Variable>(),
            Err(SegmentsError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn indices_are_dense() {
        let seasons: Vec<usize> = Season::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(seasons, vec![0, 1, 2, 3]);
        let vars: Vec<usize> = Variable::ALL.iter().map(|v| v.index()).collect();
        assert_eq!(vars, vec![0, 1]);
    }
}
