//! Seasonal-mean tables for the control period and each scenario.

use std::collections::BTreeMap;

use kcs_segments::SegmentMeans;
use tracing::warn;

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Control table plus one future table per scenario name.
#[derive(Debug, Clone)]
pub struct PeriodMeans {
    control: SegmentMeans,
    futures: BTreeMap<String, SegmentMeans>,
}

impl PeriodMeans {
    /// Groups a control table with named future tables.
    pub fn new(control: SegmentMeans, futures: BTreeMap<String, SegmentMeans>) -> Self {
        Self { control, futures }
    }

    /// Splits a map of period name → table into control and futures.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if `control_name` is absent.
    pub fn from_periods(
        mut periods: BTreeMap<String, SegmentMeans>,
        control_name: &str,
    ) -> Result<Self, PipelineError> {
        let control = periods.remove(control_name).ok_or_else(|| {
            PipelineError::config(format!("input has no control period {control_name:?}"))
        })?;
        Ok(Self::new(control, periods))
    }

    /// Returns the control table.
    pub fn control(&self) -> &SegmentMeans {
        &self.control
    }

    /// Returns the future table for `scenario`.
    pub fn future(&self, scenario: &str) -> Option<&SegmentMeans> {
        self.futures.get(scenario)
    }

    /// Iterates over the scenario names with a future table.
    pub fn scenario_names(&self) -> impl Iterator<Item = &str> {
        self.futures.keys().map(String::as_str)
    }

    /// Returns the future tables no configured scenario refers to.
    pub fn unconfigured_periods<'a>(&'a self, config: &PipelineConfig) -> Vec<&'a str> {
        self.scenario_names()
            .filter(|name| !config.scenarios().iter().any(|s| s.name() == *name))
            .collect()
    }

    /// Checks that every configured scenario has a future table and that
    /// all tables share the control table's shape with `n_segments`
    /// segments. Future tables without a scenario are logged and ignored.
    pub fn check(&self, config: &PipelineConfig, n_segments: usize) -> Result<(), PipelineError> {
        let n_members = self.control.n_members();
        if self.control.n_segments() != n_segments {
            return Err(PipelineError::config(format!(
                "control table has {} segments, configuration implies {n_segments}",
                self.control.n_segments()
            )));
        }
        for scenario in config.scenarios() {
            let name = scenario.name();
            let future = self.future(name).ok_or_else(|| {
                PipelineError::config(format!("no future data for scenario {name}"))
            })?;
            if future.n_members() != n_members || future.n_segments() != n_segments {
                return Err(PipelineError::config(format!(
                    "scenario {name}: table is {} members x {} segments, control is {n_members} x {n_segments}",
                    future.n_members(),
                    future.n_segments()
                )));
            }
        }
        let unused = self.unconfigured_periods(config);
        if !unused.is_empty() {
            warn!(periods = ?unused, "input periods without a configured scenario are ignored");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;

    fn table(n_members: usize, n_segments: usize) -> SegmentMeans {
        SegmentMeans::from_fn(n_members, n_segments, |m, s, _, _| (m + s) as f64).unwrap()
    }

    #[test]
    fn test_from_periods_splits_control() {
        let mut periods = BTreeMap::new();
        periods.insert("control".to_string(), table(3, 2));
        periods.insert("WL".to_string(), table(3, 2));
        periods.insert("WH".to_string(), table(3, 2));
        let inputs = PeriodMeans::from_periods(periods, "control").unwrap();
        assert_eq!(inputs.scenario_names().collect::<Vec<_>>(), vec!["WH", "WL"]);
        assert!(inputs.future("control").is_none());
    }

    #[test]
    fn test_from_periods_missing_control() {
        let mut periods = BTreeMap::new();
        periods.insert("WL".to_string(), table(3, 2));
        let err = PeriodMeans::from_periods(periods, "reference").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: input has no control period \"reference\""
        );
    }

    #[test]
    fn test_check_missing_scenario() {
        let inputs = PeriodMeans::new(table(3, 2), BTreeMap::new());
        let config = PipelineConfig::new().with_scenario(ScenarioConfig::new("WL", 4.0));
        let err = inputs.check(&config, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: no future data for scenario WL"
        );
    }

    #[test]
    fn test_unconfigured_periods_are_reported() {
        let mut futures = BTreeMap::new();
        futures.insert("GL".to_string(), table(3, 2));
        futures.insert("WL".to_string(), table(3, 2));
        futures.insert("WH".to_string(), table(3, 2));
        let inputs = PeriodMeans::new(table(3, 2), futures);
        let config = PipelineConfig::new().with_scenario(ScenarioConfig::new("WL", 4.0));
        assert_eq!(inputs.unconfigured_periods(&config), vec!["GL", "WH"]);
        assert!(inputs.check(&config, 2).is_ok());
    }

    #[test]
    fn test_check_shape_mismatch() {
        let mut futures = BTreeMap::new();
        futures.insert("WL".to_string(), table(4, 2));
        let inputs = PeriodMeans::new(table(3, 2), futures);
        let config = PipelineConfig::new().with_scenario(ScenarioConfig::new("WL", 4.0));
        assert!(inputs.check(&config, 2).is_err());
        assert!(PeriodMeans::new(table(3, 2), BTreeMap::new())
            .check(&PipelineConfig::new(), 6)
            .is_err());
    }
}
