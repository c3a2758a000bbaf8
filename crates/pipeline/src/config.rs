//! Pipeline and scenario configuration.

use std::collections::HashSet;

use kcs_filter::DistributionBounds;

use crate::error::PipelineError;

/// One climate-change scenario.
///
/// Bounds are optional at construction so that incomplete configurations
/// are reported by [`PipelineConfig::validate`] instead of at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    name: String,
    target_dpr_winter_percent: f64,
    control_bounds: Option<DistributionBounds>,
    future_bounds: Option<DistributionBounds>,
}

impl ScenarioConfig {
    /// Creates a scenario with a relative winter precipitation change in
    /// percent and no bounds.
    pub fn new(name: impl Into<String>, target_dpr_winter_percent: f64) -> Self {
        Self {
            name: name.into(),
            target_dpr_winter_percent,
            control_bounds: None,
            future_bounds: None,
        }
    }

    /// Sets the bounds applied to the control population.
    pub fn with_control_bounds(mut self, bounds: DistributionBounds) -> Self {
        self.control_bounds = Some(bounds);
        self
    }

    /// Sets the bounds applied to the future population.
    pub fn with_future_bounds(mut self, bounds: DistributionBounds) -> Self {
        self.future_bounds = Some(bounds);
        self
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target winter precipitation change in percent.
    pub fn target_dpr_winter_percent(&self) -> f64 {
        self.target_dpr_winter_percent
    }

    /// Returns the control bounds, if set.
    pub fn control_bounds(&self) -> Option<&DistributionBounds> {
        self.control_bounds.as_ref()
    }

    /// Returns the future bounds, if set.
    pub fn future_bounds(&self) -> Option<&DistributionBounds> {
        self.future_bounds.as_ref()
    }

    /// Winter precipitation target for the future ranking.
    pub fn future_target(&self, control_target: f64) -> f64 {
        control_target * (1.0 + self.target_dpr_winter_percent / 100.0)
    }
}

/// Settings for a full resampling run.
///
/// # Example
///
/// ```
/// use kcs_pipeline::{PipelineConfig, ScenarioConfig};
///
/// let config = PipelineConfig::new()
///     .with_top_k(500)
///     .with_seed(42)
///     .with_scenario(ScenarioConfig::new("WL", 4.0));
/// assert_eq!(config.n_segments(), Some(6));
/// // Bounds are still missing.
/// assert!(config.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    period_years: usize,
    step_years: usize,
    top_k: usize,
    n_sample: usize,
    n_trials: usize,
    seed: Option<u64>,
    scenarios: Vec<ScenarioConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineConfig {
    /// Creates a configuration with defaults and no scenarios.
    ///
    /// Defaults: `period_years = 30`, `step_years = 5`, `top_k = 1000`,
    /// `n_sample = 8`, `n_trials = 10_000`, `seed = None`.
    pub fn new() -> Self {
        Self {
            period_years: 30,
            step_years: 5,
            top_k: 1000,
            n_sample: 8,
            n_trials: 10_000,
            seed: None,
            scenarios: Vec::new(),
        }
    }

    /// Sets the period length in years.
    pub fn with_period_years(mut self, years: usize) -> Self {
        self.period_years = years;
        self
    }

    /// Sets the segment length in years.
    pub fn with_step_years(mut self, years: usize) -> Self {
        self.step_years = years;
        self
    }

    /// Sets the number of combinations kept by filter 1.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the subset size of filter 3.
    pub fn with_n_sample(mut self, n_sample: usize) -> Self {
        self.n_sample = n_sample;
        self
    }

    /// Sets the number of random trials of filter 3.
    pub fn with_n_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = n_trials;
        self
    }

    /// Sets the global seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the global seed.
    pub fn with_seed_opt(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Appends a scenario.
    pub fn with_scenario(mut self, scenario: ScenarioConfig) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Returns the period length in years.
    pub fn period_years(&self) -> usize {
        self.period_years
    }

    /// Returns the segment length in years.
    pub fn step_years(&self) -> usize {
        self.step_years
    }

    /// Returns the number of segments, or `None` if the period does not
    /// split evenly.
    pub fn n_segments(&self) -> Option<usize> {
        kcs_segments::n_segments(self.period_years, self.step_years)
    }

    /// Returns `top_k`.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Returns `n_sample`.
    pub fn n_sample(&self) -> usize {
        self.n_sample
    }

    /// Returns `n_trials`.
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    /// Returns the global seed, if set.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the scenarios in configuration order.
    pub fn scenarios(&self) -> &[ScenarioConfig] {
        &self.scenarios
    }

    /// Checks sizes, the period split and every scenario.
    ///
    /// Returns the number of segments on success.
    pub fn validate(&self) -> Result<usize, PipelineError> {
        let n_segments = self.n_segments().ok_or_else(|| {
            PipelineError::config(format!(
                "period of {} years is not divisible into {}-year segments",
                self.period_years, self.step_years
            ))
        })?;
        for (name, value) in [
            ("top_k", self.top_k),
            ("n_sample", self.n_sample),
            ("n_trials", self.n_trials),
        ] {
            if value == 0 {
                return Err(PipelineError::config(format!("{name} must be >= 1")));
            }
        }
        if self.scenarios.is_empty() {
            return Err(PipelineError::config("no scenarios configured"));
        }

        let mut seen = HashSet::new();
        for s in &self.scenarios {
            if !seen.insert(s.name()) {
                return Err(PipelineError::config(format!(
                    "duplicate scenario name {:?}",
                    s.name()
                )));
            }
            if !s.target_dpr_winter_percent.is_finite() {
                return Err(PipelineError::config(format!(
                    "scenario {}: target_dpr_winter_percent must be finite",
                    s.name()
                )));
            }
            if s.control_bounds.is_none() {
                return Err(PipelineError::config(format!(
                    "scenario {}: missing control bounds",
                    s.name()
                )));
            }
            if s.future_bounds.is_none() {
                return Err(PipelineError::config(format!(
                    "scenario {}: missing future bounds",
                    s.name()
                )));
            }
        }
        Ok(n_segments)
    }
}
