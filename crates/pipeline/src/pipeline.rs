//! Orchestration of filters 1–3 over the control period and every scenario.

use kcs_filter::{DistributionBounds, FilteredCandidates, filter_by_percentiles};
use kcs_rank::{RankConfig, RankedCandidates, rank_combinations};
use kcs_segments::{Combination, Season, SegmentMeans, Variable};
use kcs_select::{FinalSubset, SelectConfig, select_min_penalty};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{PipelineConfig, ScenarioConfig};
use crate::error::{Period, PipelineError};
use crate::inputs::PeriodMeans;
use crate::selection::{PeriodSelection, ScenarioSelection};

/// Filter 1 output for the control period, shared by every scenario.
#[derive(Debug, Clone)]
pub struct ControlRanking {
    target: f64,
    ranked: RankedCandidates,
    combinations: Vec<Combination>,
}

impl ControlRanking {
    /// Returns the control winter precipitation target.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns the ranked control candidates.
    pub fn ranked(&self) -> &RankedCandidates {
        &self.ranked
    }
}

/// Control target = overall mean of the control DJF precipitation grid.
pub fn control_target(control: &SegmentMeans) -> Result<f64, PipelineError> {
    Ok(control.grid(Season::Djf, Variable::Pr)?.overall_mean())
}

/// Ranks the control combinations against the control target.
#[tracing::instrument(skip(control))]
pub fn rank_control(control: &SegmentMeans, top_k: usize) -> Result<ControlRanking, PipelineError> {
    let grid = control.grid(Season::Djf, Variable::Pr)?;
    let target = grid.overall_mean();
    let ranked = rank_combinations(&grid, target, &RankConfig::new(top_k))?;
    let combinations = ranked.combinations().cloned().collect();
    info!(
        target,
        space_size = ranked.space_size(),
        ranked = ranked.len(),
        "control ranking complete"
    );
    Ok(ControlRanking {
        target,
        ranked,
        combinations,
    })
}

/// Seed for filter 3 of one scenario and population.
///
/// Distinct (scenario, period) pairs get well-separated seeds so their
/// chunk streams do not overlap.
pub fn derive_seed(seed: u64, scenario_index: usize, period: Period) -> u64 {
    let lane = (scenario_index as u64)
        .wrapping_mul(2)
        .wrapping_add(matches!(period, Period::Future) as u64)
        .wrapping_add(1);
    seed ^ lane.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn bounds_for<'a>(
    scenario: &'a ScenarioConfig,
    period: Period,
) -> Result<&'a DistributionBounds, PipelineError> {
    let bounds = match period {
        Period::Control => scenario.control_bounds(),
        Period::Future => scenario.future_bounds(),
    };
    bounds.ok_or_else(|| {
        PipelineError::config(format!("scenario {}: missing {period} bounds", scenario.name()))
    })
}

fn ensure_enough(
    scenario: &ScenarioConfig,
    period: Period,
    filtered: &FilteredCandidates,
    required: usize,
) -> Result<(), PipelineError> {
    if filtered.len() < required {
        return Err(PipelineError::InsufficientCandidates {
            scenario: scenario.name().to_string(),
            period,
            available: filtered.len(),
            required,
        });
    }
    Ok(())
}

fn select(
    config: &PipelineConfig,
    index: usize,
    period: Period,
    filtered: &FilteredCandidates,
) -> Result<FinalSubset, PipelineError> {
    let candidates: Vec<Combination> = filtered.combinations().cloned().collect();
    let select_config = SelectConfig::default()
        .with_n_sample(config.n_sample())
        .with_n_trials(config.n_trials())
        .with_seed_opt(config.seed().map(|s| derive_seed(s, index, period)));
    Ok(select_min_penalty(&candidates, &select_config)?)
}

/// Runs filters 1–3 for one scenario.
///
/// Filter 1 runs on the scenario's future table; the control ranking is
/// reused. Filter 2 bounds each population with its own percentile ranges.
///
/// # Errors
///
/// [`PipelineError::InsufficientCandidates`] if either population has
/// fewer than `n_sample` filter-2 survivors (control is checked first),
/// plus any stage error.
#[tracing::instrument(skip_all, fields(scenario = scenario.name()))]
pub fn run_scenario(
    config: &PipelineConfig,
    index: usize,
    scenario: &ScenarioConfig,
    control: &ControlRanking,
    inputs: &PeriodMeans,
) -> Result<ScenarioSelection, PipelineError> {
    let future_means = inputs.future(scenario.name()).ok_or_else(|| {
        PipelineError::config(format!("no future data for scenario {}", scenario.name()))
    })?;

    let future_target = scenario.future_target(control.target);
    let future_grid = future_means.grid(Season::Djf, Variable::Pr)?;
    let future_ranked =
        rank_combinations(&future_grid, future_target, &RankConfig::new(config.top_k()))?;
    let future_candidates: Vec<Combination> = future_ranked.combinations().cloned().collect();

    let control_filtered = filter_by_percentiles(
        &control.combinations,
        inputs.control(),
        bounds_for(scenario, Period::Control)?,
    )?;
    let future_filtered = filter_by_percentiles(
        &future_candidates,
        future_means,
        bounds_for(scenario, Period::Future)?,
    )?;
    debug!(
        control = control_filtered.len(),
        future = future_filtered.len(),
        "filter 2 survivors"
    );

    ensure_enough(scenario, Period::Control, &control_filtered, config.n_sample())?;
    ensure_enough(scenario, Period::Future, &future_filtered, config.n_sample())?;

    let (control_subset, future_subset) = rayon::join(
        || select(config, index, Period::Control, &control_filtered),
        || select(config, index, Period::Future, &future_filtered),
    );
    let (control_subset, future_subset) = (control_subset?, future_subset?);

    info!(
        future_target,
        control_penalty = control_subset.penalty(),
        future_penalty = future_subset.penalty(),
        "scenario selected"
    );

    Ok(ScenarioSelection {
        name: scenario.name().to_string(),
        index,
        target_dpr_winter_percent: scenario.target_dpr_winter_percent(),
        control: PeriodSelection {
            period: Period::Control,
            target: control.target,
            space_size: control.ranked.space_size(),
            ranked: control.ranked.len(),
            top_k_honoured: control.ranked.top_k_honoured(),
            filtered: control_filtered.len(),
            limits: *control_filtered.limits(),
            subset: control_subset,
        },
        future: PeriodSelection {
            period: Period::Future,
            target: future_target,
            space_size: future_ranked.space_size(),
            ranked: future_ranked.len(),
            top_k_honoured: future_ranked.top_k_honoured(),
            filtered: future_filtered.len(),
            limits: *future_filtered.limits(),
            subset: future_subset,
        },
    })
}

/// Runs every configured scenario.
///
/// Configuration and input shapes are checked before any search. The
/// control ranking is computed once; scenarios then run in parallel and are
/// returned in configuration order.
///
/// # Errors
///
/// [`PipelineError::Configuration`] for invalid settings or inputs, or the
/// first scenario error.
#[tracing::instrument(skip_all, fields(n_scenarios = config.scenarios().len()))]
pub fn run_pipeline(
    config: &PipelineConfig,
    inputs: &PeriodMeans,
) -> Result<Vec<ScenarioSelection>, PipelineError> {
    let n_segments = config.validate()?;
    inputs.check(config, n_segments)?;

    let control = rank_control(inputs.control(), config.top_k())?;

    config
        .scenarios()
        .par_iter()
        .enumerate()
        .map(|(index, scenario)| run_scenario(config, index, scenario, &control, inputs))
        .collect()
}

/// What a run would do, computed without searching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelinePlan {
    /// Ensemble members in the control table.
    pub n_members: usize,
    /// Segments per period.
    pub n_segments: usize,
    /// Number of combinations per period.
    pub space_size: u64,
    /// Mean control winter precipitation.
    pub control_target: f64,
    /// Per-scenario targets in configuration order.
    pub scenarios: Vec<ScenarioPlan>,
}

/// Planned targets for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioPlan {
    /// Scenario name.
    pub name: String,
    /// Requested winter precipitation change in percent.
    pub target_dpr_winter_percent: f64,
    /// Winter precipitation target for the future ranking.
    pub future_target: f64,
}

/// Validates `config` against `inputs` and reports dimensions and targets.
pub fn plan_pipeline(
    config: &PipelineConfig,
    inputs: &PeriodMeans,
) -> Result<PipelinePlan, PipelineError> {
    let n_segments = config.validate()?;
    inputs.check(config, n_segments)?;
    let control = inputs.control();
    let target = control_target(control)?;
    let scenarios = config
        .scenarios()
        .iter()
        .map(|s| ScenarioPlan {
            name: s.name().to_string(),
            target_dpr_winter_percent: s.target_dpr_winter_percent(),
            future_target: s.future_target(target),
        })
        .collect();
    Ok(PipelinePlan {
        n_members: control.n_members(),
        n_segments,
        space_size: control.space()?.size(),
        control_target: target,
        scenarios,
    })
}
