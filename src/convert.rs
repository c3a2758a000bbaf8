//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use kcs_filter::{DistributionBounds, PercentileBound};
use kcs_io::{Compression, WriterConfig};
use kcs_pipeline::{PipelineConfig, ScenarioConfig};

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoConfig) -> Result<WriterConfig> {
    if io.row_group_size == 0 {
        bail!("row_group_size must be >= 1");
    }
    Ok(WriterConfig::default()
        .with_compression(parse_compression(&io.compression)?)
        .with_row_group_size(io.row_group_size))
}

fn percentile_bound(window: [f64; 2], field: &str) -> Result<PercentileBound> {
    PercentileBound::try_from(window).with_context(|| format!("invalid {field} window"))
}

/// Converts one period's three percentile windows into [`DistributionBounds`].
///
/// Returns `None` when all three are absent. A partial set is an error.
pub fn build_bounds(
    pr_summer: Option<[f64; 2]>,
    tas_winter: Option<[f64; 2]>,
    tas_summer: Option<[f64; 2]>,
    period: &str,
) -> Result<Option<DistributionBounds>> {
    match (pr_summer, tas_winter, tas_summer) {
        (None, None, None) => Ok(None),
        (Some(pr), Some(tw), Some(ts)) => Ok(Some(DistributionBounds::new(
            percentile_bound(pr, &format!("pr_summer_{period}"))?,
            percentile_bound(tw, &format!("tas_winter_{period}"))?,
            percentile_bound(ts, &format!("tas_summer_{period}"))?,
        ))),
        _ => bail!(
            "{period} windows must set all of pr_summer_{period}, tas_winter_{period} \
             and tas_summer_{period}, or none"
        ),
    }
}

/// Converts one TOML scenario into a [`ScenarioConfig`].
pub fn build_scenario(name: &str, s: &ScenarioToml) -> Result<ScenarioConfig> {
    let mut scenario = ScenarioConfig::new(name, s.target_dpr_winter_percent);
    if let Some(b) = build_bounds(
        s.pr_summer_control,
        s.tas_winter_control,
        s.tas_summer_control,
        "control",
    )? {
        scenario = scenario.with_control_bounds(b);
    }
    if let Some(b) = build_bounds(
        s.pr_summer_future,
        s.tas_winter_future,
        s.tas_summer_future,
        "future",
    )? {
        scenario = scenario.with_future_bounds(b);
    }
    Ok(scenario)
}

/// Builds a [`PipelineConfig`] from the TOML configuration.
///
/// `seed_override` takes precedence over the TOML seed. Scenarios keep the
/// TOML table's key order.
pub fn build_pipeline_config(
    config: &KcsConfig,
    seed_override: Option<u64>,
) -> Result<PipelineConfig> {
    let r = &config.resample;
    let mut cfg = PipelineConfig::new()
        .with_period_years(r.period_years)
        .with_step_years(r.step_years)
        .with_top_k(r.top_k)
        .with_n_sample(r.n_sample)
        .with_n_trials(r.n_trials)
        .with_seed_opt(seed_override.or(config.seed));
    for (name, s) in &config.scenarios {
        let scenario = build_scenario(name, s).with_context(|| format!("scenario {name:?}"))?;
        cfg = cfg.with_scenario(scenario);
    }
    Ok(cfg)
}
