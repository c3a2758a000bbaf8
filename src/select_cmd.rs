//! Select command: run all three filters and write one table per scenario.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use kcs_io::{read_segment_means, selection_path, write_selection_parquet};
use kcs_pipeline::{PeriodMeans, RunSummary, run_pipeline};

use crate::cli::SelectArgs;
use crate::config::KcsConfig;
use crate::convert;

/// Reads the segment-means Parquet file and splits off the control period.
pub(crate) fn read_inputs(input: &Path, control_period: &str) -> Result<PeriodMeans> {
    info!(path = %input.display(), "reading segment means");
    let periods = read_segment_means(input)
        .with_context(|| format!("failed to read Parquet: {}", input.display()))?;
    info!(n_periods = periods.len(), "segment means loaded");
    PeriodMeans::from_periods(periods, control_period).context("invalid input periods")
}

/// Run the full selection pipeline.
pub fn run(args: SelectArgs) -> Result<()> {
    let _cmd = info_span!("select").entered();
    let config = KcsConfig::load(&args.config)?;

    let input: PathBuf = args
        .input
        .or_else(|| config.io.input.clone())
        .ok_or_else(|| anyhow::anyhow!("no input path: set [io].input in config or use --input"))?;
    let output_dir: PathBuf = args
        .output_dir
        .or_else(|| config.io.output_dir.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("no output directory: set [io].output_dir in config or use --output-dir")
        })?;

    let writer_cfg = convert::build_writer_config(&config.io)?;
    let pipeline_cfg = convert::build_pipeline_config(&config, args.seed)?;
    let inputs = read_inputs(&input, &config.io.control_period)?;

    info!(
        n_scenarios = pipeline_cfg.scenarios().len(),
        seed = ?pipeline_cfg.seed(),
        "running selection"
    );
    let selections = run_pipeline(&pipeline_cfg, &inputs).context("selection failed")?;

    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory: {}", output_dir.display())
    })?;
    for selection in &selections {
        let path = selection_path(&output_dir, &selection.name);
        write_selection_parquet(&path, &selection.table(), &writer_cfg)
            .with_context(|| format!("failed to write Parquet: {}", path.display()))?;
        info!(
            scenario = %selection.name,
            control_penalty = selection.control.subset.penalty(),
            future_penalty = selection.future.subset.penalty(),
            path = %path.display(),
            "selection written"
        );
    }

    let summary = RunSummary::new(pipeline_cfg.seed(), &selections);
    let summary_path = output_dir.join("summary.json");
    let json = serde_json::to_string_pretty(&summary).context("failed to serialise summary")?;
    std::fs::write(&summary_path, json)
        .with_context(|| format!("failed to write summary: {}", summary_path.display()))?;
    info!(path = %summary_path.display(), "summary written");

    Ok(())
}
