//! Check command: validate configuration and input without searching.

use anyhow::{Context, Result};
use tracing::info_span;

use kcs_pipeline::plan_pipeline;

use crate::cli::CheckArgs;
use crate::config::KcsConfig;
use crate::convert;
use crate::select_cmd::read_inputs;

/// Validate the configuration against the input and print the plan as JSON.
pub fn run(args: CheckArgs) -> Result<()> {
    let _cmd = info_span!("check").entered();
    let config = KcsConfig::load(&args.config)?;

    let input = args
        .input
        .or_else(|| config.io.input.clone())
        .ok_or_else(|| anyhow::anyhow!("no input path: set [io].input in config or use --input"))?;

    convert::build_writer_config(&config.io)?;
    let pipeline_cfg = convert::build_pipeline_config(&config, None)?;
    let inputs = read_inputs(&input, &config.io.control_period)?;

    let plan = plan_pipeline(&pipeline_cfg, &inputs).context("configuration check failed")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("failed to serialise plan")?
    );
    Ok(())
}
