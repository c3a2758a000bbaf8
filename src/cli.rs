use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// KCS segment resampling of climate ensembles.
#[derive(Parser)]
#[command(
    name = "kcs",
    version,
    about = "Select representative resampled segment combinations for climate scenarios"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the three-stage selection and write one table per scenario.
    Select(SelectArgs),
    /// Validate configuration and input without running the search.
    Check(CheckArgs),
}

/// Arguments for the `select` subcommand.
#[derive(clap::Args)]
pub struct SelectArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "kcs.toml")]
    pub config: PathBuf,

    /// Override input segment-means Parquet path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override output directory from config.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "kcs.toml")]
    pub config: PathBuf,

    /// Override input segment-means Parquet path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}
