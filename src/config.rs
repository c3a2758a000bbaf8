use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level KCS configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KcsConfig {
    /// Global RNG seed. Absent means seeded from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// I/O settings.
    #[serde(default)]
    pub io: IoConfig,

    /// Resampling settings.
    #[serde(default)]
    pub resample: ResampleToml,

    /// Scenario settings keyed by scenario name.
    #[serde(default)]
    pub scenarios: BTreeMap<String, ScenarioToml>,
}

impl KcsConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_control_period")]
    pub control_period: String,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input: None,
            output_dir: None,
            control_period: default_control_period(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_control_period() -> String {
    "control".to_string()
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResampleToml {
    #[serde(default = "default_period_years")]
    pub period_years: usize,
    #[serde(default = "default_step_years")]
    pub step_years: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_n_sample")]
    pub n_sample: usize,
    #[serde(default = "default_n_trials")]
    pub n_trials: usize,
}

impl Default for ResampleToml {
    fn default() -> Self {
        Self {
            period_years: default_period_years(),
            step_years: default_step_years(),
            top_k: default_top_k(),
            n_sample: default_n_sample(),
            n_trials: default_n_trials(),
        }
    }
}

fn default_period_years() -> usize {
    30
}
fn default_step_years() -> usize {
    5
}
fn default_top_k() -> usize {
    1000
}
fn default_n_sample() -> usize {
    8
}
fn default_n_trials() -> usize {
    10_000
}

/// One scenario: winter precipitation change and percentile windows.
///
/// Each window is `[low, high]` in percent. A period's three windows must be
/// given together.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioToml {
    pub target_dpr_winter_percent: f64,
    pub pr_summer_control: Option<[f64; 2]>,
    pub tas_winter_control: Option<[f64; 2]>,
    pub tas_summer_control: Option<[f64; 2]>,
    pub pr_summer_future: Option<[f64; 2]>,
    pub tas_winter_future: Option<[f64; 2]>,
    pub tas_summer_future: Option<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg: KcsConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.io.control_period, "control");
        assert_eq!(cfg.io.compression, "snappy");
        assert_eq!(cfg.resample.period_years, 30);
        assert_eq!(cfg.resample.step_years, 5);
        assert_eq!(cfg.resample.top_k, 1000);
        assert_eq!(cfg.resample.n_sample, 8);
        assert_eq!(cfg.resample.n_trials, 10_000);
        assert!(cfg.scenarios.is_empty());
    }

    #[test]
    fn full_document() {
        let src = r#"
seed = 42

[io]
input = "segment_means.parquet"
output_dir = "selections"
control_period = "ref"
compression = "zstd"

[resample]
period_years = 30
step_years = 10
top_k = 500
n_sample = 6
n_trials = 2000

[scenarios.WL]
target_dpr_winter_percent = 4.0
pr_summer_control = [10.0, 40.0]
tas_winter_control = [20.0, 80.0]
tas_summer_control = [20.0, 80.0]
pr_summer_future = [60.0, 90.0]
tas_winter_future = [10.0, 50.0]
tas_summer_future = [50.0, 90.0]

[scenarios.GH]
target_dpr_winter_percent = 17.0
"#;
        let cfg: KcsConfig = toml::from_str(src).unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.io.input, Some(PathBuf::from("segment_means.parquet")));
        assert_eq!(cfg.io.output_dir, Some(PathBuf::from("selections")));
        assert_eq!(cfg.io.control_period, "ref");
        assert_eq!(cfg.resample.step_years, 10);
        assert_eq!(cfg.resample.top_k, 500);

        let names: Vec<&str> = cfg.scenarios.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["GH", "WL"]);
        let wl = &cfg.scenarios["WL"];
        assert_eq!(wl.target_dpr_winter_percent, 4.0);
        assert_eq!(wl.pr_summer_future, Some([60.0, 90.0]));
        assert!(cfg.scenarios["GH"].tas_summer_control.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<KcsConfig>("[resample]\ntopk = 5\n").is_err());
        assert!(toml::from_str::<KcsConfig>("verbose = true\n").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = KcsConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kcs.toml");
        std::fs::write(&path, "seed = 3\n[resample]\nn_trials = 50\n").unwrap();
        let cfg = KcsConfig::load(&path).unwrap();
        assert_eq!(cfg.seed, Some(3));
        assert_eq!(cfg.resample.n_trials, 50);
    }

    #[test]
    fn scenario_requires_target() {
        let src = "[scenarios.WL]\npr_summer_control = [10.0, 40.0]\n";
        assert!(toml::from_str::<KcsConfig>(src).is_err());
    }
}
