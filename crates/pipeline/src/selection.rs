//! Per-scenario results and the output table.

use kcs_filter::StatLimits;
use kcs_segments::Combination;
use kcs_select::FinalSubset;
use serde::Serialize;

use crate::error::Period;

/// Outcome of all three filters for one population of one scenario.
#[derive(Debug, Clone)]
pub struct PeriodSelection {
    /// Population this selection was drawn from.
    pub period: Period,
    /// Winter precipitation target used by filter 1.
    pub target: f64,
    /// Size of the combination space.
    pub space_size: u64,
    /// Candidates kept by filter 1.
    pub ranked: usize,
    /// `false` when the space was smaller than `top_k`.
    pub top_k_honoured: bool,
    /// Candidates surviving filter 2.
    pub filtered: usize,
    /// Value ranges applied by filter 2.
    pub limits: StatLimits,
    /// Subset chosen by filter 3.
    pub subset: FinalSubset,
}

/// Final control and future subsets for one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioSelection {
    /// Scenario name.
    pub name: String,
    /// Position of the scenario in the configuration.
    pub index: usize,
    /// Requested relative winter precipitation change in percent.
    pub target_dpr_winter_percent: f64,
    /// Control-period selection.
    pub control: PeriodSelection,
    /// Future-period selection.
    pub future: PeriodSelection,
}

impl ScenarioSelection {
    /// Pairs the control and future subsets row by row.
    pub fn table(&self) -> SelectionTable {
        let rows = self
            .control
            .subset
            .combinations()
            .iter()
            .zip(self.future.subset.combinations())
            .enumerate()
            .map(|(row, (control, future))| SelectionRow {
                row,
                control: control.clone(),
                control_penalty: self.control.subset.penalty(),
                future: future.clone(),
                future_penalty: self.future.subset.penalty(),
            })
            .collect();
        SelectionTable::new(rows)
    }

    /// Serialisable digest of this selection.
    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            name: self.name.clone(),
            target_dpr_winter_percent: self.target_dpr_winter_percent,
            control: PeriodSummary::from(&self.control),
            future: PeriodSummary::from(&self.future),
        }
    }
}

/// One output row: a control and a future combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRow {
    /// Row number, from 0.
    pub row: usize,
    /// Control combination.
    pub control: Combination,
    /// Penalty of the whole control subset.
    pub control_penalty: u32,
    /// Future combination.
    pub future: Combination,
    /// Penalty of the whole future subset.
    pub future_penalty: u32,
}

/// `n_sample` rows of paired control and future combinations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionTable {
    n_segments: usize,
    rows: Vec<SelectionRow>,
}

impl SelectionTable {
    /// Wraps rows; the segment count is taken from the first control
    /// combination.
    pub fn new(rows: Vec<SelectionRow>) -> Self {
        Self {
            n_segments: rows.first().map_or(0, |r| r.control.len()),
            rows,
        }
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[SelectionRow] {
        &self.rows
    }

    /// Returns the number of segment columns per period.
    pub fn n_segments(&self) -> usize {
        self.n_segments
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Digest of a [`PeriodSelection`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    /// Winter precipitation target of filter 1.
    pub target: f64,
    /// Size of the combination space.
    pub space_size: u64,
    /// Candidates kept by filter 1.
    pub ranked: usize,
    /// `false` when the space was smaller than `top_k`.
    pub top_k_honoured: bool,
    /// Candidates surviving filter 2.
    pub filtered: usize,
    /// Value ranges applied by filter 2.
    pub limits: StatLimits,
    /// Reuse penalty of the chosen subset.
    pub penalty: u32,
    /// Trials executed by filter 3.
    pub trials_run: usize,
    /// Trial that produced the chosen subset.
    pub best_trial: usize,
    /// Base seed of the filter-3 search.
    pub seed: u64,
    /// The chosen subset.
    pub combinations: Vec<Combination>,
}

impl From<&PeriodSelection> for PeriodSummary {
    fn from(p: &PeriodSelection) -> Self {
        Self {
            target: p.target,
            space_size: p.space_size,
            ranked: p.ranked,
            top_k_honoured: p.top_k_honoured,
            filtered: p.filtered,
            limits: p.limits,
            penalty: p.subset.penalty(),
            trials_run: p.subset.trials_run(),
            best_trial: p.subset.best_trial(),
            seed: p.subset.seed(),
            combinations: p.subset.combinations().to_vec(),
        }
    }
}

/// Digest of a [`ScenarioSelection`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    /// Scenario name.
    pub name: String,
    /// Requested winter precipitation change in percent.
    pub target_dpr_winter_percent: f64,
    /// Control-period digest.
    pub control: PeriodSummary,
    /// Future-period digest.
    pub future: PeriodSummary,
}

/// Digest of a whole run, written as `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Configured run seed, if any.
    pub seed: Option<u64>,
    /// Scenario digests in configuration order.
    pub scenarios: Vec<ScenarioSummary>,
}

impl RunSummary {
    /// Summarises `selections` in order.
    pub fn new(seed: Option<u64>, selections: &[ScenarioSelection]) -> Self {
        Self {
            seed,
            scenarios: selections.iter().map(ScenarioSelection::summary).collect(),
        }
    }
}
