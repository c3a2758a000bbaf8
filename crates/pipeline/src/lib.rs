//! Scenario pipeline for KCS segment resampling.
//!
//! ```text
//! run_pipeline()
//!   ├─ PipelineConfig::validate() + PeriodMeans::check()
//!   ├─ rank_control()              filter 1 on control, once
//!   └─ par over scenarios: run_scenario()
//!        ├─ rank_combinations()    filter 1 on future table
//!        ├─ filter_by_percentiles() control + future
//!        ├─ insufficient-candidate guard
//!        └─ select_min_penalty()   control ∥ future
//! ```
//!
//! Each scenario yields a [`ScenarioSelection`]; its
//! [`table`](ScenarioSelection::table) pairs the two subsets row by row.

pub mod config;
pub mod error;
pub mod inputs;
pub mod pipeline;
pub mod selection;

pub use config::{PipelineConfig, ScenarioConfig};
pub use error::{Period, PipelineError};
pub use inputs::PeriodMeans;
pub use pipeline::{
    ControlRanking, PipelinePlan, ScenarioPlan, control_target, derive_seed, plan_pipeline,
    rank_control, run_pipeline, run_scenario,
};
pub use selection::{
    PeriodSelection, PeriodSummary, RunSummary, ScenarioSelection, ScenarioSummary, SelectionRow,
    SelectionTable,
};
