//! Candidate ranking for KCS resampling (filter 1).
//!
//! Every combination of a [`MeanGrid`](kcs_segments::MeanGrid) is scored by
//! the distance between its recombined mean and a target value, and the
//! `top_k` closest are kept. The search streams over the index space with a
//! bounded heap per worker instead of materialising all `n_members ^
//! n_segments` combinations.
//!
//! ```text
//! rank_combinations()
//!   ├─ validate config and target
//!   ├─ CombinationSpace::new()    (overflow check)
//!   ├─ par fold: decode → score → TopK::push   (topk.rs)
//!   └─ reduce: TopK::merge → sorted candidates
//! ```

pub mod config;
pub mod error;
pub mod rank;
pub mod result;

pub(crate) mod topk;

pub use config::RankConfig;
pub use error::RankError;
pub use rank::rank_combinations;
pub use result::{RankedCandidate, RankedCandidates};
