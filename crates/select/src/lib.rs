//! Penalty-minimising subset selection for KCS resampling (filter 3).
//!
//! From the candidates surviving the distribution filter, a subset of
//! `n_sample` combinations is chosen so that no ensemble member is reused
//! too often at the same segment position. The search is a seeded
//! best-of-N random draw scored by [`reuse_penalty`].

pub mod config;
pub mod error;
pub mod penalty;
pub mod search;

pub use config::SelectConfig;
pub use error::SelectError;
pub use penalty::{count_penalty, reuse_penalty};
pub use search::{FinalSubset, select_min_penalty};
