//! Streaming top-K ranking over the full combination space.

use kcs_segments::{CombinationSpace, MeanGrid};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::RankConfig;
use crate::error::RankError;
use crate::result::{RankedCandidate, RankedCandidates};
use crate::topk::TopK;

/// Ranks every combination of `grid` by `|recombined_mean - target|` and
/// keeps the `top_k` closest.
///
/// The space is enumerated by index in parallel; each worker keeps its own
/// bounded heap and the heaps are merged, so memory is O(top_k) per worker
/// regardless of the space size. Output is sorted by ascending distance,
/// ties broken by lexicographic order of the combination.
///
/// If the space holds fewer than `top_k` combinations, all of them are
/// returned, a warning is logged and
/// [`RankedCandidates::top_k_honoured`] reports `false`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`RankError::InvalidTopK`] | `top_k == 0` |
/// | [`RankError::NonFiniteTarget`] | `target` is NaN or infinite |
/// | [`RankError::Segments`] | `n_members ^ n_segments` overflows `u64` |
///
/// # Example
///
/// ```
/// use kcs_rank::{RankConfig, rank_combinations};
/// use kcs_segments::MeanGrid;
///
/// // 2 members x 2 segments.
/// let grid = MeanGrid::new(2, 2, vec![1.0, 3.0, 2.0, 4.0]).unwrap();
/// let ranked = rank_combinations(&grid, 2.5, &RankConfig::new(2)).unwrap();
/// assert_eq!(ranked.len(), 2);
/// assert_eq!(ranked.candidates()[0].combination.members(), &[0, 1]);
/// ```
#[tracing::instrument(skip(grid, config), fields(top_k = config.top_k()))]
pub fn rank_combinations(
    grid: &MeanGrid,
    target: f64,
    config: &RankConfig,
) -> Result<RankedCandidates, RankError> {
    config.validate()?;
    if !target.is_finite() {
        return Err(RankError::NonFiniteTarget { target });
    }

    let space = CombinationSpace::new(grid.n_members(), grid.n_segments())?;
    let k = config.top_k();

    if space.size() < k as u64 {
        warn!(
            space_size = space.size(),
            top_k = k,
            "combination space smaller than top_k; keeping all combinations"
        );
    }

    let n_segments = space.n_segments();
    let top = (0..space.size())
        .into_par_iter()
        .fold(
            || (TopK::new(k), vec![0usize; n_segments]),
            |(mut top, mut members), index| {
                space.decode_into(index, &mut members);
                let distance = (grid.recombined_mean(&members) - target).abs();
                top.push(distance, index);
                (top, members)
            },
        )
        .map(|(top, _)| top)
        .reduce(|| TopK::new(k), TopK::merge);

    let candidates: Vec<RankedCandidate> = top
        .into_sorted()
        .into_iter()
        .map(|(distance, index)| {
            let combination = space.decode(index);
            let mean = grid.recombined_mean(combination.members());
            RankedCandidate {
                index,
                combination,
                mean,
                distance,
            }
        })
        .collect();

    debug!(
        space_size = space.size(),
        kept = candidates.len(),
        best_distance = candidates.first().map(|c| c.distance),
        "ranking complete"
    );

    Ok(RankedCandidates::new(candidates, target, space.size(), k))
}
