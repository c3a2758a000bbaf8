//! Randomised best-of-N search for the least-penalised subset.

use kcs_segments::Combination;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::config::SelectConfig;
use crate::error::SelectError;
use crate::penalty::penalty_of;

/// Trials evaluated per RNG stream. Fixed so results do not depend on the
/// rayon thread count.
const TRIALS_PER_CHUNK: usize = 256;

/// Least-penalised subset found by [`select_min_penalty`].
#[derive(Debug, Clone, PartialEq)]
pub struct FinalSubset {
    combinations: Vec<Combination>,
    indices: Vec<usize>,
    penalty: u32,
    trials_run: usize,
    best_trial: usize,
    seed: u64,
}

impl FinalSubset {
    /// Returns the selected combinations (length `n_sample`).
    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    /// Returns the positions of the selected combinations in the input.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the reuse penalty of the subset.
    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    /// Returns the number of trials evaluated.
    pub fn trials_run(&self) -> usize {
        self.trials_run
    }

    /// Returns the index of the trial that produced this subset.
    pub fn best_trial(&self) -> usize {
        self.best_trial
    }

    /// Returns the base seed the search ran with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the subset size.
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    /// Returns `true` if the subset is empty.
    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }
}

/// Best trial of one chunk, plus how many trials the chunk ran.
#[derive(Debug, Clone)]
struct ChunkOutcome {
    penalty: u32,
    trial: usize,
    picks: Vec<usize>,
    trials: usize,
}

impl ChunkOutcome {
    fn empty() -> Self {
        Self {
            penalty: u32::MAX,
            trial: usize::MAX,
            picks: Vec::new(),
            trials: 0,
        }
    }

    /// Keeps the lower `(penalty, trial)` and adds the trial counts.
    fn merge(self, other: Self) -> Self {
        let trials = self.trials + other.trials;
        let mut best = if (other.penalty, other.trial) < (self.penalty, self.trial) {
            other
        } else {
            self
        };
        best.trials = trials;
        best
    }
}

fn run_chunk(
    candidates: &[Combination],
    n_sample: usize,
    trials: std::ops::Range<usize>,
    seed: u64,
) -> ChunkOutcome {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut column = Vec::with_capacity(n_sample);
    let mut picks = vec![0usize; n_sample];
    let mut subset: Vec<&Combination> = Vec::with_capacity(n_sample);
    let mut out = ChunkOutcome::empty();

    for trial in trials {
        subset.clear();
        for slot in picks.iter_mut() {
            *slot = rng.random_range(0..candidates.len());
            subset.push(&candidates[*slot]);
        }
        let penalty = penalty_of(&subset, &mut column);
        if penalty < out.penalty {
            out.penalty = penalty;
            out.trial = trial;
            out.picks.clone_from(&picks);
        }
        out.trials += 1;
    }
    out
}

/// Draws `n_trials` random subsets of `n_sample` candidates (uniform, with
/// replacement) and returns the one with the lowest
/// [`reuse_penalty`](crate::reuse_penalty). Ties go to the earliest trial.
///
/// Trials run in parallel in fixed chunks; chunk `c` draws from
/// `StdRng::seed_from_u64(seed + c)` (wrapping). With a configured seed the
/// result is reproducible regardless of thread count; without one the base
/// seed is drawn from the OS and reported in [`FinalSubset::seed`].
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SelectError::InvalidNSample`] | `n_sample == 0` |
/// | [`SelectError::InvalidNTrials`] | `n_trials == 0` |
/// | [`SelectError::EmptyCandidates`] | `candidates` is empty |
/// | [`SelectError::LengthMismatch`] | candidates differ in length |
///
/// # Example
///
/// ```
/// use kcs_segments::Combination;
/// use kcs_select::{SelectConfig, select_min_penalty};
///
/// let candidates: Vec<Combination> =
///     (0..20).map(|i| Combination::new(vec![i % 5, (i * 3) % 7])).collect();
/// let config = SelectConfig::default().with_n_trials(200).with_seed(1);
/// let subset = select_min_penalty(&candidates, &config).unwrap();
/// assert_eq!(subset.len(), 8);
/// assert_eq!(subset.trials_run(), 200);
/// ```
#[tracing::instrument(skip_all, fields(
    population = candidates.len(),
    n_sample = config.n_sample(),
    n_trials = config.n_trials(),
))]
pub fn select_min_penalty(
    candidates: &[Combination],
    config: &SelectConfig,
) -> Result<FinalSubset, SelectError> {
    config.validate()?;
    let Some(first) = candidates.first() else {
        return Err(SelectError::EmptyCandidates);
    };
    let expected = first.len();
    if let Some((index, c)) = candidates
        .iter()
        .enumerate()
        .find(|(_, c)| c.len() != expected)
    {
        return Err(SelectError::LengthMismatch {
            index,
            expected,
            got: c.len(),
        });
    }

    let n_sample = config.n_sample();
    let n_trials = config.n_trials();
    let seed = config
        .seed()
        .unwrap_or_else(|| StdRng::from_os_rng().random());

    let n_chunks = n_trials.div_ceil(TRIALS_PER_CHUNK);
    let best = (0..n_chunks)
        .into_par_iter()
        .map(|c| {
            let start = c * TRIALS_PER_CHUNK;
            let end = (start + TRIALS_PER_CHUNK).min(n_trials);
            run_chunk(
                candidates,
                n_sample,
                start..end,
                seed.wrapping_add(c as u64),
            )
        })
        .reduce(ChunkOutcome::empty, ChunkOutcome::merge);

    debug!(
        penalty = best.penalty,
        best_trial = best.trial,
        trials_run = best.trials,
        seed,
        "selection complete"
    );

    Ok(FinalSubset {
        combinations: best.picks.iter().map(|&i| candidates[i].clone()).collect(),
        indices: best.picks,
        penalty: best.penalty,
        trials_run: best.trials,
        best_trial: best.trial,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::penalty::reuse_penalty;

    fn population(n: usize) -> Vec<Combination> {
        (0..n)
            .map(|i| Combination::new(vec![i % 4, (i / 4) % 4, (i * 5) % 4]))
            .collect()
    }

    #[test]
    fn test_merge_prefers_lower_penalty_then_earlier_trial() {
        let a = ChunkOutcome {
            penalty: 5,
            trial: 10,
            picks: vec![1],
            trials: 256,
        };
        let b = ChunkOutcome {
            penalty: 5,
            trial: 300,
            picks: vec![2],
            trials: 100,
        };
        let merged = b.clone().merge(a.clone());
        assert_eq!(merged.trial, 10);
        assert_eq!(merged.trials, 356);

        let c = ChunkOutcome {
            penalty: 1,
            trial: 400,
            picks: vec![3],
            trials: 1,
        };
        assert_eq!(a.merge(c).picks, vec![3]);
    }

    #[test]
    fn test_empty_is_identity() {
        let a = ChunkOutcome {
            penalty: 100,
            trial: 0,
            picks: vec![0, 0],
            trials: 3,
        };
        let merged = ChunkOutcome::empty().merge(a);
        assert_eq!(merged.penalty, 100);
        assert_eq!(merged.trials, 3);
    }

    #[test]
    fn test_penalty_matches_recomputation() {
        let pop = population(30);
        let out = select_min_penalty(&pop, &SelectConfig::default().with_n_trials(300).with_seed(9))
            .unwrap();
        assert_eq!(out.penalty(), reuse_penalty(out.combinations()));
        for (c, &i) in out.combinations().iter().zip(out.indices()) {
            assert_eq!(c, &pop[i]);
        }
    }

    #[test]
    fn test_trials_run_is_exact() {
        let pop = population(10);
        for n_trials in [1, 255, 256, 257, 1000] {
            let config = SelectConfig::default().with_n_trials(n_trials).with_seed(1);
            let out = select_min_penalty(&pop, &config).unwrap();
            assert_eq!(out.trials_run(), n_trials);
            assert!(out.best_trial() < n_trials);
        }
    }

    #[test]
    fn test_rejects_mixed_lengths() {
        let pop = vec![Combination::new(vec![0, 1]), Combination::new(vec![0])];
        assert_eq!(
            select_min_penalty(&pop, &SelectConfig::default().with_seed(0)),
            Err(SelectError::LengthMismatch {
                index: 1,
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_unseeded_reports_seed() {
        let pop = population(12);
        let out = select_min_penalty(&pop, &SelectConfig::default().with_n_trials(50)).unwrap();
        let again = select_min_penalty(
            &pop,
            &SelectConfig::default().with_n_trials(50).with_seed(out.seed()),
        )
        .unwrap();
        assert_eq!(out, again);
    }
}
