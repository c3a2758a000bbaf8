//! Subset size, penalty and reproducibility of the selector.

use kcs_segments::Combination;
use kcs_select::{SelectConfig, SelectError, reuse_penalty, select_min_penalty};

fn population(n: usize, n_members: usize, n_segments: usize) -> Vec<Combination> {
    (0..n)
        .map(|i| {
            Combination::new(
                (0..n_segments)
                    .map(|s| (i * (s + 1) + s * 3) % n_members)
                    .collect(),
            )
        })
        .collect()
}

#[test]
fn always_returns_n_sample() {
    for n in [1, 2, 7, 8, 9, 150] {
        let pop = population(n, 8, 6);
        let config = SelectConfig::default().with_n_trials(100).with_seed(42);
        let out = select_min_penalty(&pop, &config).unwrap();
        assert_eq!(out.len(), 8, "population {n}");
        assert!(out.combinations().iter().all(|c| pop.contains(c)));
    }
}

#[test]
fn single_candidate_is_repeated() {
    let pop = vec![Combination::new(vec![2, 0, 1])];
    let config = SelectConfig::default().with_n_trials(10).with_seed(0);
    let out = select_min_penalty(&pop, &config).unwrap();
    assert!(out.combinations().iter().all(|c| c == &pop[0]));
    // 8 repeats at each of 3 positions.
    assert_eq!(out.penalty(), 300);
}

#[test]
fn sparse_member_indices_need_no_dense_buffer() {
    let pop: Vec<Combination> = (0..4)
        .map(|i| Combination::new(vec![usize::MAX - i, 1_000_000_000 + i]))
        .collect();
    let config = SelectConfig::default().with_n_trials(50).with_seed(3);
    let out = select_min_penalty(&pop, &config).unwrap();
    assert_eq!(out.len(), 8);
    assert_eq!(out.penalty(), reuse_penalty(out.combinations()));
}

#[test]
fn seeded_runs_are_reproducible() {
    let pop = population(60, 8, 6);
    let config = SelectConfig::default().with_n_trials(100).with_seed(2024);
    let a = select_min_penalty(&pop, &config).unwrap();
    let b = select_min_penalty(&pop, &config).unwrap();
    assert_eq!(a.penalty(), b.penalty());
    assert_eq!(a.combinations(), b.combinations());
    assert_eq!(a.best_trial(), b.best_trial());
}

#[test]
fn result_is_independent_of_thread_count() {
    let pop = population(80, 8, 6);
    let config = SelectConfig::default().with_n_trials(2000).with_seed(5);
    let run = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| select_min_penalty(&pop, &config).unwrap())
    };
    assert_eq!(run(1), run(4));
}

#[test]
fn more_trials_never_worse() {
    let pop = population(40, 5, 6);
    let few = select_min_penalty(&pop, &SelectConfig::default().with_n_trials(256).with_seed(11))
        .unwrap();
    let many = select_min_penalty(&pop, &SelectConfig::default().with_n_trials(4096).with_seed(11))
        .unwrap();
    // The first 256 trials are shared, so the larger search can only improve.
    assert!(many.penalty() <= few.penalty());
}

#[test]
fn reported_penalty_is_subset_penalty() {
    let pop = population(30, 6, 4);
    let out = select_min_penalty(&pop, &SelectConfig::default().with_n_trials(500).with_seed(3))
        .unwrap();
    assert_eq!(out.penalty(), reuse_penalty(out.combinations()));
}

#[test]
fn penalty_steps_for_one_repeated_member() {
    // Member 7 at position 0 repeated k times, every other entry distinct.
    let subset = |k: usize| -> Vec<Combination> {
        (0..8)
            .map(|i| Combination::new(vec![if i < k { 7 } else { 10 + i }, 20 + i]))
            .collect()
    };
    assert_eq!(reuse_penalty(&subset(1)), 0);
    assert_eq!(reuse_penalty(&subset(2)), 0);
    assert_eq!(reuse_penalty(&subset(3)), 1);
    assert_eq!(reuse_penalty(&subset(4)), 5);
    assert_eq!(reuse_penalty(&subset(5)), 100);
}

#[test]
fn rejects_invalid_inputs() {
    let pop = population(5, 4, 2);
    assert_eq!(
        select_min_penalty(&[], &SelectConfig::default()),
        Err(SelectError::EmptyCandidates)
    );
    assert_eq!(
        select_min_penalty(&pop, &SelectConfig::default().with_n_sample(0)),
        Err(SelectError::InvalidNSample { n_sample: 0 })
    );
    assert_eq!(
        select_min_penalty(&pop, &SelectConfig::default().with_n_trials(0)),
        Err(SelectError::InvalidNTrials { n_trials: 0 })
    );
}
