//! Statistical helper functions for KCS segment resampling.

use std::cmp::Ordering;

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Returns an ascending copy of `data`. NaN values compare as equal.
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut out = data.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out
}

/// R's default quantile algorithm (type=7), also NumPy's default `linear`
/// percentile method.
///
/// **Expects pre-sorted input** (caller's responsibility).
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Percentile on the 0–100 scale over pre-sorted data.
///
/// Equivalent to `numpy.percentile(x, pct)`. `pct` is clamped to `[0, 100]`.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    quantile_type7(sorted, (pct / 100.0).clamp(0.0, 1.0))
}
