//! Small statistics helpers for level scoring
//!
//! Z-score normalization across buffered levels is the backbone of the
//! teacher's composite score. All functions here are pure and handle
//! degenerate inputs (empty, single-element, zero-variance) explicitly
//! rather than relying on incidental floating-point behavior.

/// Floor for standard deviations and probability denominators.
pub const EPSILON: f64 = 1e-8;

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; `0.0` for slices shorter than two.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Z-score normalize a metric vector: `(x - mean) / max(std, EPSILON)`.
///
/// An identically-zero input normalizes to all zeros instead of being
/// shifted by the epsilon floor.
pub fn zscore_normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    if values.iter().all(|v| *v == 0.0) {
        return vec![0.0; values.len()];
    }
    let m = mean(values);
    let s = std_dev(values).max(EPSILON);
    values.iter().map(|v| (v - m) / s).collect()
}

/// Euclidean distance between two equal-length vectors.
///
/// # Panics
///
/// Panics if the vectors have different lengths (embedding dimensions are
/// fixed at buffer construction, so a mismatch is a programming error).
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "Embedding dimension mismatch");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
