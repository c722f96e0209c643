//! Temperature-scaled softmax sampling over level scores
//!
//! Pure functions so the degenerate branches (empty input, single element,
//! all-equal scores, near-zero temperature) can be unit-tested directly.

use rand::Rng;

use crate::utils::stats::EPSILON;

/// Convert scores into a probability simplex via temperature softmax
///
/// The maximum score is subtracted before exponentiation for numerical
/// stability; the temperature and the normalizing denominator are both
/// floored at epsilon.
pub fn softmax(scores: &[f64], temperature: f64) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let t = temperature.max(EPSILON);
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| ((s - max) / t).exp()).collect();
    let denom = exps.iter().sum::<f64>().max(EPSILON);
    exps.iter().map(|e| e / denom).collect()
}

/// Draw an index from a categorical distribution
///
/// `probs` must be non-empty. Accumulated rounding error is absorbed by
/// the final index.
pub fn sample_index<R: Rng>(probs: &[f64], rng: &mut R) -> usize {
    assert!(!probs.is_empty(), "Cannot sample from an empty distribution");
    let threshold: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if threshold < cumulative {
            return i;
        }
    }
    probs.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_sums_to_one(probs: &[f64]) {
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "probabilities sum to {total}");
    }

    #[test]
    fn test_softmax_empty() {
        assert!(softmax(&[], 1.0).is_empty());
    }

    #[test]
    fn test_softmax_single_element() {
        let probs = softmax(&[3.7], 1.0);
        assert_eq!(probs, vec![1.0]);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 5.0, 2.0], 1.0);
        assert_sums_to_one(&probs);
    }

    #[test]
    fn test_softmax_all_equal_is_uniform() {
        let probs = softmax(&[2.0, 2.0, 2.0, 2.0], 1.0);
        assert_sums_to_one(&probs);
        for p in probs {
            assert!((p - 0.25).abs() < 1e-9);
        }
    }

    #[test]
    fn test_softmax_all_zero_is_uniform() {
        let probs = softmax(&[0.0, 0.0], 1.0);
        assert_sums_to_one(&probs);
        assert!((probs[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_low_temperature_approaches_argmax() {
        // temperature -> 0 with scores [1, 5, 2] selects index 1 w.p. -> 1
        let probs = softmax(&[1.0, 5.0, 2.0], 1e-6);
        assert_sums_to_one(&probs);
        assert!(probs[1] > 0.999);
    }

    #[test]
    fn test_zero_temperature_is_floored_not_nan() {
        let probs = softmax(&[1.0, 5.0, 2.0], 0.0);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[1] > 0.999);
    }

    #[test]
    fn test_high_temperature_flattens() {
        let probs = softmax(&[1.0, 5.0, 2.0], 1e6);
        assert_sums_to_one(&probs);
        for p in &probs {
            assert!((p - 1.0 / 3.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_sample_index_respects_distribution() {
        let mut rng = StdRng::seed_from_u64(7);
        let probs = vec![0.0, 1.0, 0.0];
        for _ in 0..50 {
            assert_eq!(sample_index(&probs, &mut rng), 1);
        }
    }

    #[test]
    fn test_sample_index_covers_support() {
        let mut rng = StdRng::seed_from_u64(42);
        let probs = vec![0.5, 0.5];
        let mut counts = [0usize; 2];
        for _ in 0..1000 {
            counts[sample_index(&probs, &mut rng)] += 1;
        }
        assert!(counts[0] > 300);
        assert!(counts[1] > 300);
    }
}
