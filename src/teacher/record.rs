//! Per-level statistics record

use serde::Serialize;

/// Statistics tracked for one distinct level
///
/// The derived fields (`regret`, `novelty`, `progress`, `composite_score`)
/// are recomputed on every scoring pass; only `observed_returns` and the
/// embedding carry state between passes.
#[derive(Debug, Clone, Serialize)]
pub struct LevelRecord {
    /// Opaque level identifier
    pub id: String,

    /// Returns observed on this level, in insertion order
    ///
    /// Append-only; the latest two entries feed the progress metric.
    pub observed_returns: Vec<f64>,

    /// Regret relative to the approximate optimum (derived)
    pub regret: f64,

    /// Mean embedding distance to other buffered levels (derived)
    pub novelty: f64,

    /// Magnitude of change across the two latest returns (derived)
    pub progress: f64,

    /// Weighted combination of the normalized metrics (derived)
    pub composite_score: f64,

    /// Fixed-length embedding over the level vocabulary
    pub embedding: Vec<f64>,
}

impl LevelRecord {
    /// Create a record with no observed returns and zeroed derived fields
    pub fn new(id: impl Into<String>, embedding: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            observed_returns: Vec::new(),
            regret: 0.0,
            novelty: 0.0,
            progress: 0.0,
            composite_score: 0.0,
            embedding,
        }
    }

    /// Append an observed return
    pub fn push_return(&mut self, value: f64) {
        self.observed_returns.push(value);
    }

    /// Mean observed return; `0.0` with no observations
    pub fn mean_return(&self) -> f64 {
        crate::utils::stats::mean(&self.observed_returns)
    }

    /// The two most recent returns as (previous, latest), if available
    pub fn latest_pair(&self) -> Option<(f64, f64)> {
        let n = self.observed_returns.len();
        if n < 2 {
            return None;
        }
        Some((self.observed_returns[n - 2], self.observed_returns[n - 1]))
    }
}
