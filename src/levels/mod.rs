//! Level vocabulary and mutation
//!
//! The vocabulary maps level identifiers to their approximate-optimal
//! returns and splits them into training ("available") and held-out
//! evaluation sets. It also produces the fixed-length embeddings used by
//! the teacher's novelty metric. The vocabulary is loaded once by the
//! caller and passed into the teacher at construction; there is no
//! process-wide layout table.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

mod mutate;

pub use mutate::{
    swap_player_starts, swap_tiles, GridSwapMutator, LevelMutator, MutationError, SiblingMutator,
};

fn default_fallback_optimal() -> f64 {
    200.0
}

/// Vocabulary of known levels and their approximate-optimal returns
///
/// # Example
///
/// ```rust
/// use ued_rl::levels::LevelVocabulary;
///
/// let vocab = LevelVocabulary::new(
///     vec!["cramped_room".into(), "coordination_ring".into()],
///     vec!["forced_coordination".into()],
/// );
/// assert_eq!(vocab.embedding_dim(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelVocabulary {
    /// Levels available for training
    available: Vec<String>,

    /// Held-out levels used only for evaluation
    #[serde(default)]
    held_out: Vec<String>,

    /// Approximate optimal return per level (for regret)
    #[serde(default)]
    optimal_returns: HashMap<String, f64>,

    /// Fallback optimal return for levels missing from the table
    #[serde(default = "default_fallback_optimal")]
    fallback_optimal: f64,
}

impl LevelVocabulary {
    /// Create a vocabulary with the default fallback optimal return
    pub fn new(available: Vec<String>, held_out: Vec<String>) -> Self {
        Self {
            available,
            held_out,
            optimal_returns: HashMap::new(),
            fallback_optimal: default_fallback_optimal(),
        }
    }

    /// Set the approximate optimal return for a level
    pub fn with_optimal_return(mut self, level: impl Into<String>, value: f64) -> Self {
        self.optimal_returns.insert(level.into(), value);
        self
    }

    /// Set the fallback optimal return for unknown levels
    pub fn with_fallback_optimal(mut self, value: f64) -> Self {
        self.fallback_optimal = value;
        self
    }

    /// Load a vocabulary from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read level vocabulary from {}", path.display()))?;
        let vocab: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse level vocabulary {}", path.display()))?;
        Ok(vocab)
    }

    /// Levels available for training
    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// Held-out evaluation levels
    pub fn held_out(&self) -> &[String] {
        &self.held_out
    }

    /// Whether the identifier names a known training level
    pub fn contains(&self, level: &str) -> bool {
        self.available.iter().any(|l| l == level)
    }

    /// Length of level embeddings (the training vocabulary size)
    pub fn embedding_dim(&self) -> usize {
        self.available.len()
    }

    /// One-hot embedding of a level over the training vocabulary
    ///
    /// Unknown identifiers (e.g. mutated variants) map to the zero vector,
    /// which keeps them maximally distant from every one-hot level.
    pub fn embedding(&self, level: &str) -> Vec<f64> {
        let mut vec = vec![0.0; self.available.len()];
        if let Some(idx) = self.available.iter().position(|l| l == level) {
            vec[idx] = 1.0;
        }
        vec
    }

    /// Approximate optimal return for a level
    ///
    /// Falls back to the configured constant for levels missing from the
    /// table rather than erroring.
    pub fn optimal_return(&self, level: &str) -> f64 {
        self.optimal_returns
            .get(level)
            .copied()
            .unwrap_or(self.fallback_optimal)
    }
}
