//! Teacher agent: curriculum selection over a bounded level buffer
//!
//! The teacher maintains a bounded buffer of candidate levels, scores them
//! by regret, novelty, and learning progress, and samples the next training
//! level through a temperature-scaled softmax over composite scores. It is
//! the only component that mutates buffer state; the training loop consumes
//! its public operations.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

mod buffer;
mod record;
pub mod sampler;
pub mod scoring;

pub use buffer::{EvictionPolicy, LevelBuffer};
pub use record::LevelRecord;
pub use scoring::{LevelScores, ScoreSnapshot};

use crate::levels::{LevelMutator, LevelVocabulary};

/// Teacher configuration parameters
///
/// The default weights favor novelty, lightly weight regret, and penalize
/// return volatility (negative progress weight).
#[derive(Debug, Clone)]
pub struct TeacherConfig {
    /// Maximum number of distinct levels retained in the buffer
    pub buffer_capacity: usize,

    /// Weight of normalized regret in the composite score
    pub w_regret: f64,

    /// Weight of normalized novelty in the composite score
    pub w_novelty: f64,

    /// Weight of normalized progress in the composite score
    ///
    /// Negative by default: unsigned progress with a negative weight
    /// penalizes volatility.
    pub w_progress: f64,

    /// Softmax temperature for level sampling
    pub temperature: f64,

    /// Minimum candidate score for buffer admission
    pub s_threshold: f64,

    /// Buffer eviction policy
    pub eviction: EvictionPolicy,

    /// RNG seed for reproducible sampling; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for TeacherConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 50,
            w_regret: 0.01,
            w_novelty: 0.5,
            w_progress: -0.1,
            temperature: 1.0,
            s_threshold: 2.0,
            eviction: EvictionPolicy::Fifo,
            seed: None,
        }
    }
}

impl TeacherConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity == 0 {
            return Err(anyhow!("buffer_capacity must be positive"));
        }
        if self.temperature <= 0.0 {
            return Err(anyhow!("temperature must be positive"));
        }
        for (name, w) in [
            ("w_regret", self.w_regret),
            ("w_novelty", self.w_novelty),
            ("w_progress", self.w_progress),
        ] {
            if !w.is_finite() {
                return Err(anyhow!("{name} must be finite"));
            }
        }
        Ok(())
    }

    /// Set buffer capacity
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set regret weight
    pub fn w_regret(mut self, w: f64) -> Self {
        self.w_regret = w;
        self
    }

    /// Set novelty weight
    pub fn w_novelty(mut self, w: f64) -> Self {
        self.w_novelty = w;
        self
    }

    /// Set progress weight
    pub fn w_progress(mut self, w: f64) -> Self {
        self.w_progress = w;
        self
    }

    /// Set sampling temperature
    pub fn temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }

    /// Set the admission score threshold
    pub fn s_threshold(mut self, threshold: f64) -> Self {
        self.s_threshold = threshold;
        self
    }

    /// Set the eviction policy
    pub fn eviction(mut self, policy: EvictionPolicy) -> Self {
        self.eviction = policy;
        self
    }

    /// Set the RNG seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Curriculum teacher over a bounded level buffer
///
/// Owns its buffer exclusively. Construction primes the buffer with the
/// vocabulary's available levels, each bootstrapped with a single
/// zero-valued return so every metric is computable from iteration one.
pub struct TeacherAgent {
    config: TeacherConfig,
    vocab: LevelVocabulary,
    buffer: LevelBuffer,
    last_returns: HashMap<String, f64>,
    mutator: Option<Box<dyn LevelMutator>>,
    rng: StdRng,
}

impl TeacherAgent {
    /// Create a teacher and bootstrap its buffer from the vocabulary
    pub fn new(config: TeacherConfig, vocab: LevelVocabulary) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let buffer = LevelBuffer::with_policy(
            config.buffer_capacity,
            vocab.embedding_dim(),
            config.eviction,
        );

        let mut teacher = Self {
            config,
            vocab,
            buffer,
            last_returns: HashMap::new(),
            mutator: None,
            rng,
        };

        // Bootstrap: one zero return per available level
        for id in teacher.vocab.available().to_vec() {
            teacher.record_return(&id, 0.0);
        }
        Ok(teacher)
    }

    /// Attach a mutation strategy for growing the candidate pool
    pub fn with_mutator(mut self, mutator: Box<dyn LevelMutator>) -> Self {
        self.mutator = Some(mutator);
        self
    }

    /// Teacher configuration
    pub fn config(&self) -> &TeacherConfig {
        &self.config
    }

    /// Level vocabulary
    pub fn vocabulary(&self) -> &LevelVocabulary {
        &self.vocab
    }

    /// The level buffer (read-only; the teacher owns all mutation)
    pub fn buffer(&self) -> &LevelBuffer {
        &self.buffer
    }

    /// Most recent return observed for a level, if any
    pub fn last_return(&self, id: &str) -> Option<f64> {
        self.last_returns.get(id).copied()
    }

    /// Score the buffer and sample the next training level
    ///
    /// Runs a full scoring pass (updating each record's derived fields),
    /// then draws from the temperature softmax over composite scores. An
    /// empty buffer falls back to a uniform draw over the vocabulary.
    pub fn sample_layout(&mut self) -> Result<String> {
        if self.buffer.is_empty() {
            let id = self
                .vocab
                .available()
                .choose(&mut self.rng)
                .cloned()
                .ok_or_else(|| anyhow!("Cannot sample: buffer and vocabulary are both empty"))?;
            tracing::debug!(level = %id, "Empty buffer; sampled uniformly from vocabulary");
            return Ok(id);
        }

        scoring::score_pass(&mut self.buffer, &self.vocab, &self.config);
        let scores = scoring::composite_scores(&self.buffer);
        let probs = sampler::softmax(&scores, self.config.temperature);
        let idx = sampler::sample_index(&probs, &mut self.rng);

        let ids = self.buffer.ids();
        let chosen = ids[idx].clone();
        tracing::debug!(
            level = %chosen,
            score = scores[idx],
            probability = probs[idx],
            "Sampled training level"
        );
        Ok(chosen)
    }

    /// Record an observed return for a level
    ///
    /// Creates the record first if the level is not yet buffered (which may
    /// evict another level at capacity).
    pub fn record_return(&mut self, id: &str, value: f64) {
        let embedding = self.vocab.embedding(id);
        self.buffer.update_return(id, value, embedding);
        self.last_returns.insert(id.to_string(), value);
    }

    /// Record a return and, if a mutator is attached, grow the candidate pool
    ///
    /// The mutator derives a variant of the trained level (avoiding ids
    /// already buffered) and ensures it exists as a future candidate.
    pub fn update_after_episode(&mut self, id: &str, value: f64) -> Result<()> {
        self.record_return(id, value);

        if let Some(mutator) = self.mutator.as_mut() {
            let excluded = self.buffer.ids();
            let derived = mutator.mutate(id, &excluded)?;
            let embedding = self.vocab.embedding(&derived);
            self.buffer.ensure_level(&derived, embedding);
            tracing::info!(source = %id, derived = %derived, "Admitted mutated candidate");
        }
        Ok(())
    }

    /// Propose a fresh candidate level, independent of the buffer
    ///
    /// Draws from the vocabulary, preferring levels not currently buffered.
    /// The candidate is not admitted here; admission goes through
    /// [`TeacherAgent::consider_candidate`] after an evaluation pass.
    pub fn generate_layout(&mut self) -> Result<String> {
        let unbuffered: Vec<String> = self
            .vocab
            .available()
            .iter()
            .filter(|id| !self.buffer.contains(id))
            .cloned()
            .collect();

        let pool = if unbuffered.is_empty() {
            self.vocab.available().to_vec()
        } else {
            unbuffered
        };
        pool.choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| anyhow!("Cannot generate a layout from an empty vocabulary"))
    }

    /// Score a provisional candidate against the current buffer
    pub fn compute_score(&self, id: &str, returns: &[f64]) -> f64 {
        scoring::score_candidate(&self.buffer, &self.vocab, &self.config, id, returns)
    }

    /// Gate a candidate's admission on the score threshold
    ///
    /// Admits the candidate (recording its evaluation return) only when its
    /// provisional score meets `s_threshold`. Returns whether it was
    /// admitted.
    pub fn consider_candidate(&mut self, id: &str, value: f64) -> bool {
        let score = self.compute_score(id, &[value]);
        if score >= self.config.s_threshold {
            tracing::info!(level = %id, score, "Admitting candidate to buffer");
            self.record_return(id, value);
            true
        } else {
            tracing::debug!(level = %id, score, "Rejected candidate below threshold");
            false
        }
    }

    /// Run a scoring pass and export the per-level score snapshot
    pub fn score_snapshot(&mut self) -> ScoreSnapshot {
        scoring::score_pass(&mut self.buffer, &self.vocab, &self.config);
        scoring::snapshot(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::SiblingMutator;

    fn vocab() -> LevelVocabulary {
        LevelVocabulary::new(
            vec![
                "cramped_room".into(),
                "asymmetric_advantages".into(),
                "coordination_ring".into(),
                "forced_coordination".into(),
                "counter_circuit".into(),
            ],
            vec!["held_out_room".into()],
        )
    }

    fn teacher() -> TeacherAgent {
        TeacherAgent::new(TeacherConfig::default().seed(17), vocab()).unwrap()
    }

    #[test]
    fn test_bootstrap_primes_buffer() {
        let t = teacher();
        assert_eq!(t.buffer().len(), 5);
        for id in t.vocabulary().available() {
            let record = t.buffer().get(id).unwrap();
            assert_eq!(record.observed_returns, vec![0.0]);
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(TeacherConfig::new().validate().is_ok());
        assert!(TeacherConfig::new().temperature(0.0).validate().is_err());
        assert!(TeacherConfig::new().buffer_capacity(0).validate().is_err());
        assert!(TeacherConfig::new().w_novelty(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_sample_layout_returns_buffered_level() {
        let mut t = teacher();
        for _ in 0..10 {
            let id = t.sample_layout().unwrap();
            assert!(t.buffer().contains(&id));
        }
    }

    #[test]
    fn test_progress_reflects_new_return_immediately() {
        let mut t = teacher();
        // Bootstrap gave one return; recording a second makes progress
        // |r2 - r1| on the next scoring pass
        t.record_return("cramped_room", 40.0);
        let _ = t.sample_layout().unwrap();
        let record = t.buffer().get("cramped_room").unwrap();
        assert_eq!(record.progress, 40.0);
    }

    #[test]
    fn test_capacity_eviction_through_teacher() {
        let config = TeacherConfig::default().buffer_capacity(5).seed(3);
        let mut t = TeacherAgent::new(config, vocab()).unwrap();
        assert_eq!(t.buffer().len(), 5);

        t.record_return("brand_new_level", 10.0);
        assert_eq!(t.buffer().len(), 5);
        // FIFO: the first bootstrapped level was evicted
        assert!(!t.buffer().contains("cramped_room"));
        assert!(t.buffer().contains("brand_new_level"));
    }

    #[test]
    fn test_consider_candidate_threshold_gate() {
        let config = TeacherConfig::default()
            .w_regret(1.0)
            .w_novelty(0.0)
            .w_progress(0.0)
            .s_threshold(0.5)
            .seed(5);
        let mut t = TeacherAgent::new(config, vocab()).unwrap();

        // A mastered candidate has negative normalized regret: rejected
        assert!(!t.consider_candidate("easy_variant", 200.0));
        assert!(!t.buffer().contains("easy_variant"));

        // A struggling candidate has high regret: admitted
        assert!(t.consider_candidate("hard_variant", -50.0));
        assert!(t.buffer().contains("hard_variant"));
        assert_eq!(t.last_return("hard_variant"), Some(-50.0));
    }

    #[test]
    fn test_generate_layout_prefers_unbuffered() {
        let config = TeacherConfig::default().buffer_capacity(3).seed(11);
        let mut t = TeacherAgent::new(config, vocab()).unwrap();
        // Capacity 3 with 5 bootstrapped levels: two were evicted, so
        // generation must propose one of the unbuffered ones
        for _ in 0..10 {
            let id = t.generate_layout().unwrap();
            assert!(!t.buffer().contains(&id));
        }
    }

    #[test]
    fn test_update_after_episode_with_mutator_grows_pool() {
        let candidates = vocab().available().to_vec();
        let mut t = TeacherAgent::new(
            TeacherConfig::default().buffer_capacity(5).seed(23),
            vocab(),
        )
        .unwrap()
        .with_mutator(Box::new(SiblingMutator::new(candidates)));

        // All five vocabulary levels are buffered, so sibling mutation has
        // no unbuffered candidate left and must error
        assert!(t.update_after_episode("cramped_room", 12.0).is_err());

        // Two new levels evict two bootstrapped siblings (FIFO), freeing
        // them to be re-proposed by mutation
        t.record_return("extra_a", 1.0);
        t.record_return("extra_b", 1.0);
        t.update_after_episode("extra_a", 2.0).unwrap();
        assert_eq!(t.buffer().len(), 5);
        let readmitted = t.buffer().contains("cramped_room")
            || t.buffer().contains("asymmetric_advantages");
        assert!(readmitted);
    }

    #[test]
    fn test_score_snapshot_covers_buffer() {
        let mut t = teacher();
        t.record_return("cramped_room", 30.0);
        let snapshot = t.score_snapshot();
        assert_eq!(snapshot.len(), t.buffer().len());
        assert!(snapshot.contains_key("cramped_room"));
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let mut a = TeacherAgent::new(TeacherConfig::default().seed(99), vocab()).unwrap();
        let mut b = TeacherAgent::new(TeacherConfig::default().seed(99), vocab()).unwrap();
        for _ in 0..5 {
            assert_eq!(a.sample_layout().unwrap(), b.sample_layout().unwrap());
        }
    }
}
