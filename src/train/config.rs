//! Training loop configuration

use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Configuration for the teacher-student training loop
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Number of teacher-student iterations to run
    pub n_iterations: usize,

    /// Student training budget per exploit iteration (timesteps)
    pub train_steps_per_iter: usize,

    /// Evaluation episodes per return estimate
    pub eval_episodes: usize,

    /// Probability of taking the generate-and-gate branch instead of
    /// sampling from the buffer
    pub explore_prob: f64,

    /// Directory for JSON logs; `None` disables persistence
    pub log_dir: Option<PathBuf>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_iterations: 20,
            train_steps_per_iter: 1_000,
            eval_episodes: 5,
            explore_prob: 0.5,
            log_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.n_iterations == 0 {
            return Err(anyhow!("n_iterations must be positive"));
        }
        if self.eval_episodes == 0 {
            return Err(anyhow!("eval_episodes must be positive"));
        }
        if !(0.0..=1.0).contains(&self.explore_prob) {
            return Err(anyhow!("explore_prob must be in [0, 1]"));
        }
        Ok(())
    }

    /// Set the number of iterations
    pub fn n_iterations(mut self, n: usize) -> Self {
        self.n_iterations = n;
        self
    }

    /// Set the per-iteration training budget
    pub fn train_steps_per_iter(mut self, steps: usize) -> Self {
        self.train_steps_per_iter = steps;
        self
    }

    /// Set the number of evaluation episodes
    pub fn eval_episodes(mut self, episodes: usize) -> Self {
        self.eval_episodes = episodes;
        self
    }

    /// Set the explore-branch probability
    pub fn explore_prob(mut self, p: f64) -> Self {
        self.explore_prob = p;
        self
    }

    /// Set the log directory
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}
