//! Student policy interface
//!
//! The student's policy-optimization algorithm is an external collaborator;
//! the curriculum core only asks it to train on a named level and report
//! the average evaluation return. A zero training budget means "evaluate
//! only, no parameter update".

use std::collections::HashMap;

use anyhow::Result;

/// Interface to the external reinforcement-learning student
pub trait Student {
    /// Train on a level for `total_timesteps`, then evaluate
    ///
    /// Returns the average episodic return over `eval_episodes` evaluation
    /// episodes. `total_timesteps == 0` performs evaluation only.
    fn train_on_level(
        &mut self,
        level: &str,
        total_timesteps: usize,
        eval_episodes: usize,
    ) -> Result<f64>;

    /// Evaluate without any parameter update
    fn evaluate(&mut self, level: &str, eval_episodes: usize) -> Result<f64> {
        self.train_on_level(level, 0, eval_episodes)
    }
}

/// Deterministic stand-in student for tests and demos
///
/// Replays a scripted sequence of returns per level; levels without a
/// script yield a constant default. The simplest possible student, useful
/// for exercising the curriculum loop without an RL backend.
#[derive(Debug, Default)]
pub struct ScriptedStudent {
    scripts: HashMap<String, Vec<f64>>,
    cursors: HashMap<String, usize>,
    default_return: f64,
}

impl ScriptedStudent {
    /// Create a student that returns `default_return` for unscripted levels
    pub fn new(default_return: f64) -> Self {
        Self {
            scripts: HashMap::new(),
            cursors: HashMap::new(),
            default_return,
        }
    }

    /// Script the sequence of returns for one level
    ///
    /// Successive calls for the level consume the sequence in order; the
    /// final entry repeats once exhausted.
    pub fn with_script(mut self, level: impl Into<String>, returns: Vec<f64>) -> Self {
        self.scripts.insert(level.into(), returns);
        self
    }
}

impl Student for ScriptedStudent {
    fn train_on_level(
        &mut self,
        level: &str,
        _total_timesteps: usize,
        _eval_episodes: usize,
    ) -> Result<f64> {
        let Some(script) = self.scripts.get(level) else {
            return Ok(self.default_return);
        };
        let cursor = self.cursors.entry(level.to_string()).or_insert(0);
        let value = script
            .get(*cursor)
            .or_else(|| script.last())
            .copied()
            .unwrap_or(self.default_return);
        *cursor += 1;
        Ok(value)
    }
}
