//! Teacher-student training loop

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::TrainerConfig;
use crate::student::Student;
use crate::teacher::TeacherAgent;

/// One iteration's outcome, persisted to `train.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Iteration index, starting at zero
    pub iteration: usize,

    /// Level the teacher chose or generated
    pub layout: String,

    /// Average evaluation return the student achieved on it
    pub avg_return: f64,

    /// Wall-clock time of the iteration, unix seconds
    pub timestamp: f64,
}

/// Held-out evaluation returns per level, plus the overall average
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Average return per held-out level
    pub returns: BTreeMap<String, f64>,

    /// Mean over all held-out levels
    pub overall_avg: f64,
}

/// Sequencer for the teacher-student curriculum loop
///
/// Each iteration either samples a buffered level for training (exploit)
/// or generates a fresh candidate, evaluates it without training, and
/// admits it to the buffer when it scores above the teacher's threshold
/// (explore). A held-out evaluation follows every iteration.
pub struct Trainer<S: Student> {
    config: TrainerConfig,
    teacher: TeacherAgent,
    student: S,
    history: Vec<IterationRecord>,
}

impl<S: Student> Trainer<S> {
    /// Create a trainer, validating the configuration
    pub fn new(config: TrainerConfig, teacher: TeacherAgent, student: S) -> Result<Self> {
        config.validate()?;
        if let Some(dir) = &config.log_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log dir {}", dir.display()))?;
        }
        Ok(Self { config, teacher, student, history: Vec::new() })
    }

    /// The teacher, for inspection
    pub fn teacher(&self) -> &TeacherAgent {
        &self.teacher
    }

    /// Iteration history accumulated so far
    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    /// Run the configured number of iterations
    ///
    /// A student failure aborts the run; there is no partial-iteration
    /// recovery.
    pub fn run(&mut self) -> Result<&[IterationRecord]> {
        tracing::info!(iterations = self.config.n_iterations, "Starting curriculum training");

        for it in 0..self.config.n_iterations {
            let snapshot = self.teacher.score_snapshot();
            self.persist(&format!("score_snapshot_iter{it}.json"), &snapshot)?;

            let explore = rand::thread_rng().gen::<f64>() < self.config.explore_prob;
            let (layout, avg_return) = if explore {
                self.explore_step(it)?
            } else {
                self.exploit_step(it)?
            };

            let report = self.evaluate_held_out()?;
            self.persist(&format!("eval_iter{it}.json"), &report)?;
            tracing::info!(
                iteration = it,
                overall_avg = report.overall_avg,
                "Held-out evaluation complete"
            );

            self.history.push(IterationRecord {
                iteration: it,
                layout,
                avg_return,
                timestamp: unix_seconds(),
            });
            self.persist("train.json", &self.history)?;
        }

        tracing::info!("Curriculum training finished");
        Ok(&self.history)
    }

    /// Generate a candidate, evaluate it untrained, and gate its admission
    fn explore_step(&mut self, it: usize) -> Result<(String, f64)> {
        let layout = self.teacher.generate_layout()?;
        tracing::info!(iteration = it, level = %layout, "Teacher generated candidate");

        let avg_return = self
            .student
            .train_on_level(&layout, 0, self.config.eval_episodes)?;
        let admitted = self.teacher.consider_candidate(&layout, avg_return);
        tracing::info!(
            iteration = it,
            level = %layout,
            avg_return,
            admitted,
            "Candidate evaluated"
        );
        Ok((layout, avg_return))
    }

    /// Sample a buffered level, train the student, and feed the result back
    fn exploit_step(&mut self, it: usize) -> Result<(String, f64)> {
        let layout = self.teacher.sample_layout()?;
        tracing::info!(iteration = it, level = %layout, "Teacher selected level");

        let avg_return = self.student.train_on_level(
            &layout,
            self.config.train_steps_per_iter,
            self.config.eval_episodes,
        )?;
        self.teacher.record_return(&layout, avg_return);
        tracing::info!(iteration = it, level = %layout, avg_return, "Student trained");
        Ok((layout, avg_return))
    }

    /// Evaluate the student on every held-out level without training
    fn evaluate_held_out(&mut self) -> Result<EvalReport> {
        let held_out = self.teacher.vocabulary().held_out().to_vec();
        let mut returns = BTreeMap::new();
        for level in held_out {
            let avg = self.student.evaluate(&level, self.config.eval_episodes)?;
            returns.insert(level, avg);
        }
        let overall_avg = if returns.is_empty() {
            0.0
        } else {
            returns.values().sum::<f64>() / returns.len() as f64
        };
        Ok(EvalReport { returns, overall_avg })
    }

    fn persist<T: Serialize>(&self, filename: &str, value: &T) -> Result<()> {
        let Some(dir) = &self.config.log_dir else {
            return Ok(());
        };
        write_json(&dir.join(filename), value)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn unix_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelVocabulary;
    use crate::student::ScriptedStudent;
    use crate::teacher::TeacherConfig;

    fn vocab() -> LevelVocabulary {
        LevelVocabulary::new(
            vec!["cramped_room".into(), "coordination_ring".into()],
            vec!["forced_coordination".into()],
        )
    }

    fn trainer(config: TrainerConfig) -> Trainer<ScriptedStudent> {
        let teacher =
            TeacherAgent::new(TeacherConfig::default().seed(1), vocab()).unwrap();
        let student = ScriptedStudent::new(25.0);
        Trainer::new(config, teacher, student).unwrap()
    }

    #[test]
    fn test_exploit_only_run_records_history() {
        let config = TrainerConfig::new().n_iterations(4).explore_prob(0.0);
        let mut t = trainer(config);
        let history = t.run().unwrap();

        assert_eq!(history.len(), 4);
        for (i, record) in history.iter().enumerate() {
            assert_eq!(record.iteration, i);
            assert_eq!(record.avg_return, 25.0);
            assert!(record.timestamp > 0.0);
        }
    }

    #[test]
    fn test_exploit_feeds_returns_back_to_teacher() {
        let config = TrainerConfig::new().n_iterations(6).explore_prob(0.0);
        let mut t = trainer(config);
        t.run().unwrap();

        // Every trained level carries its evaluation return in the buffer
        let trained: Vec<String> = t.history().iter().map(|r| r.layout.clone()).collect();
        for layout in trained {
            assert_eq!(t.teacher().last_return(&layout), Some(25.0));
        }
    }

    #[test]
    fn test_explore_only_run_completes() {
        let config = TrainerConfig::new().n_iterations(3).explore_prob(1.0);
        let mut t = trainer(config);
        let history = t.run().unwrap();
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_held_out_report() {
        let config = TrainerConfig::new().n_iterations(1).explore_prob(0.0);
        let mut t = trainer(config);
        let report = t.evaluate_held_out().unwrap();
        assert_eq!(report.returns.len(), 1);
        assert_eq!(report.returns["forced_coordination"], 25.0);
        assert_eq!(report.overall_avg, 25.0);
    }

    #[test]
    fn test_student_failure_aborts_run() {
        struct FailingStudent;
        impl Student for FailingStudent {
            fn train_on_level(&mut self, _: &str, _: usize, _: usize) -> Result<f64> {
                Err(anyhow::anyhow!("simulator crashed"))
            }
        }

        let teacher =
            TeacherAgent::new(TeacherConfig::default().seed(2), vocab()).unwrap();
        let config = TrainerConfig::new().n_iterations(3).explore_prob(0.0);
        let mut t = Trainer::new(config, teacher, FailingStudent).unwrap();
        assert!(t.run().is_err());
        assert!(t.history().is_empty());
    }
}
