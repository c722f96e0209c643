//! Training loop: teacher selection, student training, teacher feedback
//!
//! One iteration at a time, fully synchronous: the teacher proposes or
//! samples a level, the student trains or evaluates on it, and the result
//! feeds back into the teacher's buffer. Iteration history, per-iteration
//! score snapshots, and held-out evaluation reports are persisted as JSON.

mod config;
mod trainer;

pub use config::TrainerConfig;
pub use trainer::{EvalReport, IterationRecord, Trainer};
