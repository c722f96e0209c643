//! # UED-RL
//!
//! Teacher-student curriculum learning for a cooperative grid-world game.
//!
//! A teacher component selects or proposes training levels for a student
//! reinforcement-learning policy, using regret, novelty, and learning-progress
//! signals to bias selection toward productive levels (Unsupervised
//! Environment Design).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ued_rl::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let vocab = LevelVocabulary::from_path("levels.json")?;
//! let mut teacher = TeacherAgent::new(TeacherConfig::default(), vocab)?;
//! let layout = teacher.sample_layout()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Environment traits for the external grid-world simulator
pub mod env;

/// Level vocabulary, embeddings, and mutation
pub mod levels;

/// Student policy interface (external RL collaborator)
pub mod student;

/// Teacher agent: level buffer, scoring engine, and sampler
pub mod teacher;

/// Training loop sequencing teacher and student
pub mod train;

/// Utility functions and helpers
pub mod utils;

/// Prelude module for convenient imports
///
/// This module re-exports commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::levels::{LevelMutator, LevelVocabulary, SiblingMutator};
    pub use crate::student::Student;
    pub use crate::teacher::{EvictionPolicy, LevelBuffer, TeacherAgent, TeacherConfig};
    pub use crate::train::{Trainer, TrainerConfig};
}

/// Current version of ued-rl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
