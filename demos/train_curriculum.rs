//! Curriculum training demo with a scripted student
//!
//! Runs the full teacher-student loop without an RL backend: the student
//! replays scripted, gradually improving returns, and the teacher's
//! buffer, scoring, and sampling machinery does the rest.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example train_curriculum
//! ```

use anyhow::Result;
use ued_rl::levels::LevelVocabulary;
use ued_rl::student::ScriptedStudent;
use ued_rl::teacher::{TeacherAgent, TeacherConfig};
use ued_rl::train::{Trainer, TrainerConfig};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    tracing::info!("Starting teacher-student curriculum demo");

    let vocab = LevelVocabulary::new(
        vec![
            "cramped_room".into(),
            "asymmetric_advantages".into(),
            "coordination_ring".into(),
            "forced_coordination".into(),
            "counter_circuit_o_1order".into(),
        ],
        vec!["held_out_kitchen".into()],
    );

    let teacher_config = TeacherConfig::new()
        .buffer_capacity(50)
        .w_regret(0.01)
        .w_novelty(0.5)
        .w_progress(-0.1)
        .temperature(1.0)
        .s_threshold(0.0)
        .seed(2024);
    let teacher = TeacherAgent::new(teacher_config, vocab)?;

    // Scripted returns stand in for PPO training on each layout
    let student = ScriptedStudent::new(15.0)
        .with_script("cramped_room", vec![10.0, 40.0, 80.0, 120.0, 150.0])
        .with_script("asymmetric_advantages", vec![0.0, 5.0, 25.0, 60.0])
        .with_script("coordination_ring", vec![0.0, 0.0, 10.0, 35.0])
        .with_script("forced_coordination", vec![0.0, 0.0, 0.0, 5.0])
        .with_script("counter_circuit_o_1order", vec![0.0, 0.0, 5.0]);

    let config = TrainerConfig::new()
        .n_iterations(10)
        .train_steps_per_iter(1_000)
        .eval_episodes(5)
        .explore_prob(0.5)
        .log_dir("./logs/demo");

    let mut trainer = Trainer::new(config, teacher, student)?;
    let history = trainer.run()?;

    tracing::info!("Iteration summary:");
    for record in history {
        tracing::info!(
            iteration = record.iteration,
            layout = %record.layout,
            avg_return = record.avg_return,
        );
    }

    Ok(())
}
