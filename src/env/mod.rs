//! Environment traits for the cooperative grid-world simulator
//!
//! The grid-world simulation itself (state transitions, physics, rendering)
//! is an external collaborator. This module defines the contract the
//! curriculum core consumes: reset, step with a joint two-player action,
//! and a factory that instantiates an environment for a named level.

use anyhow::Result;

/// Joint action for the two cooperating players
///
/// Each component indexes into the environment's discrete action set
/// (movement, interact, stay).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointAction {
    /// Action index for player 0
    pub player_0: usize,

    /// Action index for player 1
    pub player_1: usize,
}

impl JointAction {
    /// Both players take the same action
    pub fn mirrored(action: usize) -> Self {
        Self { player_0: action, player_1: action }
    }
}

/// Result of one environment step
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Featurized observation for player 0
    pub observation: Vec<f32>,

    /// Shared team reward for this step
    pub reward: f32,

    /// Whether the episode reached a terminal state
    pub terminated: bool,

    /// Whether the episode was cut off at the horizon
    pub truncated: bool,

    /// Additional step information
    pub info: StepInfo,
}

/// Additional step information reported by the simulator
#[derive(Debug, Clone, Default)]
pub struct StepInfo {
    /// Sparse task reward (successful deliveries)
    pub sparse_reward: f32,

    /// Dense shaping reward, if the simulator provides one
    pub shaped_reward: f32,
}

/// Core trait for cooperative grid-world environments
///
/// Observations are fixed-length feature vectors produced by the
/// simulator's own state featurization.
pub trait GridEnvironment {
    /// Reset the environment and return the initial observation
    fn reset(&mut self) -> Result<Vec<f32>>;

    /// Step the environment with a joint action
    fn step(&mut self, action: JointAction) -> Result<StepResult>;

    /// Dimensionality of the featurized observation
    fn observation_dim(&self) -> usize;

    /// Number of discrete actions available to each player
    fn num_actions(&self) -> usize;
}

/// Factory that builds an environment for a named level
///
/// The training loop never constructs simulators directly; it hands level
/// identifiers chosen by the teacher to a factory supplied by the caller.
pub trait EnvironmentFactory {
    /// Concrete environment type produced by this factory
    type Env: GridEnvironment;

    /// Instantiate an environment for the given level identifier
    fn make_environment(&self, level: &str) -> Result<Self::Env>;
}
