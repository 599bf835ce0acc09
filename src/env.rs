mod action_space;
mod mountain_car;
mod observation;

use thiserror::Error;

pub use action_space::ActionSpace;
pub use mountain_car::MountainCarEnv;
pub use observation::{Bounds, Observation, ObservationSpace};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("environment is not ready, call reset first")]
    NotReady,
    #[error("action {action} is not valid for this environment")]
    InvalidAction { action: usize },
}

/// Outcome of a single environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<I> {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: I,
}

/// Anything that can drive an episode: a simulator or a real system.
pub trait Env {
    type Info;

    fn reset(&mut self) -> Result<(Observation, Self::Info), EnvError>;

    fn step(&mut self, action: usize) -> Result<Step<Self::Info>, EnvError>;

    fn action_space(&self) -> ActionSpace;

    fn observation_space(&self) -> ObservationSpace;

    /// Text frame of the current state, for display only.
    fn render(&self) -> String;
}
