//! Tabular Q-learning for continuous-state control tasks.
//!
//! Observations are snapped onto a fixed grid by a [`Discretizer`], an
//! epsilon-greedy [`QLearningAgent`] picks actions from a fully enumerated
//! [`ValueTable`], and a [`Trainer`] drives episodes against any [`Env`].

pub mod action_selection;
pub mod agent;
pub mod config;
pub mod discretizer;
pub mod env;
pub mod error;
pub mod policy;
pub mod policy_update;
pub mod trainer;
pub mod utils;

pub use agent::QLearningAgent;
pub use config::AgentConfig;
pub use discretizer::{DiscreteState, Discretizer};
pub use env::{Env, MountainCarEnv};
pub use error::{Error, Result};
pub use policy::ValueTable;
pub use trainer::{Mode, Trainer};
