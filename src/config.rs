//! Agent hyper-parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters fixed at agent construction.
///
/// ```
/// use mountain_car_qlearning::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_num_bins(20)
///     .with_exploration_time(1.0, 0.0, 5_000, 0.5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Bins per observation dimension
    pub num_bins: usize,
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub initial_epsilon: f64,
    pub final_epsilon: f64,
    /// Subtracted from epsilon after every training episode
    pub epsilon_decay: f64,
    /// Seed for action sampling; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            num_bins: 20,
            learning_rate: 0.1,
            discount_factor: 0.95,
            initial_epsilon: 1.0,
            final_epsilon: 0.1,
            epsilon_decay: 1.0 / 2_500.0,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn with_num_bins(mut self, num_bins: usize) -> Self {
        self.num_bins = num_bins;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, initial: f64, decay: f64, final_epsilon: f64) -> Self {
        self.initial_epsilon = initial;
        self.epsilon_decay = decay;
        self.final_epsilon = final_epsilon;
        self
    }

    /// Linear schedule stepping `initial / (exploration_time * n_episodes)`
    /// per episode; epsilon would hit zero at that point, the floor stops it
    /// earlier when `final_epsilon > 0`.
    pub fn with_exploration_time(
        mut self,
        initial: f64,
        final_epsilon: f64,
        n_episodes: u64,
        exploration_time: f64,
    ) -> Self {
        self.initial_epsilon = initial;
        self.final_epsilon = final_epsilon;
        let span = exploration_time * n_episodes as f64;
        self.epsilon_decay = if span > 0.0 {
            initial / span
        } else {
            0.0
        };
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_bins < 2 {
            return Err(Error::invalid_config(format!(
                "num_bins must be at least 2, got {}",
                self.num_bins
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::invalid_config(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.discount_factor) {
            return Err(Error::invalid_config(format!(
                "discount_factor must be in [0, 1), got {}",
                self.discount_factor
            )));
        }
        for (name, value) in [
            ("initial_epsilon", self.initial_epsilon),
            ("final_epsilon", self.final_epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if self.final_epsilon > self.initial_epsilon {
            return Err(Error::invalid_config(format!(
                "final_epsilon ({}) must not exceed initial_epsilon ({})",
                self.final_epsilon, self.initial_epsilon
            )));
        }
        if !(self.epsilon_decay >= 0.0 && self.epsilon_decay.is_finite()) {
            return Err(Error::invalid_config(format!(
                "epsilon_decay must be a finite value >= 0, got {}",
                self.epsilon_decay
            )));
        }
        Ok(())
    }
}
