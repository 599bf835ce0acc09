use crate::discretizer::DiscreteState;
use crate::error::{Error, Result};
use crate::policy::ValueTable;

/// One-step Q-learning.
///
/// Q(s,a) <- Q(s,a) + lr * (r + gamma * max_a' Q(s',a') - Q(s,a)), with the
/// bootstrap term dropped when the transition terminated the episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QLearningUpdate {
    learning_rate: f64,
    discount_factor: f64,
}

impl QLearningUpdate {
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            learning_rate,
            discount_factor,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Applies the update to `table` and returns the temporal difference.
    ///
    /// All lookups happen before the write, so on error the table is
    /// unchanged.
    pub fn update(
        &self,
        table: &mut ValueTable,
        curr_state: &DiscreteState,
        curr_action: usize,
        reward: f64,
        next_state: &DiscreteState,
        terminated: bool,
    ) -> Result<f64> {
        if curr_action >= table.num_actions() {
            return Err(Error::InvalidAction {
                action: curr_action,
                num_actions: table.num_actions(),
            });
        }
        let target: f64 = if terminated {
            reward
        } else {
            reward + self.discount_factor * table.max_value(next_state)?
        };
        let current: f64 = table.get(curr_state)?[curr_action];
        let temporal_difference: f64 = target - current;
        table.set(
            curr_state,
            curr_action,
            current + self.learning_rate * temporal_difference,
        )?;
        Ok(temporal_difference)
    }
}
