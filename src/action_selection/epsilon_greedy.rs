use rand::distributions::{Distribution, Uniform};
use rand::{Rng, RngCore};

use crate::utils::argmax;

use super::ActionSelection;

/// Explores uniformly with probability `epsilon`, otherwise takes the
/// first action with the highest value.
///
/// Epsilon starts at `initial_epsilon` and drops by `epsilon_decay` on every
/// [`decay_epsilon`](Self::decay_epsilon) call, never going under
/// `final_epsilon`.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    exploration_decider: Uniform<f64>,
    initial_epsilon: f64,
    epsilon: f64,
    epsilon_decay: f64,
    final_epsilon: f64,
}

impl EpsilonGreedy {
    pub fn new(initial_epsilon: f64, epsilon_decay: f64, final_epsilon: f64) -> Self {
        Self {
            exploration_decider: Uniform::from(0.0..1.0),
            initial_epsilon,
            epsilon: initial_epsilon,
            epsilon_decay,
            final_epsilon,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn final_epsilon(&self) -> f64 {
        self.final_epsilon
    }

    pub fn decay_epsilon(&mut self) {
        let new_epsilon: f64 = self.epsilon - self.epsilon_decay;
        self.epsilon = new_epsilon.max(self.final_epsilon).max(0.0);
    }

    fn should_explore(&self, rng: &mut dyn RngCore) -> bool {
        self.exploration_decider.sample(rng) < self.epsilon
    }
}

impl ActionSelection for EpsilonGreedy {
    fn get_action(&self, values: &[f64], rng: &mut dyn RngCore) -> usize {
        if self.should_explore(rng) {
            rng.gen_range(0..values.len())
        } else {
            argmax(values)
        }
    }

    fn update(&mut self) {
        self.decay_epsilon();
    }

    fn reset(&mut self) {
        self.epsilon = self.initial_epsilon;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn greedy_picks_lowest_index_among_ties() {
        let selection = EpsilonGreedy::new(0.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(selection.get_action(&[0.5, 2.0, 2.0, 1.0], &mut rng), 1);
            assert_eq!(selection.get_action(&[0.0, 0.0, 0.0], &mut rng), 0);
        }
    }

    #[test]
    fn full_exploration_visits_every_action() {
        let selection = EpsilonGreedy::new(1.0, 0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 3];
        for _ in 0..300 {
            seen[selection.get_action(&[5.0, 0.0, 0.0], &mut rng)] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn same_seed_same_choices() {
        let selection = EpsilonGreedy::new(0.5, 0.0, 0.0);
        let values = [1.0, 0.0, -1.0];
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let first: Vec<usize> = (0..50).map(|_| selection.get_action(&values, &mut a)).collect();
        let second: Vec<usize> = (0..50).map(|_| selection.get_action(&values, &mut b)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn decay_subtracts_the_step() {
        let mut selection = EpsilonGreedy::new(1.0, 0.25, 0.0);
        selection.decay_epsilon();
        assert_eq!(selection.epsilon(), 0.75);
    }

    #[test]
    fn decay_never_goes_under_the_floor() {
        let mut selection = EpsilonGreedy::new(1.0, 0.3, 0.1);
        for _ in 0..1000 {
            selection.update();
            assert!(selection.epsilon() >= 0.1);
        }
        assert_eq!(selection.epsilon(), 0.1);
    }

    #[test]
    fn reset_restores_the_initial_epsilon() {
        let mut selection = EpsilonGreedy::new(0.9, 0.5, 0.0);
        selection.update();
        selection.reset();
        assert_eq!(selection.epsilon(), 0.9);
    }
}
