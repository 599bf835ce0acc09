mod epsilon_greedy;

use rand::RngCore;

pub use epsilon_greedy::EpsilonGreedy;

pub trait ActionSelection {
    /// Picks an action given the action values of the current state.
    fn get_action(&self, values: &[f64], rng: &mut dyn RngCore) -> usize;

    /// Called once per completed training episode.
    fn update(&mut self);

    fn reset(&mut self);
}
