use std::path::Path;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

use crate::action_selection::{ActionSelection, EpsilonGreedy};
use crate::config::AgentConfig;
use crate::discretizer::{DiscreteState, Discretizer};
use crate::env::{ActionSpace, Observation, ObservationSpace};
use crate::error::Result;
use crate::policy::ValueTable;
use crate::policy_update::QLearningUpdate;

/// Epsilon-greedy Q-learning agent over a discretized observation space.
///
/// The agent is the only owner of its value table. Action sampling draws
/// from the injected random source `R`, so a seeded source makes every
/// decision reproducible.
#[derive(Debug, Clone)]
pub struct QLearningAgent<R: RngCore = StdRng> {
    discretizer: Discretizer,
    policy: ValueTable,
    action_selection: EpsilonGreedy,
    policy_update: QLearningUpdate,
    action_space: ActionSpace,
    training_error: Vec<f64>,
    rng: R,
}

impl QLearningAgent<StdRng> {
    /// Builds an agent with an RNG seeded from `config.seed`, or from the OS
    /// when no seed is set.
    pub fn new(
        config: &AgentConfig,
        observation_space: &ObservationSpace,
        action_space: ActionSpace,
    ) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, observation_space, action_space, rng)
    }
}

impl<R: RngCore> QLearningAgent<R> {
    pub fn with_rng(
        config: &AgentConfig,
        observation_space: &ObservationSpace,
        action_space: ActionSpace,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        let discretizer = Discretizer::new(config.num_bins, observation_space)?;
        let policy = ValueTable::initialize(&discretizer, action_space.size)?;
        debug!(
            states = policy.len(),
            actions = action_space.size,
            "value table initialized"
        );
        Ok(Self {
            discretizer,
            policy,
            action_selection: EpsilonGreedy::new(
                config.initial_epsilon,
                config.epsilon_decay,
                config.final_epsilon,
            ),
            policy_update: QLearningUpdate::new(config.learning_rate, config.discount_factor),
            action_space,
            training_error: vec![],
            rng,
        })
    }

    pub fn discretize(&self, obs: &Observation) -> DiscreteState {
        self.discretizer.discretize(obs)
    }

    pub fn choose_action(&mut self, state: &DiscreteState) -> Result<usize> {
        let values = self.policy.get(state)?;
        Ok(self.action_selection.get_action(values, &mut self.rng))
    }

    /// Greedy action, no exploration.
    pub fn best_action(&self, state: &DiscreteState) -> Result<usize> {
        self.policy.best_action(state)
    }

    /// One Q-learning step; the temporal difference is appended to the
    /// training error log and returned.
    pub fn update(
        &mut self,
        curr_state: &DiscreteState,
        curr_action: usize,
        reward: f64,
        next_state: &DiscreteState,
        terminated: bool,
    ) -> Result<f64> {
        let temporal_difference = self.policy_update.update(
            &mut self.policy,
            curr_state,
            curr_action,
            reward,
            next_state,
            terminated,
        )?;
        self.training_error.push(temporal_difference);
        Ok(temporal_difference)
    }

    pub fn decay_epsilon(&mut self) {
        self.action_selection.update();
    }

    pub fn epsilon(&self) -> f64 {
        self.action_selection.epsilon()
    }

    pub fn get_training_error(&self) -> &[f64] {
        &self.training_error
    }

    pub fn get_policy(&self) -> &ValueTable {
        &self.policy
    }

    pub fn get_discretizer(&self) -> &Discretizer {
        &self.discretizer
    }

    pub fn get_action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    pub fn save_policy(&self) -> Result<String> {
        self.policy.save()
    }

    pub fn load_policy(&mut self, blob: &str) -> Result<()> {
        self.policy.load(blob)
    }

    pub fn save_policy_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.policy.save_to_path(path)
    }

    pub fn load_policy_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.policy.load_from_path(path)
    }

    /// Back to a zeroed table, the initial epsilon and an empty error log.
    pub fn reset(&mut self) -> Result<()> {
        self.policy = ValueTable::initialize(&self.discretizer, self.action_space.size)?;
        self.action_selection.reset();
        self.training_error.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Bounds;
    use crate::error::Error;

    fn space() -> ObservationSpace {
        ObservationSpace::new(Bounds::new(-1.2, 0.6), Bounds::new(-0.07, 0.07))
    }

    fn agent(config: AgentConfig) -> QLearningAgent {
        QLearningAgent::new(&config.with_seed(7), &space(), ActionSpace::new(3)).unwrap()
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let config = AgentConfig::default().with_learning_rate(0.0);
        let err = QLearningAgent::new(&config, &space(), ActionSpace::new(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn empty_action_space_is_rejected() {
        let err =
            QLearningAgent::new(&AgentConfig::default(), &space(), ActionSpace::new(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn update_logs_the_temporal_difference() {
        let mut agent = agent(
            AgentConfig::default()
                .with_num_bins(3)
                .with_learning_rate(0.1)
                .with_discount_factor(0.95),
        );
        let state = agent.discretize(&Observation::new(-1.2, -0.07));
        agent.update(&state, 1, -1.0, &state, false).unwrap();
        agent.update(&state, 1, -1.0, &state, true).unwrap();
        assert_eq!(agent.get_training_error().len(), 2);
        assert_eq!(agent.get_training_error()[0], -1.0);
    }

    #[test]
    fn greedy_agent_is_deterministic() {
        let mut agent = agent(AgentConfig::default().with_num_bins(3).with_epsilon(0.0, 0.0, 0.0));
        let state = agent.discretize(&Observation::new(0.0, 0.0));
        agent.update(&state, 2, 1.0, &state, true).unwrap();
        for _ in 0..20 {
            assert_eq!(agent.choose_action(&state).unwrap(), 2);
        }
        assert_eq!(agent.best_action(&state).unwrap(), 2);
    }

    #[test]
    fn choose_action_on_unknown_state_fails() {
        let mut agent = agent(AgentConfig::default());
        let err = agent
            .choose_action(&DiscreteState::new(123.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownState { .. }));
    }

    #[test]
    fn epsilon_decays_to_the_floor() {
        let mut agent = agent(AgentConfig::default().with_epsilon(1.0, 0.4, 0.05));
        for _ in 0..10 {
            agent.decay_epsilon();
        }
        assert_eq!(agent.epsilon(), 0.05);
    }

    #[test]
    fn policy_moves_between_agents() {
        let config = AgentConfig::default().with_num_bins(4);
        let mut trained = agent(config.clone());
        let state = trained.discretize(&Observation::new(0.3, 0.01));
        trained.update(&state, 0, 10.0, &state, true).unwrap();

        let mut fresh = agent(config);
        fresh.load_policy(&trained.save_policy().unwrap()).unwrap();
        assert_eq!(fresh.get_policy(), trained.get_policy());
    }

    #[test]
    fn reset_clears_learning() {
        let mut agent = agent(AgentConfig::default().with_num_bins(3));
        let state = agent.discretize(&Observation::new(0.0, 0.0));
        agent.update(&state, 0, 1.0, &state, true).unwrap();
        agent.decay_epsilon();
        agent.reset().unwrap();
        assert!(agent.get_training_error().is_empty());
        assert_eq!(agent.get_policy().get(&state).unwrap(), &[0.0, 0.0, 0.0]);
        assert_eq!(agent.epsilon(), 1.0);
    }
}
