use mountain_car_qlearning::env::{ActionSpace, Bounds, Env, Observation, ObservationSpace};
use mountain_car_qlearning::{
    AgentConfig, DiscreteState, Discretizer, Error, Mode, MountainCarEnv, QLearningAgent,
    Trainer, ValueTable,
};

fn mountain_car_space() -> ObservationSpace {
    ObservationSpace::new(Bounds::new(-1.2, 0.6), Bounds::new(-0.07, 0.07))
}

#[test]
fn single_update_on_a_three_bin_grid() {
    let config = AgentConfig::default()
        .with_num_bins(3)
        .with_learning_rate(0.1)
        .with_discount_factor(0.95)
        .with_seed(0);
    let mut agent =
        QLearningAgent::new(&config, &mountain_car_space(), ActionSpace::new(3)).unwrap();
    let state = DiscreteState::new(-1.2, -0.07);
    let before = agent.get_policy().clone();

    agent.update(&state, 1, -1.0, &state, false).unwrap();

    let values = agent.get_policy().get(&state).unwrap();
    assert!((values[1] - -0.1).abs() < 1e-12, "got {}", values[1]);
    assert_eq!(values[0], 0.0);
    assert_eq!(values[2], 0.0);
    for (other, values) in before.iter() {
        if *other != state {
            assert_eq!(agent.get_policy().get(other).unwrap(), values);
        }
    }
    assert_eq!(agent.get_training_error(), &[-1.0]);
}

#[test]
fn far_out_of_range_position_clamps_to_the_grid_edge() {
    let discretizer = Discretizer::new(20, &mountain_car_space()).unwrap();
    let far = discretizer.discretize(&Observation::new(-10.0, 0.0));
    let edge = discretizer.discretize(&Observation::new(-1.2, 0.0));
    assert_eq!(far, edge);
}

#[test]
fn saved_table_restores_into_a_new_table() {
    let discretizer = Discretizer::new(20, &mountain_car_space()).unwrap();
    let original = ValueTable::initialize(&discretizer, 3).unwrap();
    let mut restored = ValueTable::initialize(&discretizer, 3).unwrap();
    restored.set(&DiscreteState::new(-1.2, -0.07), 0, 9.0).unwrap();
    restored.load(&original.save().unwrap()).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn corrupt_blob_is_rejected_by_the_agent() {
    let config = AgentConfig::default().with_seed(1);
    let mut agent =
        QLearningAgent::new(&config, &mountain_car_space(), ActionSpace::new(3)).unwrap();
    let err = agent.load_policy("{\"num_actions\":3}").unwrap_err();
    assert!(matches!(err, Error::CorruptData { .. }));
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut env = MountainCarEnv::new(200, 5);
        let config = AgentConfig::default()
            .with_num_bins(10)
            .with_exploration_time(1.0, 0.1, 20, 0.5)
            .with_seed(5);
        let mut agent =
            QLearningAgent::new(&config, &env.observation_space(), env.action_space()).unwrap();
        let results = Trainer::new().train(&mut env, &mut agent, 20).unwrap();
        (results, agent.save_policy().unwrap())
    };
    let (first, first_table) = run();
    let (second, second_table) = run();
    assert_eq!(first, second);
    assert_eq!(first_table, second_table);
}

#[test]
fn mountain_car_training_run() {
    let n_episodes = 30;
    let mut env = MountainCarEnv::new(200, 11);
    let config = AgentConfig::default()
        .with_num_bins(20)
        .with_exploration_time(1.0, 0.1, n_episodes, 0.5)
        .with_seed(11);
    let mut agent =
        QLearningAgent::new(&config, &env.observation_space(), env.action_space()).unwrap();

    let results = Trainer::new()
        .with_eval_schedule(10, 1)
        .train(&mut env, &mut agent, n_episodes)
        .unwrap();

    assert_eq!(results.training_reward.len(), n_episodes as usize);
    assert_eq!(results.evaluation_reward.len(), 3);
    for (reward, length) in results.training_reward.iter().zip(&results.training_length) {
        assert!(*length >= 1 && *length <= 200);
        assert_eq!(*reward, -(*length as f64));
    }
    assert_eq!(
        results.training_error.len() as u64,
        results.training_length.iter().sum::<u64>()
    );
    assert!((agent.epsilon() - 0.1).abs() < 1e-9);

    let before = agent.get_policy().clone();
    let stats = Trainer::new()
        .run_episode(&mut env, &mut agent, Mode::Evaluate)
        .unwrap();
    assert!(stats.terminated || stats.truncated);
    assert_eq!(agent.get_policy(), &before);
}
