use std::path::PathBuf;
use std::time::Instant;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mountain_car_qlearning::env::Env;
use mountain_car_qlearning::utils::moving_average;
use mountain_car_qlearning::{AgentConfig, Error, Mode, MountainCarEnv, QLearningAgent, Trainer};

extern crate structopt;

use structopt::StructOpt;

/// Train or evaluate a tabular Q-learning agent on the mountain car task
#[derive(StructOpt, Debug)]
#[structopt(name = "RLRust - MountainCar")]
struct Cli {
    /// train or evaluate
    #[structopt(long = "mode", default_value = "train")]
    mode: Mode,

    /// Number of episodes for the training
    #[structopt(long = "n_episodes", short = "n", default_value = "5000")]
    n_episodes: u64,

    /// Number of episodes for the evaluation
    #[structopt(long = "eval_episodes", default_value = "10")]
    eval_episodes: u64,

    /// Maximum number of steps per episode
    #[structopt(long = "max_steps", default_value = "200")]
    max_steps: u64,

    /// Number of bins per observation dimension
    #[structopt(long = "num_bins", default_value = "20")]
    num_bins: usize,

    /// Learning rate of the RL agent
    #[structopt(long = "learning_rate", default_value = "0.1")]
    learning_rate: f64,

    /// Discount factor to be used on the temporal difference calculation
    #[structopt(long = "discount_factor", default_value = "0.95")]
    discount_factor: f64,

    /// Initial value for the exploration ratio
    #[structopt(long = "initial_epsilon", default_value = "1.0")]
    initial_epsilon: f64,

    /// Final value for the exploration ratio
    #[structopt(long = "final_epsilon", default_value = "0.1")]
    final_epsilon: f64,

    /// Fraction of the training episodes spent decaying epsilon
    #[structopt(long = "exploration_time", default_value = "0.5")]
    exploration_time: f64,

    /// Seed for the environment and the agent
    #[structopt(long = "seed", default_value = "42")]
    seed: u64,

    /// Value table to start from
    #[structopt(long = "load", parse(from_os_str))]
    load: Option<PathBuf>,

    /// Where to write the value table after training
    #[structopt(long = "save", parse(from_os_str))]
    save: Option<PathBuf>,

    /// Print every step of the evaluation episodes
    #[structopt(long = "render")]
    render: bool,

    /// Hide the progress bar
    #[structopt(long = "quiet")]
    quiet: bool,

    /// Moving average window to be used on the summary of results
    #[structopt(long = "moving_average_window", default_value = "100")]
    moving_average_window: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli: Cli = Cli::from_args();
    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut env = MountainCarEnv::new(cli.max_steps, cli.seed);

    let config = AgentConfig::default()
        .with_num_bins(cli.num_bins)
        .with_learning_rate(cli.learning_rate)
        .with_discount_factor(cli.discount_factor)
        .with_exploration_time(
            cli.initial_epsilon,
            cli.final_epsilon,
            cli.n_episodes,
            cli.exploration_time,
        )
        .with_seed(cli.seed);
    // evaluation runs keep epsilon at the floor
    let config = match cli.mode {
        Mode::Train => config,
        Mode::Evaluate => config.with_epsilon(cli.final_epsilon, 0.0, cli.final_epsilon),
    };

    let mut agent = QLearningAgent::new(&config, &env.observation_space(), env.action_space())?;

    if let Some(path) = &cli.load {
        match agent.load_policy_from_path(path) {
            Ok(()) => {}
            Err(e) if cli.mode == Mode::Train => {
                warn!(path = %path.display(), "starting from a fresh value table: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    let trainer = Trainer::new()
        .with_render(cli.render)
        .with_progress(!cli.quiet);
    let trainer = match cli.mode {
        Mode::Train => trainer.with_eval_schedule(cli.n_episodes / 10, cli.eval_episodes),
        Mode::Evaluate => trainer,
    };

    if cli.mode == Mode::Train {
        let now: Instant = Instant::now();
        let results = trainer.train(&mut env, &mut agent, cli.n_episodes)?;
        info!("Time elapsed: {:.2?}", now.elapsed());

        let window = cli.n_episodes as usize / cli.moving_average_window.max(1);
        let ma_reward = moving_average(window, &results.training_reward);
        info!(
            first = ma_reward.first().copied().unwrap_or_default(),
            last = ma_reward.last().copied().unwrap_or_default(),
            "moving average of training reward"
        );
        let successes = results
            .training_length
            .iter()
            .filter(|l| **l < cli.max_steps)
            .count();
        info!(successes, episodes = cli.n_episodes, "episodes that reached the flag");

        if let Some(path) = &cli.save {
            agent.save_policy_to_path(path)?;
        }
    }

    let (rewards, lengths) = trainer.evaluate(&mut env, &mut agent, cli.eval_episodes)?;
    let n = rewards.len().max(1) as f64;
    info!(
        reward = rewards.iter().sum::<f64>() / n,
        length = lengths.iter().sum::<u64>() as f64 / n,
        epsilon = agent.epsilon(),
        "evaluation"
    );
    Ok(())
}
