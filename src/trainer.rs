use std::fmt;
use std::str::FromStr;

use kdam::{tqdm, Bar, BarExt};
use rand::RngCore;
use tracing::{debug, info};

use crate::agent::QLearningAgent;
use crate::env::Env;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Updates the table after every step and decays epsilon per episode.
    Train,
    /// Leaves the table and epsilon untouched.
    Evaluate,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Mode::Train),
            "evaluate" | "eval" => Ok(Mode::Evaluate),
            other => Err(Error::invalid_config(format!(
                "unknown mode '{other}', expected 'train' or 'evaluate'"
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Train => write!(f, "train"),
            Mode::Evaluate => write!(f, "evaluate"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeStats {
    pub reward: f64,
    pub length: u64,
    pub terminated: bool,
    pub truncated: bool,
    /// Stopped early by the trainer's stop condition.
    pub aborted: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainResults {
    pub training_reward: Vec<f64>,
    pub training_length: Vec<u64>,
    /// Temporal differences logged during this run only.
    pub training_error: Vec<f64>,
    pub evaluation_reward: Vec<f64>,
    pub evaluation_length: Vec<f64>,
}

/// Checked before every step with the running stats of the current episode.
pub type StopCondition = Box<dyn Fn(&EpisodeStats) -> bool>;

/// Drives episodes between an agent and an environment.
#[derive(Default)]
pub struct Trainer {
    pub early_stop: Option<StopCondition>,
    /// Evaluate every `eval_at` training episodes, for `eval_for` episodes.
    pub eval_schedule: Option<(u64, u64)>,
    render: bool,
    progress: bool,
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_early_stop(mut self, stop: StopCondition) -> Self {
        self.early_stop = Some(stop);
        self
    }

    pub fn with_eval_schedule(mut self, eval_at: u64, eval_for: u64) -> Self {
        self.eval_schedule = Some((eval_at.max(1), eval_for));
        self
    }

    /// Print the environment frame on every evaluation step.
    pub fn with_render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Plays one episode; frames are printed only for evaluation episodes.
    pub fn run_episode<E, R>(
        &self,
        env: &mut E,
        agent: &mut QLearningAgent<R>,
        mode: Mode,
    ) -> Result<EpisodeStats>
    where
        E: Env + ?Sized,
        R: RngCore,
    {
        self.play(env, agent, mode, self.render && mode == Mode::Evaluate)
    }

    fn play<E, R>(
        &self,
        env: &mut E,
        agent: &mut QLearningAgent<R>,
        mode: Mode,
        render: bool,
    ) -> Result<EpisodeStats>
    where
        E: Env + ?Sized,
        R: RngCore,
    {
        let mut stats = EpisodeStats::default();
        let (obs, _info) = env.reset()?;
        let mut curr_state = agent.discretize(&obs);
        if render {
            println!("{}", env.render());
        }

        loop {
            if let Some(stop) = &self.early_stop {
                if stop(&stats) {
                    stats.aborted = true;
                    break;
                }
            }
            let action = agent.choose_action(&curr_state)?;
            let step = env.step(action)?;
            let next_state = agent.discretize(&step.observation);
            if mode == Mode::Train {
                agent.update(
                    &curr_state,
                    action,
                    step.reward,
                    &next_state,
                    step.terminated,
                )?;
            }
            stats.length += 1;
            stats.reward += step.reward;
            if render {
                println!("{}", env.render());
            }
            curr_state = next_state;
            if step.terminated || step.truncated {
                stats.terminated = step.terminated;
                stats.truncated = step.truncated;
                break;
            }
        }

        if mode == Mode::Train && !stats.aborted {
            agent.decay_epsilon();
        }
        debug!(
            %mode,
            reward = stats.reward,
            length = stats.length,
            terminated = stats.terminated,
            aborted = stats.aborted,
            epsilon = agent.epsilon(),
            "episode finished"
        );
        Ok(stats)
    }

    pub fn train<E, R>(
        &self,
        env: &mut E,
        agent: &mut QLearningAgent<R>,
        n_episodes: u64,
    ) -> Result<TrainResults>
    where
        E: Env + ?Sized,
        R: RngCore,
    {
        let mut results = TrainResults::default();
        let error_offset = agent.get_training_error().len();
        let mut pb = self.progress_bar(n_episodes, "train")?;

        for episode in 0..n_episodes {
            let stats = self.run_episode(env, agent, Mode::Train)?;
            results.training_reward.push(stats.reward);
            results.training_length.push(stats.length);

            if let Some((eval_at, eval_for)) = self.eval_schedule {
                if episode % eval_at == 0 && eval_for > 0 {
                    let (r, l) = self.run_quietly(env, agent, eval_for)?;
                    let mr: f64 = r.iter().sum::<f64>() / r.len() as f64;
                    let ml: f64 = l.iter().sum::<u64>() as f64 / l.len() as f64;
                    if let Some(pb) = pb.as_mut() {
                        pb.set_postfix(format!("eval reward={mr:.2}, eval ep len={ml:.1}"));
                    }
                    info!(episode, reward = mr, length = ml, "evaluation");
                    results.evaluation_reward.push(mr);
                    results.evaluation_length.push(ml);
                }
            }
            if let Some(pb) = pb.as_mut() {
                pb.update(1)
                    .map_err(|e| Error::io("update progress bar", e))?;
            }
        }

        results.training_error = agent.get_training_error()[error_offset..].to_vec();
        info!(
            episodes = n_episodes,
            updates = results.training_error.len(),
            epsilon = agent.epsilon(),
            "training done"
        );
        Ok(results)
    }

    pub fn evaluate<E, R>(
        &self,
        env: &mut E,
        agent: &mut QLearningAgent<R>,
        n_episodes: u64,
    ) -> Result<(Vec<f64>, Vec<u64>)>
    where
        E: Env + ?Sized,
        R: RngCore,
    {
        let mut reward_history: Vec<f64> = vec![];
        let mut episode_length: Vec<u64> = vec![];
        let mut pb = self.progress_bar(n_episodes, "evaluate")?;
        for _episode in 0..n_episodes {
            let stats = self.run_episode(env, agent, Mode::Evaluate)?;
            reward_history.push(stats.reward);
            episode_length.push(stats.length);
            if let Some(pb) = pb.as_mut() {
                pb.update(1)
                    .map_err(|e| Error::io("update progress bar", e))?;
            }
        }
        Ok((reward_history, episode_length))
    }

    /// Scheduled evaluation inside `train`: no frames, no progress bar.
    fn run_quietly<E, R>(
        &self,
        env: &mut E,
        agent: &mut QLearningAgent<R>,
        n_episodes: u64,
    ) -> Result<(Vec<f64>, Vec<u64>)>
    where
        E: Env + ?Sized,
        R: RngCore,
    {
        let mut reward_history: Vec<f64> = vec![];
        let mut episode_length: Vec<u64> = vec![];
        for _ in 0..n_episodes {
            let stats = self.play(env, agent, Mode::Evaluate, false)?;
            reward_history.push(stats.reward);
            episode_length.push(stats.length);
        }
        Ok((reward_history, episode_length))
    }

    fn progress_bar(&self, total: u64, desc: &str) -> Result<Option<Bar>> {
        if !self.progress {
            return Ok(None);
        }
        let mut pb = tqdm!(total = total as usize);
        pb.set_description(desc.to_owned());
        pb.refresh()
            .map_err(|e| Error::io("draw progress bar", e))?;
        Ok(Some(pb))
    }
}
