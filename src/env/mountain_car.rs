use rand::distributions::Uniform;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{ActionSpace, Bounds, Env, EnvError, Observation, ObservationSpace, Step};

/// Under-powered car stuck in a valley, it has to rock back and forth to
/// build enough momentum to reach the flag on the right hill.
#[derive(Debug, Clone)]
pub struct MountainCarEnv {
    ready: bool,
    max_steps: u64,
    curr_step: u64,
    state: Observation,
    rng: StdRng,
    dist: Uniform<f64>,
}

impl MountainCarEnv {
    pub const ACTIONS: [&'static str; 3] = [
        "ACCELERATE TO THE LEFT",
        "DONT ACCELERATE",
        "ACCELERATE TO THE RIGHT",
    ];
    pub const MIN_POSITION: f64 = -1.2;
    pub const MAX_POSITION: f64 = 0.6;
    pub const MAX_SPEED: f64 = 0.07;
    const GOAL_POSITION: f64 = 0.5;
    const GOAL_VELOCITY: f64 = 0.0;
    const FORCE: f64 = 0.001;
    const GRAVITY: f64 = 0.0025;
    const RENDER_WIDTH: usize = 60;

    pub fn new(max_steps: u64, seed: u64) -> Self {
        let mut env: MountainCarEnv = Self {
            ready: false,
            curr_step: 0,
            max_steps,
            state: Observation::default(),
            rng: StdRng::seed_from_u64(seed),
            dist: Uniform::from(-0.6..-0.4),
        };
        env.state = env.initialize_car();
        env
    }

    fn initialize_car(&mut self) -> Observation {
        Observation::new(self.dist.sample(&mut self.rng), 0.0)
    }

    pub fn get_action_label(&self, action: usize) -> Option<&'static str> {
        Self::ACTIONS.get(action).copied()
    }

    pub fn state(&self) -> Observation {
        self.state
    }
}

impl Default for MountainCarEnv {
    fn default() -> Self {
        Self::new(200, 42)
    }
}

impl Env for MountainCarEnv {
    type Info = ();

    fn reset(&mut self) -> Result<(Observation, ()), EnvError> {
        self.state = self.initialize_car();
        self.ready = true;
        self.curr_step = 0;
        Ok((self.state, ()))
    }

    fn step(&mut self, action: usize) -> Result<Step<()>, EnvError> {
        if !self.ready {
            return Err(EnvError::NotReady);
        }
        if action >= Self::ACTIONS.len() {
            return Err(EnvError::InvalidAction { action });
        }
        self.curr_step += 1;

        let state = &mut self.state;
        state.velocity +=
            (action as f64 - 1.0) * Self::FORCE + (3.0 * state.position).cos() * (-Self::GRAVITY);
        state.velocity = state.velocity.clamp(-Self::MAX_SPEED, Self::MAX_SPEED);
        state.position += state.velocity;
        state.position = state.position.clamp(Self::MIN_POSITION, Self::MAX_POSITION);
        if state.position == Self::MIN_POSITION && state.velocity < 0.0 {
            state.velocity = 0.0
        }

        let terminated =
            state.position >= Self::GOAL_POSITION && state.velocity >= Self::GOAL_VELOCITY;
        let truncated = !terminated && self.curr_step >= self.max_steps;
        if terminated || truncated {
            self.ready = false;
        }
        Ok(Step {
            observation: self.state,
            reward: -1.0,
            terminated,
            truncated,
            info: (),
        })
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::new(Self::ACTIONS.len())
    }

    fn observation_space(&self) -> ObservationSpace {
        ObservationSpace::new(
            Bounds::new(Self::MIN_POSITION, Self::MAX_POSITION),
            Bounds::new(-Self::MAX_SPEED, Self::MAX_SPEED),
        )
    }

    fn render(&self) -> String {
        let span = Self::MAX_POSITION - Self::MIN_POSITION;
        let to_col = |position: f64| -> usize {
            let ratio = (position - Self::MIN_POSITION) / span;
            ((ratio * (Self::RENDER_WIDTH - 1) as f64).round() as usize).min(Self::RENDER_WIDTH - 1)
        };
        let car = to_col(self.state.position);
        let goal = to_col(Self::GOAL_POSITION);
        let track: String = (0..Self::RENDER_WIDTH)
            .map(|col| {
                if col == car {
                    'C'
                } else if col == goal {
                    'F'
                } else {
                    '_'
                }
            })
            .collect();
        format!(
            "{} step={} position={:.4} velocity={:.4}",
            track, self.curr_step, self.state.position, self.state.velocity
        )
    }
}
