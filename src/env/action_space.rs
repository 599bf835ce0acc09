use rand::distributions::{Distribution, Uniform};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct ActionSpace {
    pub size: usize,
    dist: Option<Uniform<usize>>,
}

impl ActionSpace {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            dist: (size > 0).then(|| Uniform::from(0..size)),
        }
    }

    /// Uniform action, `None` for an empty action set.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        self.dist.as_ref().map(|dist| dist.sample(rng))
    }

    pub fn contains(&self, action: usize) -> bool {
        action < self.size
    }
}
