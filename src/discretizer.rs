use std::hash::{Hash, Hasher};

use ndarray::Array1;

use crate::env::{Bounds, Observation, ObservationSpace};
use crate::error::{Error, Result};

/// Grid cell an observation falls into, named by its bin edges.
///
/// Equality and hashing go through the bit pattern of each coordinate so
/// the pair can key a hash table. `0.0` and `-0.0` are the same key.
#[derive(Debug, Clone, Copy)]
pub struct DiscreteState {
    pub position: f64,
    pub velocity: f64,
}

impl DiscreteState {
    pub fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }

    fn key_bits(&self) -> (u64, u64) {
        (canonical_bits(self.position), canonical_bits(self.velocity))
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl PartialEq for DiscreteState {
    fn eq(&self, other: &Self) -> bool {
        self.key_bits() == other.key_bits()
    }
}

impl Eq for DiscreteState {}

impl Hash for DiscreteState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_bits().hash(state);
    }
}

/// Maps continuous observations onto a fixed `num_bins x num_bins` grid.
///
/// Each dimension gets `num_bins` evenly spaced edges covering its bounds.
/// An observation is represented by the largest edge not above it; anything
/// below the first edge (NaN included) maps to the first edge and anything
/// above the last maps to the last.
#[derive(Debug, Clone, PartialEq)]
pub struct Discretizer {
    position_edges: Vec<f64>,
    velocity_edges: Vec<f64>,
}

impl Discretizer {
    pub fn new(num_bins: usize, space: &ObservationSpace) -> Result<Self> {
        if num_bins < 2 {
            return Err(Error::invalid_config(format!(
                "num_bins must be at least 2, got {num_bins}"
            )));
        }
        Ok(Self {
            position_edges: edges("position", num_bins, space.position)?,
            velocity_edges: edges("velocity", num_bins, space.velocity)?,
        })
    }

    pub fn num_bins(&self) -> usize {
        self.position_edges.len()
    }

    pub fn position_edges(&self) -> &[f64] {
        &self.position_edges
    }

    pub fn velocity_edges(&self) -> &[f64] {
        &self.velocity_edges
    }

    pub fn discretize(&self, obs: &Observation) -> DiscreteState {
        DiscreteState::new(
            bin_edge(&self.position_edges, obs.position),
            bin_edge(&self.velocity_edges, obs.velocity),
        )
    }

    /// Every state `discretize` can produce, position-major.
    pub fn states(&self) -> impl Iterator<Item = DiscreteState> + '_ {
        self.position_edges.iter().flat_map(move |&p| {
            self.velocity_edges
                .iter()
                .map(move |&v| DiscreteState::new(p, v))
        })
    }
}

fn edges(name: &str, num_bins: usize, bounds: Bounds) -> Result<Vec<f64>> {
    if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min >= bounds.max {
        return Err(Error::invalid_config(format!(
            "{name} bounds must be finite with min < max, got [{}, {}]",
            bounds.min, bounds.max
        )));
    }
    Ok(Array1::linspace(bounds.min, bounds.max, num_bins).to_vec())
}

fn bin_edge(edges: &[f64], value: f64) -> f64 {
    // NaN compares false, so it counts no edges and lands on the first one.
    let not_above = edges.partition_point(|edge| *edge <= value);
    let index = not_above.saturating_sub(1).min(edges.len() - 1);
    edges[index]
}
