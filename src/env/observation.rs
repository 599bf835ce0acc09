#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Observation {
    pub position: f64,
    pub velocity: f64,
}

impl Observation {
    pub fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }
}

/// Closed interval a single observation dimension is documented to stay in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationSpace {
    pub position: Bounds,
    pub velocity: Bounds,
}

impl ObservationSpace {
    pub fn new(position: Bounds, velocity: Bounds) -> Self {
        Self { position, velocity }
    }
}
