use crate::error::PhysicsError;
use crate::math::Vector3;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Strategies for evaluating the gravity field of the massive bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "kebab-case"))]
pub enum GravityAlgorithm {
    /// Exact pairwise sum, O(N) per query
    Direct,

    /// Octree approximation, O(log N) per query
    BarnesHut,
}

impl GravityAlgorithm {
    /// Canonical configuration name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::BarnesHut => "barnes-hut",
        }
    }
}

impl fmt::Display for GravityAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GravityAlgorithm {
    type Err = PhysicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "barnes-hut" | "barnes_hut" => Ok(Self::BarnesHut),
            _ => Err(PhysicsError::UnknownGravityAlgorithm(s.to_owned())),
        }
    }
}

/// A massive body as seen by the gravity field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSource {
    pub position: Vector3,
    pub mass: f64,

    /// Gravitational parameter `G * mass`
    pub mu: f64,

    /// Softening length of this source, m
    pub softening: f64,
}

impl FieldSource {
    pub fn new(position: Vector3, mass: f64, mu: f64, softening: f64) -> Self {
        Self {
            position,
            mass,
            mu,
            softening,
        }
    }
}

/// Softened point-mass acceleration at `position` towards `source`
///
/// `mu * d / (|d|² + eps²)^1.5` with `d = source - position`.
#[inline]
pub fn softened_acceleration(position: &Vector3, source: &Vector3, mu: f64, eps2: f64) -> Vector3 {
    let d = *source - *position;
    let r2 = d.length_squared() + eps2;
    if r2 <= 0.0 {
        return Vector3::ZERO;
    }
    d * (mu / (r2 * r2.sqrt()))
}

/// Trait for gravity field evaluators
///
/// `prepare` is called once per field build with the massive bodies in
/// registry order; `exclude` in queries is an index into that slice.
pub trait GravityCalculator: Send + Sync {
    /// Which strategy this is
    fn algorithm(&self) -> GravityAlgorithm;

    /// Builds whatever structure queries need over `sources`
    fn prepare(&mut self, sources: &[FieldSource]);

    /// Summed acceleration at `position` from every source except `exclude`
    fn acceleration_at(&self, position: &Vector3, exclude: Option<usize>) -> Vector3;

    /// Number of sources the last `prepare` saw
    fn source_count(&self) -> usize;
}

/// Exact pairwise gravity
#[derive(Debug, Clone, Default)]
pub struct DirectGravity {
    sources: Vec<FieldSource>,
}

impl DirectGravity {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GravityCalculator for DirectGravity {
    fn algorithm(&self) -> GravityAlgorithm {
        GravityAlgorithm::Direct
    }

    fn prepare(&mut self, sources: &[FieldSource]) {
        self.sources.clear();
        self.sources.extend_from_slice(sources);
    }

    fn acceleration_at(&self, position: &Vector3, exclude: Option<usize>) -> Vector3 {
        self.sources
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != exclude)
            .fold(Vector3::ZERO, |acc, (_, source)| {
                acc + softened_acceleration(
                    position,
                    &source.position,
                    source.mu,
                    source.softening * source.softening,
                )
            })
    }

    fn source_count(&self) -> usize {
        self.sources.len()
    }
}
