use crate::bodies::{BodyCore, BodyId, BodyState, CelestialBody};
use crate::core::{EngineState, SimulationConfig};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};
#[cfg(feature = "serialize")]
use crate::Result;

/// Presentation state of one body
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodySnapshot {
    pub id: BodyId,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub rotation: f64,
}

impl From<&CelestialBody> for BodySnapshot {
    fn from(body: &CelestialBody) -> Self {
        let state = body.state();
        Self {
            id: body.id().clone(),
            position: state.position.to_array(),
            velocity: state.velocity.to_array(),
            rotation: state.rotation,
        }
    }
}

/// What a remote peer needs to draw the simulation, without gravity
///
/// Positions are in the stored frame; `origin_offset` is included so the
/// peer can apply the same floating origin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub tick: u64,
    pub time: f64,
    pub origin_offset: [f64; 3],
    pub bodies: Vec<BodySnapshot>,
}

impl Snapshot {
    pub fn body(&self, id: &str) -> Option<&BodySnapshot> {
        self.bodies.iter().find(|body| body.id == id)
    }

    #[cfg(feature = "serialize")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    #[cfg(feature = "serialize")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A registered body as stored in a checkpoint
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyRecord {
    pub core: BodyCore,
    pub state: BodyState,
}

/// Everything needed to rebuild an engine that continues identically
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Checkpoint {
    pub config: SimulationConfig,
    pub state: EngineState,

    /// Bodies in registry order
    pub bodies: Vec<BodyRecord>,

    /// `(passive, dominant)` pairs
    pub soi_assignments: Vec<(BodyId, BodyId)>,

    /// Pairs that overlapped on the last tick
    pub active_collisions: Vec<(BodyId, BodyId)>,
}

impl Checkpoint {
    #[cfg(feature = "serialize")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "serialize")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
