use crate::constants::{
    CLOSE_ENCOUNTER_FACTOR, DEFAULT_DT, DEFAULT_SOFTENING, DEFAULT_THETA,
    FLOATING_ORIGIN_THRESHOLD, MAX_FRAME_DT,
};
use crate::error::PhysicsError;
use crate::forces::GravityAlgorithm;
use crate::integration::{IntegratorKind, Rk45Settings};
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Configuration parameters for the simulation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct SimulationConfig {
    /// The fixed physics time step, s
    pub dt: f64,

    /// Strategy used to evaluate the gravity field
    pub gravity_algorithm: GravityAlgorithm,

    /// Barnes-Hut opening angle; zero opens every node
    pub barnes_hut_theta: f64,

    /// Depth below which octree leaves hold buckets instead of splitting
    pub octree_max_depth: u32,

    /// Integrator used outside close encounters
    pub default_integrator: IntegratorKind,

    /// Integrator used while a body is in a close encounter
    pub close_encounter_integrator: IntegratorKind,

    /// A body is in a close encounter when nearer than this many radii of a massive body
    pub close_encounter_factor: f64,

    /// Non-negative multiplier applied to frame time before accumulation
    pub time_scale: f64,

    /// The maximum number of ticks one `update` call may run
    pub max_substeps_per_update: u32,

    /// Raw frame times above this are clamped, s
    pub max_frame_dt: f64,

    /// Softening length for bodies without their own, m
    pub softening_default: f64,

    /// Whether sphere-overlap collision events are generated
    pub enable_collisions: bool,

    /// Whether the SOI tracker runs
    pub enable_soi: bool,

    /// Distance from the most massive body at which the origin re-bases, m
    pub floating_origin_threshold: f64,

    /// Whether per-tick telemetry includes total energy (O(N²) per tick)
    pub telemetry_energy: bool,

    /// Error control for the adaptive integrator
    pub rk45: Rk45Settings,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            gravity_algorithm: GravityAlgorithm::Direct,
            barnes_hut_theta: DEFAULT_THETA,
            octree_max_depth: 16,
            default_integrator: IntegratorKind::VelocityVerlet,
            close_encounter_integrator: IntegratorKind::Rk45,
            close_encounter_factor: CLOSE_ENCOUNTER_FACTOR,
            time_scale: 1.0,
            max_substeps_per_update: 10,
            max_frame_dt: MAX_FRAME_DT,
            softening_default: DEFAULT_SOFTENING,
            enable_collisions: true,
            enable_soi: true,
            floating_origin_threshold: FLOATING_ORIGIN_THRESHOLD,
            telemetry_energy: false,
            rk45: Rk45Settings::default(),
        }
    }
}

impl SimulationConfig {
    /// Builds a default config with strategies chosen by name
    pub fn with_names(integrator: &str, close_encounter: &str, gravity: &str) -> Result<Self> {
        Ok(Self {
            default_integrator: integrator.parse()?,
            close_encounter_integrator: close_encounter.parse()?,
            gravity_algorithm: gravity.parse()?,
            ..Self::default()
        })
    }

    /// Sets the fixed time step
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Sets the gravity strategy
    pub fn with_gravity(mut self, algorithm: GravityAlgorithm) -> Self {
        self.gravity_algorithm = algorithm;
        self
    }

    /// Sets the default integrator
    pub fn with_integrator(mut self, kind: IntegratorKind) -> Self {
        self.default_integrator = kind;
        self
    }

    /// Checks every field, returning the first violation
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if !value.is_finite() || value <= 0.0 {
                return Err(PhysicsError::InvalidParameter(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
            Ok(())
        }

        fn non_negative(name: &str, value: f64) -> Result<()> {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::InvalidParameter(format!(
                    "{} must be non-negative and finite, got {}",
                    name, value
                )));
            }
            Ok(())
        }

        positive("dt", self.dt)?;
        non_negative("barnes_hut_theta", self.barnes_hut_theta)?;
        non_negative("close_encounter_factor", self.close_encounter_factor)?;
        non_negative("time_scale", self.time_scale)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        non_negative("softening_default", self.softening_default)?;
        positive("floating_origin_threshold", self.floating_origin_threshold)?;

        if self.max_substeps_per_update == 0 {
            return Err(PhysicsError::InvalidParameter(
                "max_substeps_per_update must be at least 1".into(),
            ));
        }
        if self.octree_max_depth == 0 {
            return Err(PhysicsError::InvalidParameter(
                "octree_max_depth must be at least 1".into(),
            ));
        }

        self.rk45.validate()
    }
}
