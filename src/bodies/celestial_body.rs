use crate::bodies::{BodyClass, BodyFlags, BodyId, BodyType};
use crate::constants::G;
use crate::error::PhysicsError;
use crate::integration::IntegratorKind;
use crate::math::Vector3;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Immutable identity and physical constants of a body.
///
/// The gravitational parameter `mu = G * mass` is computed once at
/// construction and cached.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyCore {
    id: BodyId,
    name: String,
    mass: f64,
    radius: f64,
    rotation_period: f64,
    class: BodyClass,
    parent_id: Option<BodyId>,
    mu: f64,
    softening: Option<f64>,
    soi_radius: Option<f64>,
    body_type: BodyType,
    flags: BodyFlags,
}

impl BodyCore {
    /// Creates a body core of the given type
    pub fn new(
        id: impl Into<BodyId>,
        name: impl Into<String>,
        mass: f64,
        radius: f64,
        body_type: BodyType,
    ) -> Self {
        let class = match body_type {
            BodyType::Massive => BodyClass::Planet,
            BodyType::Passive => BodyClass::Spacecraft,
        };

        Self {
            id: id.into(),
            name: name.into(),
            mass,
            radius,
            rotation_period: 0.0,
            class,
            parent_id: None,
            mu: G * mass,
            softening: None,
            soi_radius: None,
            body_type,
            flags: BodyFlags::default(),
        }
    }

    /// Creates a gravity source
    pub fn massive(id: impl Into<BodyId>, name: impl Into<String>, mass: f64, radius: f64) -> Self {
        Self::new(id, name, mass, radius, BodyType::Massive)
    }

    /// Creates a body that only feels gravity
    pub fn passive(id: impl Into<BodyId>, name: impl Into<String>, mass: f64, radius: f64) -> Self {
        Self::new(id, name, mass, radius, BodyType::Passive)
    }

    pub fn with_class(mut self, class: BodyClass) -> Self {
        self.class = class;
        self
    }

    /// Sidereal rotation period in seconds; zero disables rotation
    pub fn with_rotation_period(mut self, period: f64) -> Self {
        self.rotation_period = period;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<BodyId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Per-body softening length in meters, overriding the configured default
    pub fn with_softening(mut self, softening: f64) -> Self {
        self.softening = Some(softening);
        self
    }

    /// Sphere-of-influence radius in meters
    pub fn with_soi_radius(mut self, radius: f64) -> Self {
        self.soi_radius = Some(radius);
        self
    }

    pub fn with_flags(mut self, flags: BodyFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn id(&self) -> &BodyId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn rotation_period(&self) -> f64 {
        self.rotation_period
    }

    pub fn class(&self) -> BodyClass {
        self.class
    }

    pub fn parent_id(&self) -> Option<&BodyId> {
        self.parent_id.as_ref()
    }

    /// Cached gravitational parameter `G * mass`
    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn softening(&self) -> Option<f64> {
        self.softening
    }

    /// Softening length, falling back to `default` when the body has none
    pub fn softening_or(&self, default: f64) -> f64 {
        self.softening.unwrap_or(default)
    }

    /// Configured SOI radius; `None` means unbounded
    pub fn soi_radius(&self) -> Option<f64> {
        self.soi_radius
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn is_massive(&self) -> bool {
        self.body_type == BodyType::Massive
    }

    pub fn flags(&self) -> BodyFlags {
        self.flags
    }

    pub(crate) fn set_soi_radius(&mut self, radius: Option<f64>) {
        self.soi_radius = radius;
    }

    /// Checks the physical constants for values the engine cannot simulate
    pub fn validate(&self) -> Result<()> {
        let invalid = |what: &str| {
            Err(PhysicsError::InvalidParameter(format!("body `{}`: {}", self.id, what)))
        };

        if self.id.as_str().is_empty() {
            return Err(PhysicsError::InvalidParameter("body id must not be empty".into()));
        }
        if !self.mass.is_finite() || self.mass < 0.0 {
            return invalid("mass must be finite and non-negative");
        }
        if self.is_massive() && self.mass <= 0.0 {
            return invalid("massive bodies need a positive mass");
        }
        // Only reachable through deserialization
        if !self.mu.is_finite() || (self.mu - G * self.mass).abs() > 1e-12 * G * self.mass {
            return invalid("mu does not match G * mass");
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return invalid("radius must be finite and non-negative");
        }
        if !self.rotation_period.is_finite() {
            return invalid("rotation period must be finite");
        }
        if let Some(softening) = self.softening {
            if !softening.is_finite() || softening < 0.0 {
                return invalid("softening must be finite and non-negative");
            }
        }
        if let Some(soi) = self.soi_radius {
            if soi.is_nan() || soi <= 0.0 {
                return invalid("SOI radius must be positive");
            }
        }
        Ok(())
    }
}

/// Mutable per-tick state of a body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyState {
    /// Position in m, relative to the floating-origin frame the body was stored in
    pub position: Vector3,

    /// Velocity in m/s
    pub velocity: Vector3,

    /// Accumulated rotation angle in radians, kept in `[0, 2π)`
    pub rotation: f64,
}

impl BodyState {
    pub fn new(position: Vector3, velocity: Vector3) -> Self {
        Self {
            position,
            velocity,
            rotation: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = crate::math::wrap_angle(rotation);
        self
    }

    /// Rejects NaN or infinite components
    pub fn validate(&self, id: &BodyId) -> Result<()> {
        if !self.position.is_finite() || !self.velocity.is_finite() || !self.rotation.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "body `{}`: initial state must be finite",
                id
            )));
        }
        Ok(())
    }
}

/// Integrator-private memory carried between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct IntegrationHistory {
    /// Acceleration at the current position, if still valid
    pub accel: Option<Vector3>,

    /// Integrator that produced `accel`
    pub scheme: Option<IntegratorKind>,
}

impl IntegrationHistory {
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }
}

/// A registered body: constants plus mutable state
#[derive(Debug, Clone)]
pub struct CelestialBody {
    core: BodyCore,
    state: BodyState,
    pub(crate) history: IntegrationHistory,
}

impl CelestialBody {
    pub fn new(core: BodyCore, state: BodyState) -> Self {
        Self {
            core,
            state,
            history: IntegrationHistory::default(),
        }
    }

    pub fn core(&self) -> &BodyCore {
        &self.core
    }

    pub fn state(&self) -> &BodyState {
        &self.state
    }

    pub fn id(&self) -> &BodyId {
        self.core.id()
    }

    pub(crate) fn core_mut(&mut self) -> &mut BodyCore {
        &mut self.core
    }

    pub(crate) fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }
}
