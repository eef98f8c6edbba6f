use crate::error::PhysicsError;
use crate::math::Vector3;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Acceleration as a pure function of time and position
pub type AccelerationFn<'a> = dyn Fn(f64, &Vector3) -> Vector3 + 'a;

/// Selectable integration schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "kebab-case"))]
pub enum IntegratorKind {
    /// Second-order symplectic kick-drift-kick
    VelocityVerlet,

    /// First-order symplectic kick-drift
    SymplecticEuler,

    /// Classic fixed-step fourth-order Runge-Kutta
    Rk4,

    /// Runge-Kutta-Fehlberg 4(5) with adaptive sub-steps
    Rk45,
}

impl IntegratorKind {
    pub const ALL: [IntegratorKind; 4] = [
        Self::VelocityVerlet,
        Self::SymplecticEuler,
        Self::Rk4,
        Self::Rk45,
    ];

    /// Canonical configuration name
    pub fn name(&self) -> &'static str {
        match self {
            Self::VelocityVerlet => "velocity-verlet",
            Self::SymplecticEuler => "symplectic-euler",
            Self::Rk4 => "rk4",
            Self::Rk45 => "rk45",
        }
    }

    /// Whether the scheme splits into a drift half and a velocity completion
    pub fn is_split(&self) -> bool {
        matches!(self, Self::VelocityVerlet | Self::SymplecticEuler)
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntegratorKind {
    type Err = PhysicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "velocity-verlet" | "verlet" => Ok(Self::VelocityVerlet),
            "symplectic-euler" | "euler" => Ok(Self::SymplecticEuler),
            "rk4" => Ok(Self::Rk4),
            "rk45" => Ok(Self::Rk45),
            _ => Err(PhysicsError::UnknownIntegrator(s.to_owned())),
        }
    }
}

/// Working record for one body during integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationState {
    pub position: Vector3,
    pub velocity: Vector3,

    /// Acceleration at `position` carried from the previous step, if still valid
    pub accel: Option<Vector3>,

    pub mass: f64,
    pub mu: f64,
}

impl IntegrationState {
    pub fn new(position: Vector3, velocity: Vector3, mass: f64, mu: f64) -> Self {
        Self {
            position,
            velocity,
            accel: None,
            mass,
            mu,
        }
    }

    /// Carried acceleration, or a fresh evaluation at the current position
    pub fn current_accel(&self, time: f64, acceleration: &AccelerationFn) -> Vector3 {
        self.accel
            .unwrap_or_else(|| acceleration(time, &self.position))
    }
}

/// Work done by one `step` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Number of acceleration evaluations
    pub evaluations: u32,

    /// Accepted sub-steps
    pub substeps: u32,

    /// Rejected trial sub-steps
    pub rejected: u32,
}

/// Trait for numerical integration algorithms
pub trait Integrator: Send + Sync {
    /// Which scheme this is
    fn kind(&self) -> IntegratorKind;

    /// Advances `state` by `dt` starting at `time`
    fn step(
        &self,
        state: &mut IntegrationState,
        dt: f64,
        time: f64,
        acceleration: &AccelerationFn,
    ) -> StepReport;

    /// The split form of this integrator, if it has one
    fn as_split(&self) -> Option<&dyn SplitIntegrator> {
        None
    }

    /// Returns the name of the integrator
    fn name(&self) -> &str {
        self.kind().name()
    }
}

/// Integrators whose step separates into a position drift and a velocity
/// completion, so that a set of bodies can drift together before the field
/// at the new positions is evaluated once.
pub trait SplitIntegrator: Send + Sync {
    /// First half: uses the acceleration at the current position
    fn advance(&self, state: &mut IntegrationState, dt: f64, accel: Vector3);

    /// Second half: uses the acceleration at the drifted position
    fn complete(&self, state: &mut IntegrationState, dt: f64, accel_new: Vector3);
}

/// Runs a full step of a split integrator against an acceleration function
pub(crate) fn split_step(
    split: &dyn SplitIntegrator,
    state: &mut IntegrationState,
    dt: f64,
    time: f64,
    acceleration: &AccelerationFn,
) -> StepReport {
    let mut evaluations = 0;
    let accel = match state.accel {
        Some(accel) => accel,
        None => {
            evaluations += 1;
            acceleration(time, &state.position)
        }
    };

    split.advance(state, dt, accel);
    let accel_new = acceleration(time + dt, &state.position);
    split.complete(state, dt, accel_new);

    StepReport {
        evaluations: evaluations + 1,
        substeps: 1,
        rejected: 0,
    }
}
