use crate::integration::integrator::split_step;
use crate::integration::{
    AccelerationFn, IntegrationState, Integrator, IntegratorKind, SplitIntegrator, StepReport,
};
use crate::math::Vector3;

/// Semi-implicit Euler: kick with the current acceleration, then drift with
/// the new velocity. First order but symplectic, so orbital energy oscillates
/// instead of drifting.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymplecticEulerIntegrator;

impl SymplecticEulerIntegrator {
    /// Creates a new symplectic Euler integrator
    pub fn new() -> Self {
        Self
    }
}

impl SplitIntegrator for SymplecticEulerIntegrator {
    fn advance(&self, state: &mut IntegrationState, dt: f64, accel: Vector3) {
        state.velocity += accel * dt;
        state.position += state.velocity * dt;
    }

    fn complete(&self, state: &mut IntegrationState, _dt: f64, accel_new: Vector3) {
        state.accel = Some(accel_new);
    }
}

impl Integrator for SymplecticEulerIntegrator {
    fn kind(&self) -> IntegratorKind {
        IntegratorKind::SymplecticEuler
    }

    fn step(
        &self,
        state: &mut IntegrationState,
        dt: f64,
        time: f64,
        acceleration: &AccelerationFn,
    ) -> StepReport {
        split_step(self, state, dt, time, acceleration)
    }

    fn as_split(&self) -> Option<&dyn SplitIntegrator> {
        Some(self)
    }
}
