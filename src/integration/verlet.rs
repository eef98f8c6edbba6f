use crate::integration::integrator::split_step;
use crate::integration::{
    AccelerationFn, IntegrationState, Integrator, IntegratorKind, SplitIntegrator, StepReport,
};
use crate::math::Vector3;

/// Velocity Verlet integrator for long-running orbits
///
/// ```text
/// p' = p + v·dt + ½·a·dt²
/// v' = v + ½·(a + a')·dt
/// ```
///
/// Written in kick-drift-kick form so the drift can be shared across bodies.
/// The acceleration at the end of the step is kept on the state and reused as
/// `a` on the next step.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerletIntegrator;

impl VerletIntegrator {
    /// Creates a new Velocity Verlet integrator
    pub fn new() -> Self {
        Self
    }
}

impl SplitIntegrator for VerletIntegrator {
    fn advance(&self, state: &mut IntegrationState, dt: f64, accel: Vector3) {
        state.velocity += accel * (0.5 * dt);
        state.position += state.velocity * dt;
    }

    fn complete(&self, state: &mut IntegrationState, dt: f64, accel_new: Vector3) {
        state.velocity += accel_new * (0.5 * dt);
        state.accel = Some(accel_new);
    }
}

impl Integrator for VerletIntegrator {
    fn kind(&self) -> IntegratorKind {
        IntegratorKind::VelocityVerlet
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
