use crate::integration::{AccelerationFn, IntegrationState, Integrator, IntegratorKind, StepReport};

/// Fourth-order Runge-Kutta integrator for close encounters
///
/// Treats `(position, velocity)` as one first-order system and evaluates the
/// acceleration at four stage points per step.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaIntegrator;

impl RungeKuttaIntegrator {
    /// Creates a new Runge-Kutta integrator
    pub fn new() -> Self {
        Self
    }
}

impl Integrator for RungeKuttaIntegrator {
    fn kind(&self) -> IntegratorKind {
        IntegratorKind::Rk4
    }

    fn step(
        &self,
        state: &mut IntegrationState,
        dt: f64,
        time: f64,
        acceleration: &AccelerationFn,
    ) -> StepReport {
        let p0 = state.position;
        let v0 = state.velocity;
        let half = 0.5 * dt;
        let mut evaluations = 3;

        // Stage 1: at the current state
        let k1_v = match state.accel {
            Some(accel) => accel,
            None => {
                evaluations += 1;
                acceleration(time, &p0)
            }
        };
        let k1_p = v0;

        // Stage 2: midpoint using stage 1 slopes
        let k2_p = v0 + k1_v * half;
        let k2_v = acceleration(time + half, &(p0 + k1_p * half));

        // Stage 3: midpoint using stage 2 slopes
        let k3_p = v0 + k2_v * half;
        let k3_v = acceleration(time + half, &(p0 + k2_p * half));

        // Stage 4: endpoint using stage 3 slopes
        let k4_p = v0 + k3_v * dt;
        let k4_v = acceleration(time + dt, &(p0 + k3_p * dt));

        let sixth = dt / 6.0;
        state.position = p0 + (k1_p + k2_p * 2.0 + k3_p * 2.0 + k4_p) * sixth;
        state.velocity = v0 + (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * sixth;

        // No stage lands on the final position
        state.accel = None;

        StepReport {
            evaluations,
            substeps: 1,
            rejected: 0,
        }
    }
}
