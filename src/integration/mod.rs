mod integrator;
mod verlet;
mod runge_kutta;
mod runge_kutta_fehlberg;
mod symplectic_euler;

pub use self::integrator::{
    AccelerationFn, IntegrationState, Integrator, IntegratorKind, SplitIntegrator, StepReport,
};
pub use self::verlet::VerletIntegrator;
pub use self::runge_kutta::RungeKuttaIntegrator;
pub use self::runge_kutta_fehlberg::{Rk45Settings, RungeKuttaFehlbergIntegrator};
pub use self::symplectic_euler::SymplecticEulerIntegrator;

/// Builds the integrator for `kind`
pub fn create_integrator(kind: IntegratorKind, rk45: Rk45Settings) -> Box<dyn Integrator> {
    match kind {
        IntegratorKind::VelocityVerlet => Box::new(VerletIntegrator::new()),
        IntegratorKind::SymplecticEuler => Box::new(SymplecticEulerIntegrator::new()),
        IntegratorKind::Rk4 => Box::new(RungeKuttaIntegrator::new()),
        IntegratorKind::Rk45 => Box::new(RungeKuttaFehlbergIntegrator::new(rk45)),
    }
}
