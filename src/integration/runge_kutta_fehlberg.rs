use crate::error::PhysicsError;
use crate::integration::{AccelerationFn, IntegrationState, Integrator, IntegratorKind, StepReport};
use crate::math::Vector3;
use crate::Result;
use tracing::trace;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

// Fehlberg nodes
const C2: f64 = 1.0 / 4.0;
const C3: f64 = 3.0 / 8.0;
const C4: f64 = 12.0 / 13.0;
const C6: f64 = 1.0 / 2.0;

// Stage coefficients
const A21: f64 = 1.0 / 4.0;
const A31: f64 = 3.0 / 32.0;
const A32: f64 = 9.0 / 32.0;
const A41: f64 = 1932.0 / 2197.0;
const A42: f64 = -7200.0 / 2197.0;
const A43: f64 = 7296.0 / 2197.0;
const A51: f64 = 439.0 / 216.0;
const A52: f64 = -8.0;
const A53: f64 = 3680.0 / 513.0;
const A54: f64 = -845.0 / 4104.0;
const A61: f64 = -8.0 / 27.0;
const A62: f64 = 2.0;
const A63: f64 = -3544.0 / 2565.0;
const A64: f64 = 1859.0 / 4104.0;
const A65: f64 = -11.0 / 40.0;

// Fifth-order weights, used to propagate
const B1: f64 = 16.0 / 135.0;
const B3: f64 = 6656.0 / 12825.0;
const B4: f64 = 28561.0 / 56430.0;
const B5: f64 = -9.0 / 50.0;
const B6: f64 = 2.0 / 55.0;

// Fifth minus fourth order weights, the local error estimate
const E1: f64 = 1.0 / 360.0;
const E3: f64 = -128.0 / 4275.0;
const E4: f64 = -2197.0 / 75240.0;
const E5: f64 = 1.0 / 50.0;
const E6: f64 = 2.0 / 55.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Error control for [`RungeKuttaFehlbergIntegrator`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Rk45Settings {
    /// Absolute position error allowed per sub-step, m
    pub absolute_tolerance: f64,

    /// Position error allowed per sub-step relative to the distance travelled
    pub relative_tolerance: f64,

    /// Sub-steps at or below this length are always accepted, s
    pub min_step: f64,

    /// Cap on trial sub-steps per call; the last one spans the remaining time
    pub max_substeps: u32,
}

impl Default for Rk45Settings {
    fn default() -> Self {
        Self {
            absolute_tolerance: 1.0e-6,
            relative_tolerance: 1.0e-9,
            min_step: 1.0e-6,
            max_substeps: 1000,
        }
    }
}

impl Rk45Settings {
    pub fn validate(&self) -> Result<()> {
        if !(self.absolute_tolerance.is_finite() && self.absolute_tolerance >= 0.0)
            || !(self.relative_tolerance.is_finite() && self.relative_tolerance >= 0.0)
            || self.absolute_tolerance + self.relative_tolerance <= 0.0
        {
            return Err(PhysicsError::InvalidParameter(
                "rk45 tolerances must be non-negative, finite and not both zero".into(),
            ));
        }
        if !self.min_step.is_finite() || self.min_step <= 0.0 {
            return Err(PhysicsError::InvalidParameter(
                "rk45 min_step must be positive".into(),
            ));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidParameter(
                "rk45 max_substeps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Runge-Kutta-Fehlberg 4(5) integrator with embedded error estimate
///
/// A step of length `dt` is split into as many sub-steps as the local error
/// estimate requires, so a fast flyby is resolved without shrinking the
/// engine's fixed tick. The first trial sub-step is the whole `dt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaFehlbergIntegrator {
    settings: Rk45Settings,
}

/// Outcome of one trial sub-step
struct Trial {
    position: Vector3,
    velocity: Vector3,
    error: f64,
}

impl RungeKuttaFehlbergIntegrator {
    /// Creates a new RK45 integrator with the given error control
    pub fn new(settings: Rk45Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Rk45Settings {
        &self.settings
    }

    /// Six-stage trial from `(p0, v0)` over `h`, given the stage-1 acceleration
    fn trial(
        &self,
        p0: Vector3,
        v0: Vector3,
        a1: Vector3,
        h: f64,
        time: f64,
        acceleration: &AccelerationFn,
    ) -> Trial {
        let k1_p = v0;
        let k1_v = a1;

        let k2_p = v0 + k1_v * (A21 * h);
        let k2_v = acceleration(time + C2 * h, &(p0 + k1_p * (A21 * h)));

        let k3_p = v0 + (k1_v * A31 + k2_v * A32) * h;
        let k3_v = acceleration(time + C3 * h, &(p0 + (k1_p * A31 + k2_p * A32) * h));

        let k4_p = v0 + (k1_v * A41 + k2_v * A42 + k3_v * A43) * h;
        let k4_v = acceleration(
            time + C4 * h,
            &(p0 + (k1_p * A41 + k2_p * A42 + k3_p * A43) * h),
        );

        let k5_p = v0 + (k1_v * A51 + k2_v * A52 + k3_v * A53 + k4_v * A54) * h;
        let k5_v = acceleration(
            time + h,
            &(p0 + (k1_p * A51 + k2_p * A52 + k3_p * A53 + k4_p * A54) * h),
        );

        let k6_p = v0 + (k1_v * A61 + k2_v * A62 + k3_v * A63 + k4_v * A64 + k5_v * A65) * h;
        let k6_v = acceleration(
            time + C6 * h,
            &(p0 + (k1_p * A61 + k2_p * A62 + k3_p * A63 + k4_p * A64 + k5_p * A65) * h),
        );

        let position = p0 + (k1_p * B1 + k3_p * B3 + k4_p * B4 + k5_p * B5 + k6_p * B6) * h;
        let velocity = v0 + (k1_v * B1 + k3_v * B3 + k4_v * B4 + k5_v * B5 + k6_v * B6) * h;

        let err_p = (k1_p * E1 + k3_p * E3 + k4_p * E4 + k5_p * E5 + k6_p * E6) * h;
        let err_v = (k1_v * E1 + k3_v * E3 + k4_v * E4 + k5_v * E5 + k6_v * E6) * h;

        // Velocity error is weighted by h to compare it in metres
        let scale = self.settings.absolute_tolerance
            + self.settings.relative_tolerance * v0.length() * h;
        let error = err_p.length().max(err_v.length() * h) / scale;

        Trial {
            position,
            velocity,
            error,
        }
    }
}

impl Integrator for RungeKuttaFehlbergIntegrator {
    fn kind(&self) -> IntegratorKind {
        IntegratorKind::Rk45
    }

    fn step(
        &self,
        state: &mut IntegrationState,
        dt: f64,
        time: f64,
        acceleration: &AccelerationFn,
    ) -> StepReport {
        let mut report = StepReport::default();
        let mut elapsed = 0.0;
        let mut h = dt;
        let mut carried = state.accel;

        while elapsed < dt {
            let remaining = dt - elapsed;
            let attempts = report.substeps + report.rejected;
            let forced = attempts + 1 >= self.settings.max_substeps;

            // Absorb a sliver that would otherwise become its own sub-step
            if forced || h >= remaining || remaining - h < self.settings.min_step {
                h = remaining;
            }
            let finishing = h == remaining;

            let t = time + elapsed;
            let a1 = match carried {
                Some(accel) => accel,
                None => {
                    report.evaluations += 1;
                    acceleration(t, &state.position)
                }
            };
            carried = Some(a1);

            let trial = self.trial(state.position, state.velocity, a1, h, t, acceleration);
            report.evaluations += 5;

            let factor = if trial.error.is_finite() {
                if trial.error > 0.0 {
                    (SAFETY * trial.error.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                } else {
                    MAX_FACTOR
                }
            } else {
                MIN_FACTOR
            };

            if trial.error <= 1.0 || forced || h <= self.settings.min_step {
                state.position = trial.position;
                state.velocity = trial.velocity;
                elapsed = if finishing { dt } else { elapsed + h };
                report.substeps += 1;
                carried = None;
            } else {
                report.rejected += 1;
            }

            h = (h * factor).max(self.settings.min_step);
        }

        state.accel = None;

        trace!(
            substeps = report.substeps,
            rejected = report.rejected,
            evaluations = report.evaluations,
            "rk45 step"
        );

        report
    }
}
