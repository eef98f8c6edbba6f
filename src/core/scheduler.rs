use crate::error::PhysicsError;
use crate::Result;

/// Accumulator that converts variable frame time into fixed ticks
///
/// Frame time is clamped to `max_frame_dt`, scaled by `time_scale` and banked.
/// The bank is spent in whole `dt` ticks, at most `max_substeps` per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepClock {
    dt: f64,
    accumulator: f64,
    time_scale: f64,
    max_frame_dt: f64,
    max_substeps: u32,
}

/// Outcome of banking one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramePlan {
    /// Ticks to run now
    pub ticks: u32,

    /// Whole ticks discarded because of the substep cap
    pub dropped: u64,
}

impl FixedStepClock {
    /// Tolerance, in units of `dt`, for float error in the accumulator
    const EPSILON: f64 = 1.0e-9;

    pub fn new(dt: f64, time_scale: f64, max_frame_dt: f64, max_substeps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            time_scale,
            max_frame_dt,
            max_substeps,
        }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f64) -> Result<()> {
        if !time_scale.is_finite() || time_scale < 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "time scale must be non-negative and finite, got {}",
                time_scale
            )));
        }
        self.time_scale = time_scale;
        Ok(())
    }

    pub(crate) fn set_accumulator(&mut self, accumulator: f64) {
        self.accumulator = accumulator.max(0.0);
    }

    /// Fraction of a tick banked but not yet simulated, in `[0, 1)`
    pub fn alpha(&self) -> f64 {
        (self.accumulator / self.dt).clamp(0.0, 1.0 - f64::EPSILON)
    }

    /// Banks `frame_dt` and decides how many ticks to run
    pub fn plan(&mut self, frame_dt: f64) -> Result<FramePlan> {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "frame time must be non-negative and finite, got {}",
                frame_dt
            )));
        }

        self.accumulator += frame_dt.min(self.max_frame_dt) * self.time_scale;

        let slack = self.dt * Self::EPSILON;
        let mut ticks = 0;
        let mut spent = self.accumulator;
        while spent + slack >= self.dt && ticks < self.max_substeps {
            spent -= self.dt;
            ticks += 1;
        }

        // Drop whole excess ticks, keep the fraction
        let mut dropped = 0;
        if spent + slack >= self.dt {
            dropped = ((spent + slack) / self.dt).floor() as u64;
            self.accumulator -= dropped as f64 * self.dt;
        }

        Ok(FramePlan { ticks, dropped })
    }

    /// Spends one tick's worth of banked time
    pub fn consume(&mut self) {
        self.accumulator = (self.accumulator - self.dt).max(0.0);
    }

    /// Returns one tick's worth of time after a failed tick
    pub fn refund(&mut self) {
        self.accumulator += self.dt;
    }

    /// Drops the time of `ticks` planned ticks that will not run
    pub fn discard(&mut self, ticks: u32) {
        self.accumulator = (self.accumulator - ticks as f64 * self.dt).max(0.0);
    }
}
