//! Conservation diagnostics over the massive bodies.
//!
//! Potential energy is the unsoftened Newtonian sum, so a softened
//! integration shows a small constant offset against it at close range.

use crate::bodies::CelestialBody;
use crate::constants::G;
use crate::math::Vector3;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Energy split of a system, J
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct EnergyReport {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

fn massive<'a>(bodies: &'a [CelestialBody]) -> impl Iterator<Item = &'a CelestialBody> + 'a {
    bodies.iter().filter(|body| body.core().is_massive())
}

/// `Σ ½ m |v|²`
pub fn kinetic_energy(bodies: &[CelestialBody]) -> f64 {
    massive(bodies)
        .map(|body| 0.5 * body.core().mass() * body.state().velocity.length_squared())
        .sum()
}

/// `-Σ_{i<j} G m_i m_j / |p_i - p_j|`; coincident pairs are skipped
pub fn potential_energy(bodies: &[CelestialBody]) -> f64 {
    let sources: Vec<&CelestialBody> = massive(bodies).collect();
    let mut potential = 0.0;

    for (i, a) in sources.iter().enumerate() {
        for b in &sources[i + 1..] {
            let distance = a.state().position.distance(&b.state().position);
            if distance > 0.0 {
                potential -= G * a.core().mass() * b.core().mass() / distance;
            }
        }
    }

    potential
}

pub fn energy(bodies: &[CelestialBody]) -> EnergyReport {
    let kinetic = kinetic_energy(bodies);
    let potential = potential_energy(bodies);
    EnergyReport {
        kinetic,
        potential,
        total: kinetic + potential,
    }
}

/// `Σ p × m v` about the stored-frame origin
pub fn angular_momentum(bodies: &[CelestialBody]) -> Vector3 {
    massive(bodies)
        .map(|body| {
            let state = body.state();
            state.position.cross(&(state.velocity * body.core().mass()))
        })
        .sum()
}

/// `Σ m v`
pub fn linear_momentum(bodies: &[CelestialBody]) -> Vector3 {
    massive(bodies)
        .map(|body| body.state().velocity * body.core().mass())
        .sum()
}

/// `Σ m p / Σ m`, or zero without massive bodies
pub fn center_of_mass(bodies: &[CelestialBody]) -> Vector3 {
    let (weighted, mass) = massive(bodies).fold((Vector3::ZERO, 0.0), |(weighted, mass), body| {
        let m = body.core().mass();
        (weighted + body.state().position * m, mass + m)
    });

    if mass > 0.0 {
        weighted / mass
    } else {
        Vector3::ZERO
    }
}

/// Remembers the first energy sample and the worst relative drift since
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnergyMonitor {
    initial: Option<f64>,
    last: f64,
    max_drift: f64,
}

impl EnergyMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a total energy sample and returns its relative drift
    pub fn sample(&mut self, total: f64) -> f64 {
        let initial = *self.initial.get_or_insert(total);
        self.last = total;

        let drift = if initial != 0.0 {
            ((total - initial) / initial).abs()
        } else {
            (total - initial).abs()
        };
        self.max_drift = self.max_drift.max(drift);
        drift
    }

    pub fn initial(&self) -> Option<f64> {
        self.initial
    }

    /// Relative drift of the latest sample
    pub fn current_drift(&self) -> f64 {
        match self.initial {
            Some(initial) if initial != 0.0 => ((self.last - initial) / initial).abs(),
            Some(initial) => (self.last - initial).abs(),
            None => 0.0,
        }
    }

    pub fn max_drift(&self) -> f64 {
        self.max_drift
    }

    /// Forgets the baseline so the next sample starts a new series
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
