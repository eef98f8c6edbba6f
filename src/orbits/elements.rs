//! Two-body orbit helpers.
//!
//! All functions take the gravitational parameter `mu = G * M` of the
//! primary and work in SI units.

use crate::error::PhysicsError;
use crate::math::Vector3;
use crate::Result;
use std::f64::consts::{PI, TAU};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Speed of a circular orbit of radius `r`
pub fn circular_velocity(mu: f64, r: f64) -> f64 {
    (mu / r).sqrt()
}

/// Speed needed to reach infinity from radius `r`
pub fn escape_velocity(mu: f64, r: f64) -> f64 {
    (2.0 * mu / r).sqrt()
}

/// Kepler's third law: `T = 2π √(a³ / mu)`
pub fn orbital_period(semi_major_axis: f64, mu: f64) -> f64 {
    TAU * (semi_major_axis.powi(3) / mu).sqrt()
}

/// Specific orbital energy `v²/2 - mu/r`
pub fn specific_orbital_energy(position: &Vector3, velocity: &Vector3, mu: f64) -> f64 {
    0.5 * velocity.length_squared() - mu / position.length()
}

/// Semi-major axis from the vis-viva equation; infinite for parabolic orbits
pub fn semi_major_axis(position: &Vector3, velocity: &Vector3, mu: f64) -> f64 {
    let energy = specific_orbital_energy(position, velocity, mu);
    if energy == 0.0 {
        return f64::INFINITY;
    }
    -mu / (2.0 * energy)
}

/// Eccentricity vector, pointing at periapsis with magnitude `e`
///
/// `position` and `velocity` are relative to the primary.
pub fn eccentricity_vector(position: &Vector3, velocity: &Vector3, mu: f64) -> Vector3 {
    let r = position.length();
    let h = position.cross(velocity);
    velocity.cross(&h) / mu - *position / r
}

/// Scalar eccentricity of the relative orbit
pub fn eccentricity(position: &Vector3, velocity: &Vector3, mu: f64) -> f64 {
    eccentricity_vector(position, velocity, mu).length()
}

/// Classical Keplerian elements of an elliptic orbit, angles in radians
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct OrbitalElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub longitude_of_ascending_node: f64,
    pub argument_of_periapsis: f64,
    pub mean_anomaly: f64,
}

impl OrbitalElements {
    /// A circular, equatorial orbit starting on the +x axis
    pub fn circular(radius: f64) -> Self {
        Self {
            semi_major_axis: radius,
            eccentricity: 0.0,
            inclination: 0.0,
            longitude_of_ascending_node: 0.0,
            argument_of_periapsis: 0.0,
            mean_anomaly: 0.0,
        }
    }

    /// Builds elements from angles given in degrees
    pub fn from_degrees(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        longitude_of_ascending_node: f64,
        argument_of_periapsis: f64,
        mean_anomaly: f64,
    ) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            inclination: inclination.to_radians(),
            longitude_of_ascending_node: longitude_of_ascending_node.to_radians(),
            argument_of_periapsis: argument_of_periapsis.to_radians(),
            mean_anomaly: mean_anomaly.to_radians(),
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.semi_major_axis.is_finite() && self.semi_major_axis > 0.0) {
            return Err(PhysicsError::InvalidParameter(
                "semi-major axis must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(PhysicsError::InvalidParameter(
                "only elliptic orbits (0 <= e < 1) are supported".into(),
            ));
        }
        Ok(())
    }

    /// Solves `M = E - e sin E` for the eccentric anomaly by Newton iteration
    pub fn eccentric_anomaly(&self) -> f64 {
        let e = self.eccentricity;
        let m = self.mean_anomaly.rem_euclid(TAU);
        let mut anomaly = if e < 0.8 { m } else { PI };

        for _ in 0..50 {
            let delta = (anomaly - e * anomaly.sin() - m) / (1.0 - e * anomaly.cos());
            anomaly -= delta;
            if delta.abs() < 1.0e-14 {
                break;
            }
        }
        anomaly
    }

    /// Position and velocity relative to the primary
    pub fn to_state_vectors(&self, mu: f64) -> Result<(Vector3, Vector3)> {
        self.validate()?;

        let a = self.semi_major_axis;
        let e = self.eccentricity;
        let anomaly = self.eccentric_anomaly();
        let true_anomaly =
            2.0 * ((1.0 + e).sqrt() * (anomaly / 2.0).sin()).atan2((1.0 - e).sqrt() * (anomaly / 2.0).cos());

        // Perifocal frame
        let r = a * (1.0 - e * anomaly.cos());
        let p = a * (1.0 - e * e);
        let h = (mu * p).sqrt();
        let (sin_nu, cos_nu) = true_anomaly.sin_cos();
        let position = Vector3::new(r * cos_nu, r * sin_nu, 0.0);
        let velocity = Vector3::new(-mu / h * sin_nu, mu / h * (e + cos_nu), 0.0);

        Ok((self.rotate_from_perifocal(position), self.rotate_from_perifocal(velocity)))
    }

    /// Applies `Rz(Ω) · Rx(i) · Rz(ω)`
    fn rotate_from_perifocal(&self, v: Vector3) -> Vector3 {
        let (sin_o, cos_o) = self.longitude_of_ascending_node.sin_cos();
        let (sin_w, cos_w) = self.argument_of_periapsis.sin_cos();
        let (sin_i, cos_i) = self.inclination.sin_cos();

        let r11 = cos_o * cos_w - sin_o * sin_w * cos_i;
        let r12 = -cos_o * sin_w - sin_o * cos_w * cos_i;
        let r21 = sin_o * cos_w + cos_o * sin_w * cos_i;
        let r22 = -sin_o * sin_w + cos_o * cos_w * cos_i;
        let r31 = sin_w * sin_i;
        let r32 = cos_w * sin_i;

        Vector3::new(
            r11 * v.x + r12 * v.y,
            r21 * v.x + r22 * v.y,
            r31 * v.x + r32 * v.y,
        )
    }

    /// Period of this orbit around a primary with parameter `mu`
    pub fn period(&self, mu: f64) -> f64 {
        orbital_period(self.semi_major_axis, mu)
    }
}
