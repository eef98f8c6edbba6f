mod vector;
mod aabb;

pub use vector::Vector3;
pub use aabb::Aabb;

use std::f64::consts::TAU;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f64 = 1.0e-12;

/// Wraps an angle in radians into `[0, 2π)`
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

