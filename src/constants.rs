//! Physical constants and engine defaults, all in SI units.

/// Newtonian gravitational constant (CODATA 2018), m³ kg⁻¹ s⁻²
pub const G: f64 = 6.674_30e-11;

/// Astronomical unit, m
pub const AU: f64 = 1.495_978_707e11;

/// Seconds per day
pub const DAY: f64 = 86_400.0;

/// Solar mass, kg
pub const SUN_MASS: f64 = 1.988_47e30;
/// Solar radius, m
pub const SUN_RADIUS: f64 = 6.957e8;
/// Sidereal rotation period of the Sun (equatorial), s
pub const SUN_ROTATION_PERIOD: f64 = 25.38 * DAY;

/// Earth mass, kg
pub const EARTH_MASS: f64 = 5.972_2e24;
/// Earth mean radius, m
pub const EARTH_RADIUS: f64 = 6.371e6;
/// Earth standard gravitational parameter, m³ s⁻²
pub const EARTH_MU: f64 = 3.986_004_418e14;
/// Sidereal day, s
pub const EARTH_ROTATION_PERIOD: f64 = 86_164.0905;

/// Moon mass, kg
pub const MOON_MASS: f64 = 7.342e22;
/// Moon mean radius, m
pub const MOON_RADIUS: f64 = 1.737_4e6;
/// Mean Earth-Moon distance, m
pub const MOON_SEMI_MAJOR_AXIS: f64 = 3.844e8;

/// Default fixed physics step, s
pub const DEFAULT_DT: f64 = 1.0 / 60.0;

/// Default softening length for bodies without their own, m
pub const DEFAULT_SOFTENING: f64 = 1_000.0;

/// Default Barnes-Hut opening angle
pub const DEFAULT_THETA: f64 = 0.5;

/// Default distance from the most massive body at which the origin re-bases, m
pub const FLOATING_ORIGIN_THRESHOLD: f64 = 1.0e7;

/// Close encounter when closer than this many radii of a massive body
pub const CLOSE_ENCOUNTER_FACTOR: f64 = 5.0;

/// Largest raw frame time accepted by one `update` call, s
pub const MAX_FRAME_DT: f64 = 0.25;
