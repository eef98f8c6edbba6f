//! Reference bodies and initial-state builders.
//!
//! States are relative to whatever frame the primary's state is given in,
//! except for the ready-made systems, which are barycentric. Nothing here
//! touches an engine.

use crate::bodies::{BodyClass, BodyCore, BodyState};
use crate::constants::*;
use crate::math::Vector3;
use crate::orbits::{circular_velocity, OrbitalElements};
use crate::Result;

/// The Sun as a massive star
pub fn sun() -> BodyCore {
    BodyCore::massive("sun", "Sun", SUN_MASS, SUN_RADIUS)
        .with_class(BodyClass::Star)
        .with_rotation_period(SUN_ROTATION_PERIOD)
}

/// The Earth, parented to the Sun
pub fn earth() -> BodyCore {
    BodyCore::massive("earth", "Earth", EARTH_MASS, EARTH_RADIUS)
        .with_class(BodyClass::Planet)
        .with_rotation_period(EARTH_ROTATION_PERIOD)
        .with_parent("sun")
}

/// The Moon, parented to the Earth and tidally locked
pub fn moon() -> BodyCore {
    let mu = G * (EARTH_MASS + MOON_MASS);
    BodyCore::massive("moon", "Moon", MOON_MASS, MOON_RADIUS)
        .with_class(BodyClass::Moon)
        .with_rotation_period(OrbitalElements::circular(MOON_SEMI_MAJOR_AXIS).period(mu))
        .with_parent("earth")
}

/// A prograde circular orbit of `radius` in the xy-plane, starting on +x
/// from the primary
pub fn circular_orbit_state(primary: &BodyState, primary_mu: f64, radius: f64) -> BodyState {
    let speed = circular_velocity(primary_mu, radius);
    BodyState::new(
        primary.position + Vector3::new(radius, 0.0, 0.0),
        primary.velocity + Vector3::new(0.0, speed, 0.0),
    )
}

/// State on the orbit described by `elements` around `primary`
pub fn orbit_state(
    primary: &BodyState,
    primary_mu: f64,
    elements: &OrbitalElements,
) -> Result<BodyState> {
    let (position, velocity) = elements.to_state_vectors(primary_mu)?;
    Ok(BodyState::new(
        primary.position + position,
        primary.velocity + velocity,
    ))
}

/// Two bodies on circular orbits about their common barycenter at the origin
///
/// The bodies lie on the x-axis, `mass_a` on the negative side, and the
/// total momentum is zero.
pub fn barycentric_pair(mass_a: f64, mass_b: f64, separation: f64) -> (BodyState, BodyState) {
    let total = mass_a + mass_b;
    let relative_speed = circular_velocity(G * total, separation);

    let r_a = separation * mass_b / total;
    let r_b = separation * mass_a / total;
    let v_a = relative_speed * mass_b / total;
    let v_b = relative_speed * mass_a / total;

    (
        BodyState::new(Vector3::new(-r_a, 0.0, 0.0), Vector3::new(0.0, -v_a, 0.0)),
        BodyState::new(Vector3::new(r_b, 0.0, 0.0), Vector3::new(0.0, v_b, 0.0)),
    )
}

/// Sun at the origin at rest and the Earth on a circular orbit at 1 AU
pub fn sun_earth() -> Vec<(BodyCore, BodyState)> {
    let sun_state = BodyState::default();
    let earth_state = circular_orbit_state(&sun_state, G * (SUN_MASS + EARTH_MASS), AU);
    vec![(sun(), sun_state), (earth(), earth_state)]
}

/// Sun, Earth and Moon about their common barycenter
///
/// The Earth circles the Sun at 1 AU; the Moon starts at perigee of its
/// real orbit, inclined 5.145° to the ecliptic.
pub fn sun_earth_moon() -> Result<Vec<(BodyCore, BodyState)>> {
    let sun_state = BodyState::default();
    let earth_state = circular_orbit_state(&sun_state, G * (SUN_MASS + EARTH_MASS), AU);
    let moon_state = orbit_state(
        &earth_state,
        G * (EARTH_MASS + MOON_MASS),
        &OrbitalElements::from_degrees(MOON_SEMI_MAJOR_AXIS, 0.0549, 5.145, 0.0, 0.0, 0.0),
    )?;

    let mut system = vec![
        (sun(), sun_state),
        (earth(), earth_state),
        (moon(), moon_state),
    ];
    recenter_to_barycenter(&mut system);
    Ok(system)
}

/// Shifts a system so the center of mass of its massive bodies sits at the
/// origin at rest
///
/// Passive bodies are moved along but do not take part in the average.
pub fn recenter_to_barycenter(system: &mut [(BodyCore, BodyState)]) {
    let mut total_mass = 0.0;
    let mut weighted_position = Vector3::ZERO;
    let mut weighted_velocity = Vector3::ZERO;

    for (core, state) in system.iter().filter(|(core, _)| core.is_massive()) {
        total_mass += core.mass();
        weighted_position += state.position * core.mass();
        weighted_velocity += state.velocity * core.mass();
    }
    if total_mass <= 0.0 {
        return;
    }

    let center = weighted_position / total_mass;
    let drift = weighted_velocity / total_mass;
    for (_, state) in system.iter_mut() {
        state.position -= center;
        state.velocity -= drift;
    }
}
