use nbody_engine::constants::{AU, EARTH_MASS, EARTH_MU, EARTH_RADIUS, SUN_MASS};
use nbody_engine::orbits::{
    circular_velocity, dominant_source, eccentricity, eccentricity_vector, hill_radius,
    in_close_encounter, laplace_soi, semi_major_axis, specific_orbital_energy, InfluenceSource,
    OrbitalElements, SoiTracker,
};
use nbody_engine::{BodyId, Vector3};
use approx::assert_relative_eq;

#[test]
fn test_circular_elements() {
    let r = EARTH_RADIUS + 500_000.0;
    let (position, velocity) = OrbitalElements::circular(r).to_state_vectors(EARTH_MU).unwrap();

    assert_relative_eq!(position, Vector3::new(r, 0.0, 0.0), max_relative = 1e-12);
    assert_relative_eq!(velocity.length(), circular_velocity(EARTH_MU, r), max_relative = 1e-12);
    assert!(velocity.y > 0.0);
    assert!(eccentricity(&position, &velocity, EARTH_MU) < 1e-12);
}

#[test]
fn test_elements_to_state_vectors() {
    let elements = OrbitalElements::from_degrees(2.0e7, 0.3, 30.0, 40.0, 60.0, 0.0);
    let (position, velocity) = elements.to_state_vectors(EARTH_MU).unwrap();

    // Mean anomaly zero puts the body at periapsis
    assert_relative_eq!(position.length(), 2.0e7 * 0.7, max_relative = 1e-12);
    assert_relative_eq!(semi_major_axis(&position, &velocity, EARTH_MU), 2.0e7, max_relative = 1e-9);
    assert_relative_eq!(eccentricity(&position, &velocity, EARTH_MU), 0.3, max_relative = 1e-9);

    // The eccentricity vector points at periapsis
    let periapsis = eccentricity_vector(&position, &velocity, EARTH_MU).normalize();
    assert_relative_eq!(periapsis, position.normalize(), epsilon = 1e-9);

    let h = position.cross(&velocity);
    assert_relative_eq!((h.z / h.length()).acos().to_degrees(), 30.0, max_relative = 1e-9);
}

#[test]
fn test_specific_energy_of_circular_orbit() {
    let r = 4.2e7;
    let position = Vector3::new(0.0, r, 0.0);
    let velocity = Vector3::new(-circular_velocity(EARTH_MU, r), 0.0, 0.0);

    let energy = specific_orbital_energy(&position, &velocity, EARTH_MU);
    assert_relative_eq!(energy, -EARTH_MU / (2.0 * r), max_relative = 1e-12);
    assert_relative_eq!(semi_major_axis(&position, &velocity, EARTH_MU), r, max_relative = 1e-12);
}

#[test]
fn test_eccentric_anomaly_solves_kepler() {
    for &(e, m) in &[(0.0, 1.0), (0.1, 0.5), (0.5, 3.0), (0.95, 0.2)] {
        let elements = OrbitalElements {
            eccentricity: e,
            mean_anomaly: m,
            ..OrbitalElements::circular(1.0e7)
        };
        let anomaly = elements.eccentric_anomaly();
        assert_relative_eq!(anomaly - e * anomaly.sin(), m, epsilon = 1e-12);
    }
}

#[test]
fn test_invalid_elements() {
    let hyperbolic = OrbitalElements {
        eccentricity: 1.2,
        ..OrbitalElements::circular(1.0e7)
    };
    assert!(hyperbolic.to_state_vectors(EARTH_MU).is_err());

    let negative = OrbitalElements::circular(-1.0);
    assert!(negative.to_state_vectors(EARTH_MU).is_err());
}

#[test]
fn test_soi_radii() {
    let laplace = laplace_soi(AU, EARTH_MASS, SUN_MASS);
    assert_relative_eq!(laplace, 9.24e8, max_relative = 1e-2);

    let hill = hill_radius(AU, EARTH_MASS, SUN_MASS);
    assert_relative_eq!(hill, 1.5e9, max_relative = 1e-2);
    assert!(hill > laplace);

    assert_eq!(laplace_soi(AU, 0.0, SUN_MASS), 0.0);
    assert_eq!(hill_radius(-AU, EARTH_MASS, SUN_MASS), 0.0);
}

fn sun_and_earth<'a>(sun: &'a BodyId, earth: &'a BodyId) -> Vec<InfluenceSource<'a>> {
    vec![
        InfluenceSource {
            id: sun,
            position: Vector3::ZERO,
            mass: SUN_MASS,
            radius: 6.957e8,
            soi_radius: None,
        },
        InfluenceSource {
            id: earth,
            position: Vector3::new(AU, 0.0, 0.0),
            mass: EARTH_MASS,
            radius: EARTH_RADIUS,
            soi_radius: Some(9.24e8),
        },
    ]
}

#[test]
fn test_dominant_source() {
    let (sun, earth) = (BodyId::new("sun"), BodyId::new("earth"));
    let sources = sun_and_earth(&sun, &earth);

    assert_eq!(dominant_source(&Vector3::new(AU + 1.0e8, 0.0, 0.0), &sources), Some(1));
    assert_eq!(dominant_source(&Vector3::new(AU, 0.0, 0.0), &sources), Some(1));
    assert_eq!(dominant_source(&Vector3::new(-AU, 0.0, 0.0), &sources), Some(0));

    // Inside Earth's SOI but where the Sun still pulls harder
    let edge = Vector3::new(AU - 9.0e8, 0.0, 0.0);
    assert_eq!(dominant_source(&edge, &sources), Some(0));

    // Only bounded sources and the point is outside all of them
    assert_eq!(dominant_source(&Vector3::ZERO, &sources[1..]), None);
    assert_eq!(dominant_source(&Vector3::ZERO, &[]), None);
}

#[test]
fn test_close_encounter() {
    let (sun, earth) = (BodyId::new("sun"), BodyId::new("earth"));
    let sources = sun_and_earth(&sun, &earth);

    let low_orbit = Vector3::new(AU + 2.0 * EARTH_RADIUS, 0.0, 0.0);
    assert!(in_close_encounter(&low_orbit, &sources, 5.0, None));
    assert!(!in_close_encounter(&low_orbit, &sources, 1.5, None));

    // A massive body is never in an encounter with itself
    assert!(!in_close_encounter(&Vector3::new(AU, 0.0, 0.0), &sources, 5.0, Some(1)));
}

#[test]
fn test_soi_tracker_transitions() {
    let (sun, earth) = (BodyId::new("sun"), BodyId::new("earth"));
    let sources = sun_and_earth(&sun, &earth);
    let probe = BodyId::new("probe");
    let mut tracker = SoiTracker::new();

    let near_earth = Vector3::new(AU + 1.0e8, 0.0, 0.0);
    let events = tracker.update(vec![(&probe, near_earth)], &sources, 10.0, 1);
    assert_eq!(events.len(), 1);
    assert!(events[0].from.is_none());
    assert_eq!(events[0].to.as_ref().unwrap(), "earth");
    assert_eq!(events[0].tick, 1);

    // No event while the assignment holds
    assert!(tracker.update(vec![(&probe, near_earth)], &sources, 20.0, 2).is_empty());

    let deep_space = Vector3::new(-AU, 0.0, 0.0);
    let events = tracker.update(vec![(&probe, deep_space)], &sources, 30.0, 3);
    assert_eq!(events[0].from.as_ref().unwrap(), "earth");
    assert_eq!(events[0].to.as_ref().unwrap(), "sun");
    assert_eq!(events[0].timestamp, 30.0);

    tracker.forget_massive("sun");
    assert!(tracker.assignment("probe").is_none());

    tracker.restore(vec![(probe.clone(), earth.clone())]);
    assert_eq!(tracker.assignments().count(), 1);
    tracker.forget_passive("probe");
    assert_eq!(tracker.assignments().count(), 0);
}
