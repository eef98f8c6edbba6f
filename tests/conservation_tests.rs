use nbody_engine::{
    BodyCore, BodyState, NBodyWorld, SimulationConfig, Vector3,
    constants::{AU, DAY, EARTH_MASS, EARTH_RADIUS, G, MOON_MASS, SUN_MASS, SUN_RADIUS},
    orbits::{circular_velocity, eccentricity, escape_velocity, orbital_period},
    presets,
};
use approx::assert_relative_eq;

fn config(dt: f64) -> SimulationConfig {
    SimulationConfig {
        dt,
        max_frame_dt: 1.0e12,
        max_substeps_per_update: 1_000_000,
        ..SimulationConfig::default()
    }
}

fn sun_earth(dt: f64) -> NBodyWorld {
    let mut world = NBodyWorld::with_config(config(dt)).unwrap();
    for (core, state) in presets::sun_earth() {
        world.add_body(core, state).unwrap();
    }
    world
}

fn relative_position(world: &NBodyWorld, body: &str, primary: &str) -> Vector3 {
    world.get_body(body).unwrap().state().position - world.get_body(primary).unwrap().state().position
}

fn relative_velocity(world: &NBodyWorld, body: &str, primary: &str) -> Vector3 {
    world.get_body(body).unwrap().state().velocity - world.get_body(primary).unwrap().state().velocity
}

#[test]
fn test_kepler_third_law() {
    let dt = 3_600.0;
    let mut world = sun_earth(dt);
    let expected = orbital_period(AU, G * (SUN_MASS + EARTH_MASS));

    // Earth starts on +x moving +y; find the next upward crossing of the x-axis
    let mut previous = relative_position(&world, "earth", "sun");
    let mut period = None;
    for _ in 0..20_000 {
        world.tick(dt).unwrap();
        let current = relative_position(&world, "earth", "sun");

        if previous.y < 0.0 && current.y >= 0.0 && current.x > 0.0 {
            let fraction = -previous.y / (current.y - previous.y);
            period = Some(world.get_time() - dt + fraction * dt);
            break;
        }
        previous = current;
    }

    let period = period.expect("orbit never closed");
    assert_relative_eq!(period, expected, max_relative = 1e-4);
}

#[test]
fn test_energy_conservation() {
    let mut world = sun_earth(60.0);
    let initial = world.calculate_total_energy();
    assert!(initial < 0.0);

    world.update(10.0 * DAY).unwrap();
    assert_eq!(world.get_state().tick, 14_400);

    let drift = ((world.calculate_total_energy() - initial) / initial).abs();
    assert!(drift < 1e-5, "energy drift {}", drift);
}

#[test]
fn test_angular_momentum_conservation() {
    let mut world = sun_earth(60.0);
    let initial = world.calculate_angular_momentum().z;
    assert!(initial > 0.0);

    world.update(10.0 * DAY).unwrap();

    let drift = ((world.calculate_angular_momentum().z - initial) / initial).abs();
    assert!(drift < 1e-5, "L_z drift {}", drift);
}

#[test]
fn test_three_body_energy_with_monitor() {
    let mut world = NBodyWorld::with_config(config(60.0)).unwrap();
    for (core, state) in presets::sun_earth_moon().unwrap() {
        world.add_body(core, state).unwrap();
    }

    world.sample_energy();
    for _ in 0..10 {
        world.update(DAY).unwrap();
        world.sample_energy();
    }

    assert!(world.energy_drift() < 1e-5, "energy drift {}", world.energy_drift());
    assert!(world.energy_monitor().current_drift() <= world.energy_drift());
}

#[test]
fn test_sun_earth_moon_starts_at_rest_at_the_origin() {
    let system = presets::sun_earth_moon().unwrap();
    let ids: Vec<&str> = system.iter().map(|(core, _)| core.id().as_str()).collect();
    assert_eq!(ids, vec!["sun", "earth", "moon"]);

    let mut world = NBodyWorld::with_config(config(60.0)).unwrap();
    for (core, state) in system {
        world.add_body(core, state).unwrap();
    }

    // Momentum scale of the Earth's orbit
    let scale = EARTH_MASS * 3.0e4;
    assert!(world.calculate_linear_momentum().length() < 1e-9 * scale);
    assert!(world.calculate_center_of_mass().length() < 1e-3);

    // Recentering leaves the Moon's orbit about the Earth alone
    let mu = G * (EARTH_MASS + MOON_MASS);
    let r = relative_position(&world, "moon", "earth");
    let v = relative_velocity(&world, "moon", "earth");
    assert_relative_eq!(eccentricity(&r, &v, mu), 0.0549, max_relative = 1e-9);
    assert_relative_eq!(r.length(), 3.844e8 * (1.0 - 0.0549), max_relative = 1e-9);

    world.update(10.0 * DAY).unwrap();
    assert!(world.calculate_linear_momentum().length() < 1e-9 * scale);
    assert!(world.calculate_center_of_mass().length() < 1.0);
}

#[test]
fn test_circular_orbit_stability() {
    let mut world = NBodyWorld::with_config(config(60.0)).unwrap();
    world.add_body(presets::earth(), BodyState::default()).unwrap();

    let mu = G * EARTH_MASS;
    let r = 4.216e7;
    let start = presets::circular_orbit_state(&BodyState::default(), mu, r);
    assert_relative_eq!(start.velocity.length(), circular_velocity(mu, r));
    world
        .add_body(BodyCore::passive("satellite", "Satellite", 500.0, 2.0), start)
        .unwrap();

    let mut worst: f64 = 0.0;
    for _ in 0..30 {
        world.update(DAY).unwrap();
        let e = eccentricity(
            &relative_position(&world, "satellite", "earth"),
            &relative_velocity(&world, "satellite", "earth"),
            mu,
        );
        worst = worst.max(e);
    }

    assert!(worst < 1e-3, "eccentricity {}", worst);
    assert_relative_eq!(world.get_time(), 30.0 * DAY, max_relative = 1e-12);
}

#[test]
fn test_escape_velocity() {
    let v = escape_velocity(G * EARTH_MASS, EARTH_RADIUS);
    assert_relative_eq!(v, 11_186.0, max_relative = 1e-3);
    assert_relative_eq!(v, circular_velocity(G * EARTH_MASS, EARTH_RADIUS) * 2.0f64.sqrt(), max_relative = 1e-12);
}

#[test]
fn test_escape_trajectory_is_unbound() {
    let mut world = NBodyWorld::with_config(config(10.0)).unwrap();
    world.add_body(presets::earth(), BodyState::default()).unwrap();

    let mu = G * EARTH_MASS;
    let r = EARTH_RADIUS + 1.0e6;
    let launch = BodyState::new(Vector3::new(r, 0.0, 0.0), Vector3::new(escape_velocity(mu, r) * 1.01, 0.0, 0.0));
    world.add_body(BodyCore::passive("probe", "Probe", 1.0, 1.0), launch).unwrap();

    world.update(DAY).unwrap();
    let distance = relative_position(&world, "probe", "earth").length();
    let speed = relative_velocity(&world, "probe", "earth").length();

    // Still receding with positive specific energy
    assert!(distance > 1.0e8);
    assert!(0.5 * speed * speed - mu / distance > 0.0);
}

#[test]
fn test_barycenter_invariance() {
    let mut world = NBodyWorld::with_config(config(60.0)).unwrap();
    let (a, b) = presets::barycentric_pair(SUN_MASS, 0.5 * SUN_MASS, 0.5 * AU);
    world.add_body(BodyCore::massive("alpha", "Alpha", SUN_MASS, SUN_RADIUS), a).unwrap();
    world.add_body(BodyCore::massive("beta", "Beta", 0.5 * SUN_MASS, 0.8 * SUN_RADIUS), b).unwrap();

    let initial = world.calculate_center_of_mass();
    assert!(initial.length() < 1.0);
    assert!(world.calculate_linear_momentum().length() / (SUN_MASS * 1.0e4) < 1e-12);

    world.update(5.0 * DAY).unwrap();

    let drift = world.calculate_center_of_mass().distance(&initial);
    assert!(drift < 1.0, "barycenter moved {} m", drift);
}

#[test]
fn test_barycenter_invariance_with_barnes_hut() {
    let config = SimulationConfig {
        gravity_algorithm: nbody_engine::GravityAlgorithm::BarnesHut,
        ..config(60.0)
    };
    let mut world = NBodyWorld::with_config(config).unwrap();
    let (a, b) = presets::barycentric_pair(SUN_MASS, SUN_MASS, 0.3 * AU);
    world.add_body(BodyCore::massive("alpha", "Alpha", SUN_MASS, SUN_RADIUS), a).unwrap();
    world.add_body(BodyCore::massive("beta", "Beta", SUN_MASS, SUN_RADIUS), b).unwrap();

    let initial = world.calculate_center_of_mass();
    world.update(5.0 * DAY).unwrap();

    let drift = world.calculate_center_of_mass().distance(&initial);
    assert!(drift < 1.0, "barycenter moved {} m", drift);
}
