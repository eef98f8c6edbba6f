use nbody_engine::constants::{EARTH_MASS, EARTH_RADIUS, G, SUN_MASS};
use nbody_engine::forces::{
    create_gravity, softened_acceleration, BarnesHutGravity, DirectGravity, FieldSource,
    GravityAlgorithm, GravityCalculator,
};
use nbody_engine::math::Vector3;
use nbody_engine::error::PhysicsError;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn source(position: Vector3, mass: f64, softening: f64) -> FieldSource {
    FieldSource::new(position, mass, G * mass, softening)
}

fn random_cloud(count: usize, seed: u64) -> Vec<FieldSource> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let position = Vector3::new(
                rng.gen_range(-1.0e9..1.0e9),
                rng.gen_range(-1.0e9..1.0e9),
                rng.gen_range(-1.0e8..1.0e8),
            );
            source(position, rng.gen_range(1.0e20..1.0e24), 1_000.0)
        })
        .collect()
}

#[test]
fn test_empty_field_is_zero() {
    let point = Vector3::new(1.0, 2.0, 3.0);

    let mut direct = DirectGravity::new();
    direct.prepare(&[]);
    assert_eq!(direct.acceleration_at(&point, None), Vector3::ZERO);

    let mut tree = BarnesHutGravity::new(0.5, 16);
    tree.prepare(&[]);
    assert_eq!(tree.acceleration_at(&point, None), Vector3::ZERO);
    assert_eq!(tree.source_count(), 0);
}

#[test]
fn test_direct_matches_newton() {
    let mut direct = DirectGravity::new();
    direct.prepare(&[source(Vector3::ZERO, EARTH_MASS, 0.0)]);

    let point = Vector3::new(EARTH_RADIUS, 0.0, 0.0);
    let acc = direct.acceleration_at(&point, None);

    let expected = G * EARTH_MASS / (EARTH_RADIUS * EARTH_RADIUS);
    assert_relative_eq!(acc.x, -expected, max_relative = 1e-12);
    assert_eq!(acc.y, 0.0);
    assert_eq!(acc.z, 0.0);

    // Surface gravity sanity check
    assert_relative_eq!(acc.length(), 9.82, max_relative = 1e-2);
}

#[test]
fn test_exclusion_skips_self() {
    let sources = vec![
        source(Vector3::ZERO, SUN_MASS, 0.0),
        source(Vector3::new(1.0e11, 0.0, 0.0), EARTH_MASS, 0.0),
    ];
    let mut direct = DirectGravity::new();
    direct.prepare(&sources);

    let at_sun = direct.acceleration_at(&Vector3::ZERO, Some(0));
    assert!(at_sun.x > 0.0);
    assert_relative_eq!(at_sun.x, G * EARTH_MASS / 1.0e22, max_relative = 1e-12);

    // A source queried at its own position without exclusion contributes nothing
    let raw = direct.acceleration_at(&Vector3::ZERO, None);
    assert!(raw.is_finite());
    assert_relative_eq!(raw, at_sun, max_relative = 1e-12);
}

#[test]
fn test_forces_are_antisymmetric() {
    let a = source(Vector3::new(-3.0e8, 1.0e7, 0.0), 5.0e24, 1_000.0);
    let b = source(Vector3::new(2.0e8, -4.0e7, 1.0e6), 7.0e22, 1_000.0);
    let mut direct = DirectGravity::new();
    direct.prepare(&[a, b]);

    let force_on_a = direct.acceleration_at(&a.position, Some(0)) * a.mass;
    let force_on_b = direct.acceleration_at(&b.position, Some(1)) * b.mass;

    assert_relative_eq!(force_on_a, -force_on_b, max_relative = 1e-12);
}

#[test]
fn test_softening_bounds_close_range() {
    let eps = 1_000.0;
    let acc = softened_acceleration(&Vector3::new(1.0, 0.0, 0.0), &Vector3::ZERO, G * EARTH_MASS, eps * eps);
    assert!(acc.is_finite());

    // Peak of the Plummer profile is at r = eps / sqrt(2)
    let peak = G * EARTH_MASS / (2.0f64.sqrt() * 1.5f64.powf(1.5) * eps * eps);
    assert!(acc.length() <= peak * 1.0001);

    // Coincident source and query with no softening stays finite
    let degenerate = softened_acceleration(&Vector3::ZERO, &Vector3::ZERO, G * EARTH_MASS, 0.0);
    assert_eq!(degenerate, Vector3::ZERO);
}

#[test]
fn test_barnes_hut_theta_zero_is_exact() {
    let sources = random_cloud(200, 7);
    let mut direct = DirectGravity::new();
    direct.prepare(&sources);
    let mut tree = BarnesHutGravity::new(0.0, 16);
    tree.prepare(&sources);

    for (index, s) in sources.iter().enumerate() {
        let exact = direct.acceleration_at(&s.position, Some(index));
        let approx = tree.acceleration_at(&s.position, Some(index));
        assert_relative_eq!(approx, exact, epsilon = exact.length() * 1e-12, max_relative = 1e-9);
    }
}

#[test]
fn test_barnes_hut_close_to_direct() {
    let sources = random_cloud(500, 42);
    let mut direct = DirectGravity::new();
    direct.prepare(&sources);
    let mut tree = BarnesHutGravity::new(0.5, 16);
    tree.prepare(&sources);

    let mut worst: f64 = 0.0;
    let mut total = 0.0;
    for (index, s) in sources.iter().enumerate() {
        let exact = direct.acceleration_at(&s.position, Some(index));
        let approx = tree.acceleration_at(&s.position, Some(index));
        let error = (approx - exact).length() / exact.length();
        worst = worst.max(error);
        total += error;
    }

    let mean = total / sources.len() as f64;
    assert!(mean < 0.01, "mean relative error {}", mean);
    assert!(worst < 0.1, "worst relative error {}", worst);
}

#[test]
fn test_barnes_hut_queries_outside_the_tree() {
    let sources = random_cloud(64, 3);
    let mut direct = DirectGravity::new();
    direct.prepare(&sources);
    let mut tree = BarnesHutGravity::new(0.5, 16);
    tree.prepare(&sources);

    // A passive probe far away sees the cloud as nearly one point mass
    let probe = Vector3::new(1.0e12, 0.0, 0.0);
    let exact = direct.acceleration_at(&probe, None);
    let approx = tree.acceleration_at(&probe, None);
    assert_relative_eq!(approx, exact, epsilon = exact.length() * 1e-4);
}

#[test]
fn test_barnes_hut_aggregate() {
    let sources = vec![
        source(Vector3::new(-1.0, 0.0, 0.0), 3.0, 0.0),
        source(Vector3::new(1.0, 0.0, 0.0), 1.0, 0.0),
        source(Vector3::new(0.0, 4.0, 0.0), 4.0, 0.0),
    ];
    let mut tree = BarnesHutGravity::new(0.5, 16);
    tree.prepare(&sources);

    let (mass, com) = tree.root_aggregate().unwrap();
    assert_relative_eq!(mass, 8.0);
    assert_relative_eq!(com, Vector3::new(-0.25, 2.0, 0.0), epsilon = 1e-12);
    assert!(tree.node_count() > 1);
}

#[test]
fn test_barnes_hut_coincident_bodies() {
    // Identical positions must bucket at max depth instead of recursing forever
    let position = Vector3::new(5.0e6, 5.0e6, 5.0e6);
    let sources: Vec<FieldSource> = (0..10).map(|_| source(position, 1.0e20, 100.0)).collect();

    let mut tree = BarnesHutGravity::new(0.5, 8);
    tree.prepare(&sources);

    let acc = tree.acceleration_at(&Vector3::ZERO, None);
    let mut direct = DirectGravity::new();
    direct.prepare(&sources);
    assert_relative_eq!(acc, direct.acceleration_at(&Vector3::ZERO, None), max_relative = 1e-9);

    let on_member = tree.acceleration_at(&position, Some(0));
    assert!(on_member.is_finite());
}

#[test]
fn test_rebuild_reflects_new_positions() {
    let mut tree = BarnesHutGravity::default();
    tree.prepare(&[source(Vector3::new(1.0e7, 0.0, 0.0), EARTH_MASS, 0.0)]);
    let before = tree.acceleration_at(&Vector3::ZERO, None);

    tree.prepare(&[source(Vector3::new(-1.0e7, 0.0, 0.0), EARTH_MASS, 0.0)]);
    let after = tree.acceleration_at(&Vector3::ZERO, None);

    assert!(before.x > 0.0);
    assert!(after.x < 0.0);
    assert_relative_eq!(before.x, -after.x, max_relative = 1e-12);
}

#[test]
fn test_algorithm_names() {
    assert_eq!("direct".parse::<GravityAlgorithm>().unwrap(), GravityAlgorithm::Direct);
    assert_eq!("barnes-hut".parse::<GravityAlgorithm>().unwrap(), GravityAlgorithm::BarnesHut);
    assert_eq!(GravityAlgorithm::BarnesHut.to_string(), "barnes-hut");

    match "fmm".parse::<GravityAlgorithm>() {
        Err(PhysicsError::UnknownGravityAlgorithm(name)) => assert_eq!(name, "fmm"),
        other => panic!("unexpected {:?}", other),
    }

    let calculator = create_gravity(GravityAlgorithm::BarnesHut, 0.5, 16);
    assert_eq!(calculator.algorithm(), GravityAlgorithm::BarnesHut);
}
