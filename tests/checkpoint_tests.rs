use nbody_engine::{
    BodyCore, BodyState, NBodyWorld, SimulationConfig, Vector3,
    constants::{AU, EARTH_MASS, G},
    core::{Checkpoint, CollisionEventType},
    presets,
};

fn config() -> SimulationConfig {
    SimulationConfig {
        dt: 60.0,
        max_frame_dt: 1.0e9,
        max_substeps_per_update: 100_000,
        ..SimulationConfig::default()
    }
}

/// Sun, Earth, an orbiting probe inside Earth's SOI and two touching rocks
fn busy_world() -> NBodyWorld {
    let mut world = NBodyWorld::with_config(config()).unwrap();
    for (core, state) in presets::sun_earth() {
        world.add_body(core, state).unwrap();
    }
    world.assign_laplace_soi_radii();

    let earth = *world.get_body("earth").unwrap().state();
    let probe = presets::circular_orbit_state(&earth, G * EARTH_MASS, 5.0e7);
    world
        .add_body(BodyCore::passive("probe", "Probe", 800.0, 3.0), probe)
        .unwrap();

    let rocks = Vector3::new(0.0, 3.0 * AU, 0.0);
    world
        .add_body(BodyCore::passive("rock-a", "Rock A", 10.0, 5.0), BodyState::new(rocks, Vector3::ZERO))
        .unwrap();
    world
        .add_body(
            BodyCore::passive("rock-b", "Rock B", 10.0, 5.0),
            BodyState::new(rocks + Vector3::new(4.0, 0.0, 0.0), Vector3::ZERO),
        )
        .unwrap();
    world
}

#[test]
fn test_checkpoint_continues_identically() {
    let mut original = busy_world();
    original.update(90.0 * 60.0 + 25.0).unwrap();

    let checkpoint = original.checkpoint();
    let mut restored = NBodyWorld::from_checkpoint(checkpoint.clone()).unwrap();

    assert_eq!(restored.get_state(), original.get_state());
    assert_eq!(restored.snapshot(), original.snapshot());
    assert_eq!(restored.checkpoint(), checkpoint);

    for _ in 0..5 {
        original.update(3_600.0).unwrap();
        restored.update(3_600.0).unwrap();
    }

    assert_eq!(restored.snapshot(), original.snapshot());
    assert_eq!(restored.get_state(), original.get_state());
}

#[test]
fn test_checkpoint_keeps_soi_and_collision_memory() {
    let mut original = busy_world();
    original.tick(60.0).unwrap();
    assert_eq!(original.dominant_body("probe").unwrap(), "earth");

    let checkpoint = original.checkpoint();
    assert!(checkpoint
        .soi_assignments
        .iter()
        .any(|(body, dominant)| body == "probe" && dominant == "earth"));
    assert_eq!(checkpoint.active_collisions.len(), 1);

    let mut restored = NBodyWorld::from_checkpoint(checkpoint).unwrap();
    assert_eq!(restored.dominant_body("probe").unwrap(), "earth");

    // The restored engine does not re-announce state it already reported
    restored.tick(60.0).unwrap();
    assert!(!restored.get_events().has_soi_events());
    let collisions: Vec<_> = restored.get_events().collision_events().collect();
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].event_type, CollisionEventType::Persist);
}

#[test]
fn test_checkpoint_keeps_origin_anchor() {
    let mut original = busy_world();
    original.set_origin_body(Some("earth")).unwrap();
    original.tick(60.0).unwrap();

    let restored = NBodyWorld::from_checkpoint(original.checkpoint()).unwrap();
    let state = restored.get_state();
    assert_eq!(state.origin_body_id.unwrap(), "earth");
    assert_eq!(state.origin_offset, original.get_state().origin_offset);
}

#[test]
fn test_checkpoint_drops_dangling_references() {
    let original = busy_world();
    let mut checkpoint = original.checkpoint();

    checkpoint.state.origin_body_id = Some("nowhere".into());
    checkpoint.soi_assignments.push(("ghost".into(), "earth".into()));
    checkpoint.active_collisions.push(("ghost".into(), "rock-a".into()));

    let restored = NBodyWorld::from_checkpoint(checkpoint).unwrap();
    assert!(restored.get_state().origin_body_id.is_none());
    assert!(restored.dominant_body("ghost").is_none());
    assert!(restored.checkpoint().active_collisions.is_empty());
}

#[test]
fn test_checkpoint_rejects_bad_contents() {
    let original = busy_world();

    let mut duplicated: Checkpoint = original.checkpoint();
    let first = duplicated.bodies[0].clone();
    duplicated.bodies.push(first);
    assert!(NBodyWorld::from_checkpoint(duplicated).is_err());

    let mut misconfigured = original.checkpoint();
    misconfigured.config.dt = -1.0;
    assert!(NBodyWorld::from_checkpoint(misconfigured).is_err());
}

#[test]
fn test_snapshot_contents() {
    let mut world = busy_world();
    world.tick(60.0).unwrap();
    let snapshot = world.snapshot();

    assert_eq!(snapshot.tick, 1);
    assert_eq!(snapshot.time, 60.0);
    assert_eq!(snapshot.bodies.len(), world.body_count());

    let earth = world.get_body("earth").unwrap().state();
    let entry = snapshot.body("earth").unwrap();
    assert_eq!(entry.position, earth.position.to_array());
    assert_eq!(entry.velocity, earth.velocity.to_array());
    assert_eq!(entry.rotation, earth.rotation);
    assert!(snapshot.body("pluto").is_none());
}

#[cfg(feature = "serialize")]
mod json {
    use super::*;
    use nbody_engine::core::Snapshot;

    #[test]
    fn test_checkpoint_json_round_trip() {
        let mut original = busy_world();
        original.update(600.0).unwrap();

        let json = original.checkpoint().to_json().unwrap();
        let mut restored = NBodyWorld::from_checkpoint(Checkpoint::from_json(&json).unwrap()).unwrap();

        original.update(600.0).unwrap();
        restored.update(600.0).unwrap();
        assert_eq!(restored.snapshot(), original.snapshot());
    }

    #[test]
    fn test_snapshot_json() {
        let world = busy_world();
        let json = world.snapshot().to_json().unwrap();
        assert!(json.contains("\"earth\""));
        assert_eq!(Snapshot::from_json(&json).unwrap(), world.snapshot());
    }

    #[test]
    fn test_config_json_uses_names() {
        let json = serde_json::to_string(&SimulationConfig::default()).unwrap();
        assert!(json.contains("\"velocity-verlet\""));
        assert!(json.contains("\"direct\""));

        let partial: SimulationConfig = serde_json::from_str(r#"{ "dt": 0.5 }"#).unwrap();
        assert_eq!(partial.dt, 0.5);
        assert_eq!(partial.max_substeps_per_update, 10);
    }

    #[test]
    fn test_restore_rejects_mu_out_of_step_with_mass() {
        let json = busy_world().checkpoint().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let earth = &mut value["bodies"][1]["core"];
        assert_eq!(earth["id"], "earth");
        earth["mu"] = serde_json::json!(2.0 * G * EARTH_MASS);

        let checkpoint = Checkpoint::from_json(&value.to_string()).unwrap();
        match NBodyWorld::from_checkpoint(checkpoint) {
            Err(nbody_engine::error::PhysicsError::InvalidParameter(message)) => {
                assert!(message.contains("earth"));
                assert!(message.contains("mu"));
            }
            other => panic!("unexpected {:?}", other.map(|world| world.body_count())),
        }

        // The untouched checkpoint still restores
        assert!(NBodyWorld::from_checkpoint(Checkpoint::from_json(&json).unwrap()).is_ok());
    }

    #[test]
    fn test_bad_json_is_a_serialization_error() {
        match Checkpoint::from_json("{ not json") {
            Err(nbody_engine::error::PhysicsError::Serialization(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
