use crate::bodies::{BodyFlags, CelestialBody};
use crate::collision::{BroadPhase, CollisionPair, CollisionTracker};
use crate::core::events::{CollisionEvent, EventQueue};
use crate::math::Aabb;
use std::collections::HashMap;

/// Detect sphere overlaps and queue collision events.
///
/// This function performs the following steps:
/// 1. Feed the broad phase one bounding box per collidable body.
/// 2. Keep the candidate pairs whose centers are closer than the sum of radii.
/// 3. Classify each overlap as `Begin` or `Persist` against the previous tick.
///
/// No response is computed; bodies pass through each other.
pub fn detect_collisions(
    bodies: &[CelestialBody],
    broad_phase: &mut dyn BroadPhase,
    tracker: &mut CollisionTracker,
    timestamp: f64,
    events: &mut EventQueue,
) {
    let collidable: Vec<&CelestialBody> = bodies
        .iter()
        .filter(|body| body.core().flags().contains(BodyFlags::COLLIDABLE))
        .collect();

    let proxies: Vec<Aabb> = collidable
        .iter()
        .map(|body| Aabb::from_sphere(body.state().position, body.core().radius()))
        .collect();
    broad_phase.update(&proxies);

    let overlapping: Vec<CollisionPair> = broad_phase
        .get_collision_pairs()
        .into_iter()
        .filter(|&(i, j)| {
            let (a, b) = (collidable[i], collidable[j]);
            let reach = a.core().radius() + b.core().radius();
            a.state().position.distance_squared(&b.state().position) < reach * reach
        })
        .map(|(i, j)| CollisionPair::new(collidable[i].id().clone(), collidable[j].id().clone()))
        .collect();

    let by_id: HashMap<&str, &CelestialBody> = collidable
        .iter()
        .map(|body| (body.id().as_str(), *body))
        .collect();

    for (pair, event_type) in tracker.update(overlapping) {
        let found = by_id.get(pair.body_a.as_str());
        let other = by_id.get(pair.body_b.as_str());
        let (a, b) = match (found, other) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };

        let (pa, pb) = (a.state().position, b.state().position);
        let (ra, rb) = (a.core().radius(), b.core().radius());
        let point = pa + (pb - pa) * (ra / (ra + rb));

        events.add_collision_event(CollisionEvent {
            event_type,
            body_a: pair.body_a,
            body_b: pair.body_b,
            point,
            relative_velocity: b.state().velocity - a.state().velocity,
            timestamp,
        });
    }
}
