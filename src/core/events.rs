use crate::bodies::BodyId;
use crate::core::diagnostics::EnergyReport;
use crate::math::Vector3;
use std::collections::VecDeque;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Types of collision events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum CollisionEventType {
    /// Bodies have just started overlapping
    Begin,

    /// Bodies are still overlapping
    Persist,
}

/// Two bodies whose spheres overlap
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct CollisionEvent {
    /// The type of collision event
    pub event_type: CollisionEventType,

    /// The first body in the collision
    pub body_a: BodyId,

    /// The second body in the collision
    pub body_b: BodyId,

    /// Point on the line between centers, split in proportion to the radii
    pub point: Vector3,

    /// Velocity of `body_b` relative to `body_a`
    pub relative_velocity: Vector3,

    /// Simulation time at the end of the tick that found the overlap
    pub timestamp: f64,
}

/// A passive body changed its dominant massive body
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SoiTransitionEvent {
    pub body: BodyId,

    /// Previous dominant body, `None` when outside every SOI
    pub from: Option<BodyId>,

    /// New dominant body, `None` when outside every SOI
    pub to: Option<BodyId>,

    pub timestamp: f64,
    pub tick: u64,
}

/// Registered bodies by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyCounts {
    pub massive: usize,
    pub passive: usize,
}

impl BodyCounts {
    pub fn total(&self) -> usize {
        self.massive + self.passive
    }
}

/// Aggregate state handed to the tick observer after every tick
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TickTelemetry {
    pub time: f64,
    pub tick: u64,
    pub body_counts: BodyCounts,

    /// Present when energy telemetry is enabled in the configuration
    pub energy: Option<EnergyReport>,
}

/// A queue of simulation events
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    /// Collision events
    collision_events: VecDeque<CollisionEvent>,

    /// SOI transition events
    soi_events: VecDeque<SoiTransitionEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collision event to the queue
    pub fn add_collision_event(&mut self, event: CollisionEvent) {
        self.collision_events.push_back(event);
    }

    /// Adds an SOI transition event to the queue
    pub fn add_soi_event(&mut self, event: SoiTransitionEvent) {
        self.soi_events.push_back(event);
    }

    /// Gets the next collision event from the queue
    pub fn next_collision_event(&mut self) -> Option<CollisionEvent> {
        self.collision_events.pop_front()
    }

    /// Gets the next SOI transition event from the queue
    pub fn next_soi_event(&mut self) -> Option<SoiTransitionEvent> {
        self.soi_events.pop_front()
    }

    /// Returns whether there are any collision events in the queue
    pub fn has_collision_events(&self) -> bool {
        !self.collision_events.is_empty()
    }

    /// Returns whether there are any SOI transition events in the queue
    pub fn has_soi_events(&self) -> bool {
        !self.soi_events.is_empty()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.collision_events.is_empty() && self.soi_events.is_empty()
    }

    /// Total number of queued events
    pub fn len(&self) -> usize {
        self.collision_events.len() + self.soi_events.len()
    }

    /// Clears all events from the queue
    pub fn clear(&mut self) {
        self.collision_events.clear();
        self.soi_events.clear();
    }

    /// Collision events in the order they were raised
    pub fn collision_events(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.collision_events.iter()
    }

    /// SOI transition events in the order they were raised
    pub fn soi_events(&self) -> impl Iterator<Item = &SoiTransitionEvent> {
        self.soi_events.iter()
    }

    /// Gets all collision events of a specific type
    pub fn get_collision_events_of_type(&self, event_type: CollisionEventType) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Gets all collision events involving a specific body
    pub fn get_collision_events_for_body(&self, body: &str) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.body_a == body || e.body_b == body)
            .collect()
    }

    /// Gets all SOI transitions of a specific body
    pub fn get_soi_events_for_body(&self, body: &str) -> Vec<&SoiTransitionEvent> {
        self.soi_events
            .iter()
            .filter(|e| e.body == body)
            .collect()
    }
}
