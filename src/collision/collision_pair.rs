use crate::bodies::BodyId;
use crate::core::events::CollisionEventType;
use std::collections::BTreeSet;

/// A pair of bodies that overlap
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// The first body in the collision pair
    pub body_a: BodyId,

    /// The second body in the collision pair
    pub body_b: BodyId,
}

impl CollisionPair {
    /// Creates a new collision pair
    pub fn new(body_a: BodyId, body_b: BodyId) -> Self {
        // Always sort the ids to ensure consistent ordering
        if body_a <= body_b {
            Self { body_a, body_b }
        } else {
            Self { body_a: body_b, body_b: body_a }
        }
    }

    /// Checks if this collision pair contains the specified body
    pub fn contains(&self, body: &str) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// Returns the other body in the pair
    pub fn other(&self, body: &str) -> Option<&BodyId> {
        if self.body_a == body {
            Some(&self.body_b)
        } else if self.body_b == body {
            Some(&self.body_a)
        } else {
            None
        }
    }
}

/// Remembers which pairs overlapped on the previous tick
#[derive(Debug, Clone, Default)]
pub struct CollisionTracker {
    active: BTreeSet<CollisionPair>,
}

impl CollisionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the overlapping set and classifies each current pair
    pub fn update(&mut self, current: Vec<CollisionPair>) -> Vec<(CollisionPair, CollisionEventType)> {
        let classified = current
            .iter()
            .map(|pair| {
                let event_type = if self.active.contains(pair) {
                    CollisionEventType::Persist
                } else {
                    CollisionEventType::Begin
                };
                (pair.clone(), event_type)
            })
            .collect();

        self.active = current.into_iter().collect();
        classified
    }

    /// Whether the pair overlapped on the last tick
    pub fn is_active(&self, pair: &CollisionPair) -> bool {
        self.active.contains(pair)
    }

    /// Forgets every pair involving a removed body
    pub fn forget(&mut self, body: &str) {
        self.active.retain(|pair| !pair.contains(body));
    }

    /// Pairs that overlapped on the last tick, in id order
    pub fn active_pairs(&self) -> impl Iterator<Item = &CollisionPair> {
        self.active.iter()
    }

    /// Replaces the overlapping set, used when restoring a checkpoint
    pub fn restore<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = CollisionPair>,
    {
        self.active = pairs.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
