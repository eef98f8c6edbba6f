use std::collections::HashMap;
use crate::bodies::{BodyId, CelestialBody};
use crate::error::PhysicsError;
use crate::Result;

/// Owns every registered body
///
/// Bodies are kept in insertion order, which is the order every tick visits
/// them in; the id index only accelerates lookups. Removing a body preserves
/// the relative order of the rest.
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: Vec<CelestialBody>,
    index: HashMap<BodyId, usize>,
}

impl BodyRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body, refusing a duplicate id without touching the registry
    pub fn insert(&mut self, body: CelestialBody) -> Result<&BodyId> {
        if self.index.contains_key(body.id().as_str()) {
            return Err(PhysicsError::DuplicateBody(body.id().clone()));
        }

        let slot = self.bodies.len();
        self.index.insert(body.id().clone(), slot);
        self.bodies.push(body);
        Ok(self.bodies[slot].id())
    }

    /// Removes a body by id
    pub fn remove(&mut self, id: &str) -> Option<CelestialBody> {
        let slot = self.index.remove(id)?;
        let body = self.bodies.remove(slot);

        for later in &self.bodies[slot..] {
            if let Some(entry) = self.index.get_mut(later.id().as_str()) {
                *entry -= 1;
            }
        }

        Some(body)
    }

    /// Gets a body by id
    pub fn get(&self, id: &str) -> Option<&CelestialBody> {
        self.index.get(id).map(|&slot| &self.bodies[slot])
    }

    /// Gets a mutable reference to a body by id
    pub fn get_mut(&mut self, id: &str) -> Option<&mut CelestialBody> {
        match self.index.get(id) {
            Some(&slot) => Some(&mut self.bodies[slot]),
            None => None,
        }
    }

    /// Gets a body by id, returning an error if not found
    pub fn get_body(&self, id: &str) -> Result<&CelestialBody> {
        self.get(id)
            .ok_or_else(|| PhysicsError::BodyNotFound(BodyId::new(id)))
    }

    /// Gets a mutable reference to a body by id, returning an error if not found
    pub fn get_body_mut(&mut self, id: &str) -> Result<&mut CelestialBody> {
        self.get_mut(id)
            .ok_or_else(|| PhysicsError::BodyNotFound(BodyId::new(id)))
    }

    /// Position of a body in iteration order
    pub fn slot_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the number of bodies in the registry
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Clears all bodies from the registry
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.index.clear();
    }

    /// All bodies in insertion order
    pub fn as_slice(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [CelestialBody] {
        &mut self.bodies
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CelestialBody> {
        self.bodies.iter_mut()
    }

    /// Massive bodies in insertion order
    pub fn massive(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(|body| body.core().is_massive())
    }

    /// Passive bodies in insertion order
    pub fn passive(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(|body| !body.core().is_massive())
    }
}
