//! Sphere-of-influence tracking and close-encounter detection.

use crate::bodies::BodyId;
use crate::core::events::SoiTransitionEvent;
use crate::math::Vector3;
use std::collections::BTreeMap;

/// Laplace sphere of influence `a · (m / M)^(2/5)`
///
/// Returns zero for non-positive inputs.
pub fn laplace_soi(semi_major_axis: f64, mass: f64, primary_mass: f64) -> f64 {
    if primary_mass <= 0.0 || mass <= 0.0 || semi_major_axis <= 0.0 {
        return 0.0;
    }
    semi_major_axis * (mass / primary_mass).powf(0.4)
}

/// Hill sphere radius `a · (m / 3M)^(1/3)`
///
/// Returns zero for non-positive inputs.
pub fn hill_radius(semi_major_axis: f64, mass: f64, primary_mass: f64) -> f64 {
    if primary_mass <= 0.0 || mass <= 0.0 || semi_major_axis <= 0.0 {
        return 0.0;
    }
    semi_major_axis * (mass / (3.0 * primary_mass)).cbrt()
}

/// A massive body as seen by the SOI tracker
#[derive(Debug, Clone, Copy)]
pub struct InfluenceSource<'a> {
    pub id: &'a BodyId,
    pub position: Vector3,
    pub mass: f64,
    pub radius: f64,

    /// `None` means unbounded
    pub soi_radius: Option<f64>,
}

/// Index of the source with the highest `mass / distance²` among those whose
/// SOI contains `position`
///
/// A position exactly at a source's center belongs to that source. Ties keep
/// the earlier source.
pub fn dominant_source(position: &Vector3, sources: &[InfluenceSource]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, source) in sources.iter().enumerate() {
        let distance_sq = position.distance_squared(&source.position);
        if let Some(soi) = source.soi_radius {
            if distance_sq >= soi * soi {
                continue;
            }
        }

        let influence = if distance_sq > 0.0 {
            source.mass / distance_sq
        } else {
            f64::INFINITY
        };

        match best {
            Some((_, strongest)) if influence <= strongest => {}
            _ => best = Some((index, influence)),
        }
    }

    best.map(|(index, _)| index)
}

/// Whether `position` is within `factor` radii of any source except `exclude`
pub fn in_close_encounter(
    position: &Vector3,
    sources: &[InfluenceSource],
    factor: f64,
    exclude: Option<usize>,
) -> bool {
    sources.iter().enumerate().any(|(index, source)| {
        if Some(index) == exclude {
            return false;
        }
        let threshold = factor * source.radius;
        position.distance_squared(&source.position) < threshold * threshold
    })
}

/// Current dominant massive body of every tracked passive body
#[derive(Debug, Clone, Default)]
pub struct SoiTracker {
    assignments: BTreeMap<BodyId, BodyId>,
}

impl SoiTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dominant body of `body`, if it is inside any SOI
    pub fn assignment(&self, body: &str) -> Option<&BodyId> {
        self.assignments.get(body)
    }

    /// All current assignments, ordered by passive body id
    pub fn assignments(&self) -> impl Iterator<Item = (&BodyId, &BodyId)> {
        self.assignments.iter()
    }

    /// Recomputes assignments for `passives` and returns the transitions
    ///
    /// Events come out in the order of `passives`.
    pub fn update<'a, I>(
        &mut self,
        passives: I,
        sources: &[InfluenceSource],
        timestamp: f64,
        tick: u64,
    ) -> Vec<SoiTransitionEvent>
    where
        I: IntoIterator<Item = (&'a BodyId, Vector3)>,
    {
        let mut transitions = Vec::new();

        for (body, position) in passives {
            let to = dominant_source(&position, sources).map(|index| sources[index].id);
            let from = self.assignments.get(body);

            if from == to {
                continue;
            }

            let from = from.cloned();
            let to = to.cloned();
            match &to {
                Some(dominant) => {
                    self.assignments.insert(body.clone(), dominant.clone());
                }
                None => {
                    self.assignments.remove(body);
                }
            }

            transitions.push(SoiTransitionEvent {
                body: body.clone(),
                from,
                to,
                timestamp,
                tick,
            });
        }

        transitions
    }

    /// Drops the assignment of a passive body that left the registry
    pub fn forget_passive(&mut self, body: &str) {
        self.assignments.remove(body);
    }

    /// Clears every assignment that points at a removed massive body
    pub fn forget_massive(&mut self, body: &str) {
        self.assignments.retain(|_, dominant| dominant.as_str() != body);
    }

    /// Replaces every assignment, used when restoring a checkpoint
    pub fn restore<I>(&mut self, assignments: I)
    where
        I: IntoIterator<Item = (BodyId, BodyId)>,
    {
        self.assignments = assignments.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.assignments.clear();
    }
}
