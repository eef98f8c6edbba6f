use crate::bodies::BodyId;
use crate::math::Vector3;

/// Tracks the offset consumers subtract from stored positions
///
/// Stored body positions are never rewritten; only the offset moves. With an
/// anchor body the offset follows that body every tick. Without one it jumps
/// to the most massive body whenever that body is farther than `threshold`
/// from the current offset.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingOrigin {
    offset: Vector3,
    anchor: Option<BodyId>,
    threshold: f64,
    rebase_count: u64,
}

impl FloatingOrigin {
    pub fn new(threshold: f64) -> Self {
        Self {
            offset: Vector3::ZERO,
            anchor: None,
            threshold,
            rebase_count: 0,
        }
    }

    pub fn offset(&self) -> Vector3 {
        self.offset
    }

    pub fn anchor(&self) -> Option<&BodyId> {
        self.anchor.as_ref()
    }

    /// Number of automatic re-bases so far
    pub fn rebase_count(&self) -> u64 {
        self.rebase_count
    }

    pub fn set_anchor(&mut self, anchor: Option<BodyId>) {
        self.anchor = anchor;
    }

    pub(crate) fn restore(&mut self, offset: Vector3, anchor: Option<BodyId>) {
        self.offset = offset;
        self.anchor = anchor;
    }

    /// Converts a stored position into the current origin frame
    pub fn to_frame(&self, position: Vector3) -> Vector3 {
        position - self.offset
    }

    /// Moves the offset onto the anchor's position
    pub fn track(&mut self, anchor_position: Vector3) {
        self.offset = anchor_position;
    }

    /// Re-bases onto `heaviest` when it has drifted past the threshold
    ///
    /// Returns whether the offset moved.
    pub fn recenter(&mut self, heaviest: Vector3) -> bool {
        if heaviest.distance_squared(&self.offset) > self.threshold * self.threshold {
            self.offset = heaviest;
            self.rebase_count += 1;
            return true;
        }
        false
    }
}
