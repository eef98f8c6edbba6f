pub mod broad_phase;
mod collision_pair;

pub use self::broad_phase::{BroadPhase, BruteForceBroadPhase, SweepAndPrune};
pub use self::collision_pair::{CollisionPair, CollisionTracker};
