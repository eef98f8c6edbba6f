pub mod world;
pub mod config;
pub mod storage;
pub mod events;
mod scheduler;
mod floating_origin;
pub mod diagnostics;
pub mod checkpoint;
pub mod detect_collisions;

pub use self::world::{NBodyWorld, EngineState, TickObserver};
pub use self::config::SimulationConfig;
pub use self::storage::BodyRegistry;
pub use self::events::{
    BodyCounts, CollisionEvent, CollisionEventType, EventQueue, SoiTransitionEvent, TickTelemetry,
};
pub use self::scheduler::{FixedStepClock, FramePlan};
pub use self::floating_origin::FloatingOrigin;
pub use self::diagnostics::{EnergyMonitor, EnergyReport};
pub use self::checkpoint::{BodyRecord, BodySnapshot, Checkpoint, Snapshot};
