#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Role of a body in the gravity field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum BodyType {
    /// Source and sink of gravity
    Massive,

    /// Sink only: feels the field of massive bodies but never contributes to it
    Passive,
}

/// Classification tag carried for consumers; has no effect on the physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum BodyClass {
    Star,
    Planet,
    Moon,
    Spacecraft,
    Debris,
}
