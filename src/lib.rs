pub mod math;
pub mod constants;
pub mod core;
pub mod bodies;
pub mod collision;
pub mod forces;
pub mod integration;
pub mod orbits;
pub mod presets;

/// Re-export common types for easier usage
pub use crate::core::{NBodyWorld, SimulationConfig, EngineState};
pub use crate::bodies::{BodyId, BodyCore, BodyState, BodyType, BodyClass, CelestialBody};
pub use crate::forces::GravityAlgorithm;
pub use crate::integration::IntegratorKind;
pub use crate::math::Vector3;

/// Error types for the simulation engine
pub mod error {
    use crate::bodies::BodyId;
    use crate::math::Vector3;
    use std::fmt;
    use thiserror::Error;

    /// The component of a body's state that failed a finiteness check
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StateField {
        Position,
        Velocity,
    }

    impl fmt::Display for StateField {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                Self::Position => f.write_str("position"),
                Self::Velocity => f.write_str("velocity"),
            }
        }
    }

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Body `{0}` is already registered")]
        DuplicateBody(BodyId),

        #[error("Body not found: {0}")]
        BodyNotFound(BodyId),

        #[error("Unknown integrator: {0}")]
        UnknownIntegrator(String),

        #[error("Unknown gravity algorithm: {0}")]
        UnknownGravityAlgorithm(String),

        #[error("Numerical divergence in {field} of body `{body}` at tick {tick}: {value}")]
        NumericalDivergence {
            body: BodyId,
            field: StateField,
            value: Vector3,
            tick: u64,
        },

        #[cfg(feature = "serialize")]
        #[error("Serialization error: {0}")]
        Serialization(String),
    }

    impl PhysicsError {
        /// Whether this error is a caller mistake rejected before any mutation
        pub fn is_configuration_error(&self) -> bool {
            !matches!(self, Self::NumericalDivergence { .. })
        }
    }

    #[cfg(feature = "serialize")]
    impl From<serde_json::Error> for PhysicsError {
        fn from(err: serde_json::Error) -> Self {
            Self::Serialization(err.to_string())
        }
    }
}

/// Result type for simulation engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
