mod body_type;
mod celestial_body;

pub use self::body_type::{BodyType, BodyClass};
pub use self::celestial_body::{BodyCore, BodyState, CelestialBody};
pub(crate) use self::celestial_body::IntegrationHistory;

use std::borrow::Borrow;
use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Caller-chosen unique identifier of a body
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(transparent))]
pub struct BodyId(String);

impl BodyId {
    /// Creates an id from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for BodyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BodyId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for BodyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for BodyId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BodyId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    #[cfg(feature = "serialize")]
    use serde::{Serialize, Deserialize};

    bitflags! {
        /// Per-body participation switches
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
        pub struct BodyFlags: u32 {
            /// Body takes part in sphere-overlap collision detection
            const COLLIDABLE = 0x01;

            /// Passive body is assigned a dominant body by the SOI tracker
            const TRACK_SOI = 0x02;
        }
    }

    impl Default for BodyFlags {
        fn default() -> Self {
            Self::COLLIDABLE | Self::TRACK_SOI
        }
    }
}

pub use self::body_flags::BodyFlags;
