pub mod elements;
pub mod soi;

pub use self::elements::{
    circular_velocity, eccentricity, eccentricity_vector, escape_velocity, orbital_period,
    semi_major_axis, specific_orbital_energy, OrbitalElements,
};
pub use self::soi::{
    dominant_source, hill_radius, in_close_encounter, laplace_soi, InfluenceSource, SoiTracker,
};
