mod gravity;
mod barnes_hut;

pub use self::gravity::{
    softened_acceleration, DirectGravity, FieldSource, GravityAlgorithm, GravityCalculator,
};
pub use self::barnes_hut::BarnesHutGravity;

/// Builds the gravity calculator for `algorithm`
pub fn create_gravity(
    algorithm: GravityAlgorithm,
    theta: f64,
    max_depth: u32,
) -> Box<dyn GravityCalculator> {
    match algorithm {
        GravityAlgorithm::Direct => Box::new(DirectGravity::new()),
        GravityAlgorithm::BarnesHut => Box::new(BarnesHutGravity::new(theta, max_depth)),
    }
}
