use crate::math::Vector3;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Axis-aligned bounding box.
///
/// Used as the cell shape of the Barnes-Hut octree and as the swept extent of
/// a body in the collision broad phase.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner of the AABB
    pub min: Vector3,

    /// Maximum corner of the AABB
    pub max: Vector3,
}

impl Aabb {
    /// Creates a new AABB from minimum and maximum points
    #[inline]
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// Creates an AABB centered at a position with the given half extents
    #[inline]
    pub fn from_center_half_extents(center: Vector3, half_extents: Vector3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Creates the box of a sphere
    #[inline]
    pub fn from_sphere(center: Vector3, radius: f64) -> Self {
        Self::from_center_half_extents(center, Vector3::splat(radius))
    }

    /// Creates an AABB from a set of points
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;

        Some(points.fold(Self::new(first, first), |mut bounds, point| {
            bounds.expand_to_include_point(point);
            bounds
        }))
    }

    /// Returns the center of the AABB
    #[inline]
    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the extents of the AABB in each dimension
    #[inline]
    pub fn extents(&self) -> Vector3 {
        self.max - self.min
    }

    /// Returns half the extents of the AABB in each dimension
    #[inline]
    pub fn half_extents(&self) -> Vector3 {
        self.extents() * 0.5
    }

    /// Checks if this AABB contains a point (boundary inclusive)
    #[inline]
    pub fn contains_point(&self, point: Vector3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Checks if this AABB intersects with another AABB
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Expands this AABB to include a point
    #[inline]
    pub fn expand_to_include_point(&mut self, point: Vector3) {
        self.min = self.min.min(&point);
        self.max = self.max.max(&point);
    }

    /// Smallest cube sharing this box's center that contains the box.
    ///
    /// Degenerate boxes (all points coincident) get a unit half-width so that
    /// octant subdivision stays well defined.
    pub fn bounding_cube(&self) -> Self {
        let center = self.center();
        let mut half = self.half_extents().max_element();
        if !(half > 0.0) {
            half = 1.0;
        }
        Self::from_center_half_extents(center, Vector3::splat(half))
    }

    /// Octant index (0..8) of `point` relative to the box center.
    ///
    /// Bit 0 is +x, bit 1 is +y, bit 2 is +z.
    #[inline]
    pub fn octant_of(&self, point: &Vector3) -> usize {
        let center = self.center();
        let mut octant = 0;
        if point.x >= center.x { octant |= 1; }
        if point.y >= center.y { octant |= 2; }
        if point.z >= center.z { octant |= 4; }
        octant
    }

    /// The child box for an octant index produced by [`Aabb::octant_of`].
    pub fn octant(&self, octant: usize) -> Self {
        let center = self.center();
        let mut min = self.min;
        let mut max = self.max;

        if octant & 1 == 0 { max.x = center.x } else { min.x = center.x }
        if octant & 2 == 0 { max.y = center.y } else { min.y = center.y }
        if octant & 4 == 0 { max.z = center.z } else { min.z = center.z }

        Self { min, max }
    }
}
