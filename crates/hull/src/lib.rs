//! # Hull
//!
//! Triangle-mesh geometry kernel for fit and packing problems.
//!
//! Hull stores meshes as indexed triangle soups and answers the geometric
//! questions a packing engine asks of a container:
//!
//! - **STL round-trip**: parse meshes from STL bytes, write scenes back out
//! - **Measurements**: bounds, volume, centroid, watertightness
//! - **Containment**: batch point-in-mesh tests by ray parity
//! - **Voxelization**: interior rasterization for meshes too messy to test exactly
//! - **Convex hulls**: volume estimates for open meshes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hull::{Bounds, TriMesh};
//!
//! let mut trunk = hull::read_stl_bytes(&bytes)?;
//! trunk.translate(-trunk.centroid());
//!
//! let corners = Bounds::from_min_max(p, p + extents).corners();
//! let inside = hull::contains_points(&trunk, &corners)?;
//! ```
//!
//! All coordinates are `f64`. Query results are bit-deterministic for a given
//! mesh, including the internally parallel batch queries.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod contain;
pub mod convex;
pub mod mesh;
pub mod stl;
pub mod voxel;

// Re-exports for convenience
pub use contain::{contains_point, contains_points};
pub use convex::convex_hull_volume;
pub use mesh::{MeshError, TriMesh};
pub use stl::{read_stl_bytes, write_stl_bytes};
pub use voxel::VoxelGrid;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: glam::DVec3,
    /// Maximum corner
    pub max: glam::DVec3,
}

impl Bounds {
    /// Create bounds from dimensions (centered at origin).
    #[must_use]
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            min: glam::DVec3::new(-width / 2.0, -height / 2.0, -depth / 2.0),
            max: glam::DVec3::new(width / 2.0, height / 2.0, depth / 2.0),
        }
    }

    /// Create bounds from min/max corners.
    #[must_use]
    pub fn from_min_max(min: glam::DVec3, max: glam::DVec3) -> Self {
        Self { min, max }
    }

    /// Get the center of the bounds.
    #[must_use]
    pub fn center(&self) -> glam::DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the bounds.
    #[must_use]
    pub fn size(&self) -> glam::DVec3 {
        self.max - self.min
    }

    /// Get the enclosed volume.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Get all 8 corners, minimum corner first.
    #[must_use]
    pub fn corners(&self) -> [glam::DVec3; 8] {
        [
            glam::DVec3::new(self.min.x, self.min.y, self.min.z),
            glam::DVec3::new(self.max.x, self.min.y, self.min.z),
            glam::DVec3::new(self.min.x, self.max.y, self.min.z),
            glam::DVec3::new(self.max.x, self.max.y, self.min.z),
            glam::DVec3::new(self.min.x, self.min.y, self.max.z),
            glam::DVec3::new(self.max.x, self.min.y, self.max.z),
            glam::DVec3::new(self.min.x, self.max.y, self.max.z),
            glam::DVec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Check if a point is inside the bounds (inclusive).
    #[must_use]
    pub fn contains(&self, point: glam::DVec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if another bounds lies entirely inside this one (inclusive).
    #[must_use]
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.min.z >= self.min.z
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
            && other.max.z <= self.max.z
    }

    /// Check if two bounds overlap with positive volume.
    ///
    /// Touching faces do not count as overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Shrink the bounds inward by a margin on every face.
    ///
    /// A margin larger than half the size inverts the bounds; callers are
    /// expected to keep margins small relative to the box.
    #[must_use]
    pub fn shrink(&self, margin: f64) -> Self {
        Self {
            min: self.min + glam::DVec3::splat(margin),
            max: self.max - glam::DVec3::splat(margin),
        }
    }

    /// Smallest bounds enclosing both.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Move the bounds by an offset.
    pub fn translate(&mut self, offset: glam::DVec3) {
        self.min += offset;
        self.max += offset;
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new(10.0, 10.0, 10.0);
        assert!(bounds.contains(DVec3::ZERO));
        assert!(bounds.contains(DVec3::new(5.0, 5.0, 5.0)));
        assert!(!bounds.contains(DVec3::new(5.1, 0.0, 0.0)));
    }

    #[test]
    fn test_bounds_overlaps_is_strict() {
        let a = Bounds::from_min_max(DVec3::ZERO, DVec3::splat(1.0));
        let b = Bounds::from_min_max(DVec3::new(1.0, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        let c = Bounds::from_min_max(DVec3::splat(0.5), DVec3::splat(1.5));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_bounds_contains_bounds() {
        let outer = Bounds::from_min_max(DVec3::ZERO, DVec3::splat(10.0));
        let inner = Bounds::from_min_max(DVec3::splat(1.0), DVec3::splat(9.0));
        let edge = Bounds::from_min_max(DVec3::ZERO, DVec3::splat(10.0));
        let outside = Bounds::from_min_max(DVec3::splat(5.0), DVec3::splat(11.0));
        assert!(outer.contains_bounds(&inner));
        assert!(outer.contains_bounds(&edge));
        assert!(!outer.contains_bounds(&outside));
    }

    #[test]
    fn test_bounds_shrink_and_union() {
        let bounds = Bounds::from_min_max(DVec3::ZERO, DVec3::splat(10.0));
        let shrunk = bounds.shrink(1.0);
        assert_eq!(shrunk.min, DVec3::splat(1.0));
        assert_eq!(shrunk.max, DVec3::splat(9.0));

        let other = Bounds::from_min_max(DVec3::splat(-5.0), DVec3::splat(5.0));
        let union = bounds.union(&other);
        assert_eq!(union.min, DVec3::splat(-5.0));
        assert_eq!(union.max, DVec3::splat(10.0));
    }

    #[test]
    fn test_bounds_corners_and_volume() {
        let bounds = Bounds::from_min_max(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0));
        assert!((bounds.volume() - 6.0).abs() < 1e-12);
        let corners = bounds.corners();
        assert_eq!(corners[0], DVec3::ZERO);
        assert_eq!(corners[7], DVec3::new(1.0, 2.0, 3.0));
        assert!(corners.iter().all(|&c| bounds.contains(c)));
    }

    #[test]
    fn test_bounds_translate() {
        let mut bounds = Bounds::from_min_max(DVec3::ZERO, DVec3::splat(1.0));
        bounds.translate(DVec3::new(2.0, 0.0, -1.0));
        assert_eq!(bounds.min, DVec3::new(2.0, 0.0, -1.0));
        assert_eq!(bounds.max, DVec3::new(3.0, 1.0, 0.0));
    }
}
