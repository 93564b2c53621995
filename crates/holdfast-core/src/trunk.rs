//! Trunk geometry: ingestion, normalization, and cached spatial queries.
//!
//! A [`Trunk`] owns the immutable cargo-space mesh for one packing run.
//! Loading normalizes the raw scan into the engine's frame (meters,
//! centered, floor near z = 0) and repairs open boundary rings where
//! possible. Voxelizations are built lazily and cached per pitch, since
//! the refinement phases probe the same grid thousands of times.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;
use std::sync::{Arc, Mutex, PoisonError};

use glam::DVec3;
use hull::{Bounds, MeshError, TriMesh, VoxelGrid};
use tracing::debug;

use crate::error::PackError;

/// Margin kept between the trunk walls and any placement, in meters.
pub const WALL_MARGIN: f64 = 0.01;

/// Meshes wider than this are assumed to be in millimeters and rescaled.
const MM_THRESHOLD: f64 = 10.0;

/// The cargo space bags are packed into.
#[derive(Debug)]
pub struct Trunk {
    mesh: TriMesh,
    bounds: Bounds,
    watertight: bool,
    voxel_cache: Mutex<BTreeMap<u64, Arc<VoxelGrid>>>,
}

impl Trunk {
    /// Adopts an already-normalized mesh as the trunk.
    ///
    /// No rescaling or reorientation happens here; use
    /// [`Trunk::from_stl_bytes`] for raw scans.
    #[must_use]
    pub fn new(mesh: TriMesh) -> Self {
        let bounds = mesh.bounds();
        let watertight = mesh.is_watertight();
        debug!(
            vertices = mesh.vertices.len(),
            faces = mesh.face_count(),
            watertight,
            "trunk ready"
        );
        Self {
            mesh,
            bounds,
            watertight,
            voxel_cache: Mutex::new(BTreeMap::new()),
        }
    }

    /// Loads a trunk from STL bytes and normalizes it into the engine frame.
    ///
    /// Normalization steps, in order:
    /// 1. If the largest extent exceeds 10, treat the scan as millimeters
    ///    and scale by 0.001.
    /// 2. Translate the surface centroid to the origin.
    /// 3. Lift the mesh so its lowest point sits at z = 0.
    /// 4. Rotate a quarter turn about the x axis, matching the scanner's
    ///    mounting orientation.
    /// 5. If the result is not watertight, close open boundary rings.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid STL mesh.
    pub fn from_stl_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        let mut mesh = hull::read_stl_bytes(bytes)?;

        if mesh.extents().max_element() > MM_THRESHOLD {
            mesh.scale(0.001);
        }
        let centroid = mesh.centroid();
        mesh.translate(-centroid);
        let lift = mesh.bounds().min.z;
        mesh.translate(DVec3::new(0.0, 0.0, -lift));
        mesh.rotate(DVec3::X, FRAC_PI_2);

        if !mesh.is_watertight() {
            let closed = mesh.fill_holes();
            debug!(closed, "repaired open boundary rings");
        }

        Ok(Self::new(mesh))
    }

    /// The trunk mesh in the engine frame.
    #[must_use]
    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    /// Axis-aligned bounds of the trunk mesh.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// True if every edge of the mesh is shared by exactly two faces.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.watertight
    }

    /// The placement envelope: trunk bounds shrunk by [`WALL_MARGIN`].
    #[must_use]
    pub fn usable_bounds(&self) -> Bounds {
        self.bounds.shrink(WALL_MARGIN)
    }

    /// Interior volume estimate used for utilization metrics.
    ///
    /// Watertight trunks report their exact mesh volume. Open meshes fall
    /// back to the convex hull of their vertices, and degenerate geometry
    /// falls back to the bounding-box volume.
    #[must_use]
    pub fn capacity_volume(&self) -> f64 {
        if self.watertight {
            let volume = self.mesh.volume();
            if volume > 0.0 {
                return volume;
            }
        }
        let hull_volume = hull::convex_hull_volume(&self.mesh.vertices);
        if hull_volume > 0.0 {
            return hull_volume;
        }
        self.bounds.volume()
    }

    /// Voxelization of the trunk interior at `pitch`, cached per pitch.
    ///
    /// # Errors
    ///
    /// Returns an error if the pitch is not finite and positive, or if the
    /// mesh cannot be rasterized.
    pub fn voxel_grid(&self, pitch: f64) -> Result<Arc<VoxelGrid>, MeshError> {
        let key = pitch.to_bits();
        let mut cache = self
            .voxel_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(grid) = cache.get(&key) {
            return Ok(Arc::clone(grid));
        }
        let grid = Arc::new(VoxelGrid::rasterize(&self.mesh, pitch)?);
        cache.insert(key, Arc::clone(&grid));
        Ok(grid)
    }
}

// =============================================================================
// Tests
// =============================================================================
