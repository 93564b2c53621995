//! Candidate-in-trunk acceptance tests.
//!
//! Every placement phase funnels through [`fits`], which layers three
//! checks from cheapest to most expensive:
//!
//! 1. AABB prefilter against the trunk bounds shrunk by [`FIT_TOL`].
//! 2. Exact ray-parity tests of the candidate's eight corners, when the
//!    trunk is watertight. The verdict is final.
//! 3. Voxel lookups at [`VOXEL_PITCH`] for open meshes, or when the exact
//!    kernel cannot run. A voxelization failure accepts the candidate, so
//!    a malformed scan degrades the fit quality instead of aborting the
//!    run.

use hull::Bounds;
use tracing::debug;

use crate::trunk::Trunk;

/// Tolerance for wall contact, in meters.
pub const FIT_TOL: f64 = 0.005;

/// Pitch of the fallback voxelization, in meters.
pub const VOXEL_PITCH: f64 = 0.01;

/// True if `candidate` sits fully inside the trunk.
#[must_use]
pub fn fits(trunk: &Trunk, candidate: &Bounds) -> bool {
    if !trunk.bounds().shrink(FIT_TOL).contains_bounds(candidate) {
        return false;
    }

    let corners = candidate.corners();
    if trunk.is_watertight() {
        if let Ok(inside) = hull::contains_points(trunk.mesh(), &corners) {
            return inside.into_iter().all(|hit| hit);
        }
        debug!("exact containment unavailable, trying voxels");
    }

    match trunk.voxel_grid(VOXEL_PITCH) {
        Ok(grid) => corners.into_iter().all(|corner| grid.is_filled(corner)),
        Err(error) => {
            debug!(%error, "voxel containment unavailable, accepting candidate");
            true
        }
    }
}

/// Translates `bounds` so it lies within `target`, keeping [`FIT_TOL`]
/// clearance from each face it had to be pushed off.
///
/// Boxes already inside are returned untouched. Boxes larger than the
/// target end up pressed against the low faces.
#[must_use]
pub fn clamp_into(bounds: &Bounds, target: &Bounds) -> Bounds {
    let inward = (target.min + FIT_TOL - bounds.min).max(glam::DVec3::ZERO);
    let outward = (bounds.max - (target.max - FIT_TOL)).max(glam::DVec3::ZERO);
    let offset = inward - outward;

    if offset == glam::DVec3::ZERO {
        *bounds
    } else {
        let mut clamped = *bounds;
        clamped.translate(offset);
        clamped
    }
}

// =============================================================================
// Tests
// =============================================================================
