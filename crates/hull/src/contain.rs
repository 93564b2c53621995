//! Point-in-mesh queries by ray parity.
//!
//! A point is inside a closed mesh iff a ray from it crosses the surface an
//! odd number of times. Crossing distances are deduplicated before counting
//! so rays grazing a shared edge do not double-count.

use glam::DVec3;
use rayon::prelude::*;

use crate::mesh::{MeshError, TriMesh};

/// Ray direction for parity counting, skew to all three axes so rays through
/// axis-aligned geometry rarely run along a face or edge. `(1, 2, 3)`
/// normalized.
const PARITY_DIR: DVec3 = DVec3::new(
    0.267_261_241_912_424_4,
    0.534_522_483_824_848_8,
    0.801_783_725_737_273_2,
);

/// Möller–Trumbore ray/triangle intersection distance.
fn ray_triangle(origin: DVec3, dir: DVec3, a: DVec3, b: DVec3, c: DVec3) -> Option<f64> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = dir.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() <= 1e-9 {
        // Ray parallel to the triangle plane.
        return None;
    }
    let inv_det = 1.0 / det;
    let to_origin = origin - a;
    let u = to_origin.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = to_origin.cross(edge1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t > 1e-6).then_some(t)
}

/// Test a single point against a closed mesh.
///
/// Points on the surface give an unspecified result.
#[must_use]
pub fn contains_point(mesh: &TriMesh, point: DVec3) -> bool {
    let mut hits: Vec<f64> = Vec::new();
    for face in 0..mesh.faces.len() {
        let [a, b, c] = mesh.triangle(face);
        if let Some(t) = ray_triangle(point, PARITY_DIR, a, b, c) {
            hits.push(t);
        }
    }
    hits.sort_unstable_by(f64::total_cmp);
    hits.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    hits.len() % 2 == 1
}

/// Batch point-in-mesh query.
///
/// Results index 1:1 with `points`; evaluation is parallel but the output
/// order is the input order.
///
/// # Errors
///
/// [`MeshError::EmptyMesh`] if the mesh has no faces.
pub fn contains_points(mesh: &TriMesh, points: &[DVec3]) -> Result<Vec<bool>, MeshError> {
    if mesh.faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    Ok(points
        .par_iter()
        .map(|&point| contains_point(mesh, point))
        .collect())
}
