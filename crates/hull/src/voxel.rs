//! Interior voxelization by scanline parity.
//!
//! The mesh bounds are cut into cubic cells; each vertical column of cell
//! centers is classified in one pass by sorting the column's surface
//! crossings and counting parity. The result is a dense occupancy grid of
//! the enclosed volume, usable as a containment oracle when exact tests are
//! unavailable.

use glam::DVec3;
use rayon::prelude::*;
use tracing::debug;

use crate::mesh::{MeshError, TriMesh};

/// A dense boolean occupancy grid over a mesh's interior.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    origin: DVec3,
    pitch: f64,
    nx: usize,
    ny: usize,
    nz: usize,
    filled: Vec<bool>,
}

impl VoxelGrid {
    /// Rasterize the interior of a closed mesh at a cell pitch.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidPitch`] for a non-positive or non-finite pitch,
    /// [`MeshError::EmptyMesh`] when the mesh has no faces.
    pub fn rasterize(mesh: &TriMesh, pitch: f64) -> Result<Self, MeshError> {
        if !pitch.is_finite() || pitch <= 0.0 {
            return Err(MeshError::InvalidPitch(pitch));
        }
        if mesh.faces.is_empty() {
            return Err(MeshError::EmptyMesh);
        }

        let bounds = mesh.bounds();
        let size = bounds.size();
        let nx = cells_along(size.x, pitch);
        let ny = cells_along(size.y, pitch);
        let nz = cells_along(size.z, pitch);

        // One +z scan column per (i, j); cell (i, j, k) lands at
        // (i * ny + j) * nz + k so a column is contiguous.
        let columns: Vec<Vec<bool>> = (0..nx * ny)
            .into_par_iter()
            .map(|column| {
                let i = column / ny;
                let j = column % ny;
                // Nudge samples off exact cell boundaries so columns do not
                // run along axis-aligned edges.
                let x = bounds.min.x + (i as f64 + 0.5) * pitch + pitch * 1e-4;
                let y = bounds.min.y + (j as f64 + 0.5) * pitch + pitch * 1e-4;
                let hits = column_hits(mesh, x, y);
                (0..nz)
                    .map(|k| {
                        let z = bounds.min.z + (k as f64 + 0.5) * pitch;
                        let below = hits.iter().take_while(|&&h| h < z).count();
                        below % 2 == 1
                    })
                    .collect()
            })
            .collect();
        let filled: Vec<bool> = columns.into_iter().flatten().collect();

        let grid = Self {
            origin: bounds.min,
            pitch,
            nx,
            ny,
            nz,
            filled,
        };
        debug!(
            nx,
            ny,
            nz,
            filled = grid.filled_count(),
            "rasterized mesh interior"
        );
        Ok(grid)
    }

    /// Whether the cell containing `point` is filled.
    ///
    /// Points outside the grid are never filled.
    #[must_use]
    pub fn is_filled(&self, point: DVec3) -> bool {
        let rel = (point - self.origin) / self.pitch;
        if rel.x < 0.0 || rel.y < 0.0 || rel.z < 0.0 {
            return false;
        }
        let (i, j, k) = (
            rel.x.floor() as usize,
            rel.y.floor() as usize,
            rel.z.floor() as usize,
        );
        if i >= self.nx || j >= self.ny || k >= self.nz {
            return false;
        }
        self.filled[(i * self.ny + j) * self.nz + k]
    }

    /// Batch form of [`VoxelGrid::is_filled`], 1:1 with `points`.
    #[must_use]
    pub fn contains_points(&self, points: &[DVec3]) -> Vec<bool> {
        points.iter().map(|&point| self.is_filled(point)).collect()
    }

    /// Number of filled cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.filled.iter().filter(|&&f| f).count()
    }

    /// Cell pitch.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Grid dimensions in cells per axis.
    #[must_use]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }
}

fn cells_along(span: f64, pitch: f64) -> usize {
    ((span / pitch).ceil() as usize).max(1)
}

/// Sorted, deduplicated surface crossings of the vertical line through
/// `(x, y)`.
fn column_hits(mesh: &TriMesh, x: f64, y: f64) -> Vec<f64> {
    let mut hits = Vec::new();
    for face in 0..mesh.faces.len() {
        let [a, b, c] = mesh.triangle(face);
        if let Some(z) = column_triangle_hit(a, b, c, x, y) {
            hits.push(z);
        }
    }
    hits.sort_unstable_by(f64::total_cmp);
    hits.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    hits
}

/// Height where the vertical line through `(x, y)` pierces a triangle,
/// solved with barycentric coordinates in the projected plane.
fn column_triangle_hit(a: DVec3, b: DVec3, c: DVec3, x: f64, y: f64) -> Option<f64> {
    let d = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if d.abs() < 1e-15 {
        // Vertical or degenerate triangle.
        return None;
    }
    let u = ((x - a.x) * (c.y - a.y) - (y - a.y) * (c.x - a.x)) / d;
    let v = ((b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x)) / d;
    if u < 0.0 || v < 0.0 || u + v > 1.0 {
        return None;
    }
    Some(a.z + u * (b.z - a.z) + v * (c.z - a.z))
}
