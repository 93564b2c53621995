//! Indexed triangle meshes and the measurements taken of them.
//!
//! A [`TriMesh`] is a deduplicated vertex table plus triangle index triples,
//! the shape an STL import naturally takes. Transforms mutate vertices in
//! place; derived quantities (bounds, volume, centroid) are computed on
//! demand.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use glam::{DQuat, DVec3};

use crate::Bounds;

/// Errors raised by mesh construction and queries.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// STL parsing or serialization failed.
    #[error("stl i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A face referenced a vertex index outside the vertex table.
    #[error("face {face} references missing vertex {index}")]
    FaceOutOfRange {
        /// Position of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
    },

    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// Voxel pitch must be positive and finite.
    #[error("invalid voxel pitch {0}")]
    InvalidPitch(f64),
}

/// An indexed triangle mesh.
#[derive(Debug, Clone)]
pub struct TriMesh {
    /// Vertex positions.
    pub vertices: Vec<DVec3>,
    /// Counter-clockwise vertex indices, one triple per triangle.
    pub faces: Vec<[u32; 3]>,
}

impl TriMesh {
    /// Create a mesh, validating that every face index resolves.
    ///
    /// # Errors
    ///
    /// [`MeshError::EmptyMesh`] if there are no faces,
    /// [`MeshError::FaceOutOfRange`] if a face references a missing vertex.
    pub fn new(vertices: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        if faces.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        let limit = vertices.len() as u32;
        for (face, indices) in faces.iter().enumerate() {
            for &index in indices {
                if index >= limit {
                    return Err(MeshError::FaceOutOfRange { face, index });
                }
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Build a closed axis-aligned box mesh (12 triangles, outward winding).
    #[must_use]
    pub fn cuboid(bounds: Bounds) -> Self {
        let vertices = bounds.corners().to_vec();
        let faces = vec![
            // -z
            [0, 3, 1],
            [0, 2, 3],
            // +z
            [4, 5, 7],
            [4, 7, 6],
            // -y
            [0, 1, 5],
            [0, 5, 4],
            // +y
            [3, 2, 6],
            [3, 6, 7],
            // -x
            [0, 4, 6],
            [0, 6, 2],
            // +x
            [1, 3, 7],
            [1, 7, 5],
        ];
        Self { vertices, faces }
    }

    /// Number of triangles.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The three corner positions of face `face`.
    #[must_use]
    pub fn triangle(&self, face: usize) -> [DVec3; 3] {
        let [a, b, c] = self.faces[face];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Axis-aligned bounds of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        for &v in &self.vertices {
            min = min.min(v);
            max = max.max(v);
        }
        Bounds::from_min_max(min, max)
    }

    /// Per-axis extents of the bounds.
    #[must_use]
    pub fn extents(&self) -> DVec3 {
        self.bounds().size()
    }

    /// Area-weighted centroid of the surface.
    ///
    /// Falls back to the vertex mean when the total area is degenerate.
    #[must_use]
    pub fn centroid(&self) -> DVec3 {
        let mut weighted = DVec3::ZERO;
        let mut total_area = 0.0;
        for face in 0..self.faces.len() {
            let [a, b, c] = self.triangle(face);
            let area = 0.5 * (b - a).cross(c - a).length();
            weighted += area * ((a + b + c) / 3.0);
            total_area += area;
        }
        if total_area > f64::EPSILON {
            weighted / total_area
        } else {
            self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
        }
    }

    /// Enclosed volume as the sum of signed tetrahedra against the origin.
    ///
    /// Only meaningful for closed meshes; open meshes give a partial sum.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let mut six_vol = 0.0;
        for face in 0..self.faces.len() {
            let [a, b, c] = self.triangle(face);
            six_vol += a.dot(b.cross(c));
        }
        (six_vol / 6.0).abs()
    }

    /// Check that every directed edge is paired with its opposite exactly once.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        let mut counts: HashMap<(u32, u32), u32> = HashMap::with_capacity(self.faces.len() * 3);
        for face in &self.faces {
            for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                *counts.entry((a, b)).or_insert(0) += 1;
            }
        }
        counts
            .iter()
            .all(|(&(a, b), &n)| n == 1 && counts.get(&(b, a)) == Some(&1))
    }

    /// Move every vertex by an offset.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Scale uniformly about the origin.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.vertices {
            *v *= factor;
        }
    }

    /// Rotate about the origin around `axis` (need not be unit length) by
    /// `angle` radians.
    pub fn rotate(&mut self, axis: DVec3, angle: f64) {
        let rotation = DQuat::from_axis_angle(axis.normalize(), angle);
        for v in &mut self.vertices {
            *v = rotation * *v;
        }
    }

    /// Close triangular and quadrilateral boundary holes.
    ///
    /// Larger holes are left open. Returns the number of holes closed.
    pub fn fill_holes(&mut self) -> usize {
        let mut edge_count: BTreeMap<(u32, u32), u32> = BTreeMap::new();
        for face in &self.faces {
            for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                *edge_count.entry((a, b)).or_insert(0) += 1;
            }
        }

        // Boundary edges have no opposite; chain them into rings.
        let mut next: BTreeMap<u32, u32> = BTreeMap::new();
        for (&(a, b), &n) in &edge_count {
            if n == 1 && !edge_count.contains_key(&(b, a)) {
                next.insert(a, b);
            }
        }

        let mut filled = 0;
        let mut used: BTreeSet<u32> = BTreeSet::new();
        for &start in next.keys() {
            if used.contains(&start) {
                continue;
            }
            let mut ring = vec![start];
            let mut cursor = start;
            let mut closed = false;
            while let Some(&n) = next.get(&cursor) {
                if n == start {
                    closed = true;
                    break;
                }
                if ring.len() == 4 {
                    break;
                }
                ring.push(n);
                cursor = n;
            }
            if !closed {
                continue;
            }
            used.extend(ring.iter().copied());
            // New faces traverse the ring backwards so each boundary edge
            // gains its missing opposite.
            match ring.len() {
                3 => {
                    self.faces.push([ring[0], ring[2], ring[1]]);
                    filled += 1;
                }
                4 => {
                    self.faces.push([ring[0], ring[3], ring[2]]);
                    self.faces.push([ring[0], ring[2], ring[1]]);
                    filled += 1;
                }
                _ => {}
            }
        }
        filled
    }

    /// Append another mesh's geometry to this one.
    pub fn append(&mut self, other: &TriMesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> TriMesh {
        TriMesh::cuboid(Bounds::from_min_max(DVec3::ZERO, DVec3::splat(1.0)))
    }

    #[test]
    fn test_new_rejects_bad_faces() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        assert!(matches!(
            TriMesh::new(vertices.clone(), vec![]),
            Err(MeshError::EmptyMesh)
        ));
        assert!(matches!(
            TriMesh::new(vertices, vec![[0, 1, 3]]),
            Err(MeshError::FaceOutOfRange { face: 0, index: 3 })
        ));
    }

    #[test]
    fn test_cuboid_measurements() {
        let mesh = TriMesh::cuboid(Bounds::from_min_max(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0)));
        assert_eq!(mesh.face_count(), 12);
        assert!(mesh.is_watertight());
        assert!((mesh.volume() - 6.0).abs() < 1e-12);
        let bounds = mesh.bounds();
        assert_eq!(bounds.min, DVec3::ZERO);
        assert_eq!(bounds.max, DVec3::new(1.0, 2.0, 3.0));
        assert!((mesh.centroid() - DVec3::new(0.5, 1.0, 1.5)).length() < 1e-12);
    }

    #[test]
    fn test_translate_and_scale() {
        let mut mesh = unit_box();
        mesh.translate(DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(mesh.bounds().min, DVec3::new(10.0, 0.0, 0.0));

        let mut mesh = unit_box();
        mesh.scale(2.0);
        assert_eq!(mesh.bounds().max, DVec3::splat(2.0));
        assert!((mesh.volume() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_quarter_turn_about_x() {
        // (x, y, z) -> (x, -z, y)
        let mut mesh = unit_box();
        mesh.rotate(DVec3::X, std::f64::consts::FRAC_PI_2);
        let bounds = mesh.bounds();
        assert!((bounds.min - DVec3::new(0.0, -1.0, 0.0)).length() < 1e-9);
        assert!((bounds.max - DVec3::new(1.0, 0.0, 1.0)).length() < 1e-9);
        assert!((mesh.volume() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_holes_closes_missing_face() {
        let mut mesh = unit_box();
        mesh.faces.pop();
        assert!(!mesh.is_watertight());
        assert_eq!(mesh.fill_holes(), 1);
        assert!(mesh.is_watertight());
        assert!((mesh.volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_append_merges_geometry() {
        let mut scene = unit_box();
        let mut other = unit_box();
        other.translate(DVec3::new(5.0, 0.0, 0.0));
        scene.append(&other);
        assert_eq!(scene.face_count(), 24);
        assert!(scene.is_watertight());
        assert!((scene.volume() - 2.0).abs() < 1e-12);
        assert_eq!(scene.bounds().max, DVec3::new(6.0, 1.0, 1.0));
    }
}
