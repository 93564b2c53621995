//! STL import and export.
//!
//! Reads both ASCII and binary STL through `stl_io`, which deduplicates
//! vertices into the indexed form [`TriMesh`] wants. Export recomputes facet
//! normals from the winding rather than trusting stored ones.

use std::io::Cursor;

use glam::DVec3;
use tracing::debug;

use crate::mesh::{MeshError, TriMesh};

/// Parse STL bytes into a mesh.
///
/// # Errors
///
/// [`MeshError::Io`] on malformed STL, [`MeshError::EmptyMesh`] when the
/// file carries no triangles.
pub fn read_stl_bytes(bytes: &[u8]) -> Result<TriMesh, MeshError> {
    let mut cursor = Cursor::new(bytes);
    let stl = stl_io::read_stl(&mut cursor)?;

    let vertices: Vec<DVec3> = stl
        .vertices
        .iter()
        .map(|v| DVec3::new(f64::from(v[0]), f64::from(v[1]), f64::from(v[2])))
        .collect();
    let faces: Vec<[u32; 3]> = stl
        .faces
        .iter()
        .map(|f| {
            [
                f.vertices[0] as u32,
                f.vertices[1] as u32,
                f.vertices[2] as u32,
            ]
        })
        .collect();

    debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        "parsed stl"
    );
    TriMesh::new(vertices, faces)
}

/// Serialize a mesh to binary STL bytes.
///
/// # Errors
///
/// [`MeshError::Io`] if serialization fails.
pub fn write_stl_bytes(mesh: &TriMesh) -> Result<Vec<u8>, MeshError> {
    let to_vertex = |p: DVec3| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);

    let mut triangles = Vec::with_capacity(mesh.faces.len());
    for face in 0..mesh.faces.len() {
        let [a, b, c] = mesh.triangle(face);
        let normal = (b - a).cross(c - a).normalize_or_zero();
        triangles.push(stl_io::Triangle {
            normal: stl_io::Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
            vertices: [to_vertex(a), to_vertex(b), to_vertex(c)],
        });
    }

    let mut out = Vec::new();
    stl_io::write_stl(&mut out, triangles.iter())?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;

    #[test]
    fn test_stl_round_trip() {
        let mesh = TriMesh::cuboid(Bounds::from_min_max(
            DVec3::ZERO,
            DVec3::new(1.0, 2.0, 0.5),
        ));
        let bytes = write_stl_bytes(&mesh).unwrap();
        let back = read_stl_bytes(&bytes).unwrap();

        assert_eq!(back.face_count(), 12);
        assert!(back.is_watertight());
        assert!((back.volume() - mesh.volume()).abs() < 1e-4);
        assert!((back.bounds().max - mesh.bounds().max).length() < 1e-4);
    }

    #[test]
    fn test_read_rejects_garbage() {
        assert!(read_stl_bytes(&[0u8; 10]).is_err());
    }
}
