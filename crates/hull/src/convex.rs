//! Incremental 3-D convex hulls, reduced to the volume query packing needs.
//!
//! Open container meshes have no well-defined enclosed volume; their convex
//! hull gives a usable stand-in. The hull is built incrementally: seed
//! tetrahedron from extreme points, then per point delete the faces it can
//! see and re-triangulate the horizon.

use glam::DVec3;

/// Volume of the convex hull of a point set.
///
/// Returns 0.0 for degenerate input: fewer than four points, or a set that
/// is collinear or coplanar within tolerance.
#[must_use]
pub fn convex_hull_volume(points: &[DVec3]) -> f64 {
    let Some(faces) = hull_faces(points) else {
        return 0.0;
    };
    let mut six_vol = 0.0;
    for &(a, b, c) in &faces {
        six_vol += points[a].dot(points[b].cross(points[c]));
    }
    (six_vol / 6.0).abs()
}

fn hull_faces(points: &[DVec3]) -> Option<Vec<(usize, usize, usize)>> {
    if points.len() < 4 {
        return None;
    }
    let [a, b, c, d] = initial_tetrahedron(points)?;
    let center = (points[a] + points[b] + points[c] + points[d]) / 4.0;

    let mut faces = vec![(a, b, c), (a, b, d), (a, c, d), (b, c, d)];
    for face in &mut faces {
        orient_outward(points, center, face);
    }

    for idx in 0..points.len() {
        if idx == a || idx == b || idx == c || idx == d {
            continue;
        }
        add_point(points, &mut faces, idx);
    }
    Some(faces)
}

/// Pick four affinely independent seed points: the x-extremes, the point
/// farthest from their line, then the point farthest from their plane.
fn initial_tetrahedron(points: &[DVec3]) -> Option<[usize; 4]> {
    let mut lo = 0;
    let mut hi = 0;
    for (i, p) in points.iter().enumerate() {
        if p.x < points[lo].x {
            lo = i;
        }
        if p.x > points[hi].x {
            hi = i;
        }
    }
    if points[lo].distance_squared(points[hi]) < 1e-24 {
        return None;
    }

    let dir = (points[hi] - points[lo]).normalize();
    let mut third = None;
    let mut best = 1e-20;
    for (i, p) in points.iter().enumerate() {
        let rel = *p - points[lo];
        let off_line = (rel - dir * rel.dot(dir)).length_squared();
        if off_line > best {
            best = off_line;
            third = Some(i);
        }
    }
    let third = third?;

    let normal = (points[hi] - points[lo])
        .cross(points[third] - points[lo])
        .normalize();
    let mut fourth = None;
    let mut best = 1e-10;
    for (i, p) in points.iter().enumerate() {
        let off_plane = (*p - points[lo]).dot(normal).abs();
        if off_plane > best {
            best = off_plane;
            fourth = Some(i);
        }
    }
    Some([lo, hi, third, fourth?])
}

fn orient_outward(points: &[DVec3], center: DVec3, face: &mut (usize, usize, usize)) {
    let (a, b, c) = *face;
    let normal = (points[b] - points[a]).cross(points[c] - points[a]);
    let outward = (points[a] + points[b] + points[c]) / 3.0 - center;
    if normal.dot(outward) < 0.0 {
        *face = (a, c, b);
    }
}

fn add_point(points: &[DVec3], faces: &mut Vec<(usize, usize, usize)>, idx: usize) {
    let p = points[idx];
    let mut visible = Vec::new();
    for (f, &(a, b, c)) in faces.iter().enumerate() {
        let normal = (points[b] - points[a]).cross(points[c] - points[a]);
        if normal.dot(p - points[a]) > 1e-10 {
            visible.push(f);
        }
    }
    // Inside or on the current hull.
    if visible.is_empty() {
        return;
    }

    // Horizon edges are those of visible faces whose twin lies in a face
    // the point cannot see.
    let mut horizon: Vec<(usize, usize)> = Vec::new();
    for &f in &visible {
        let (a, b, c) = faces[f];
        for edge in [(a, b), (b, c), (c, a)] {
            let twin_visible = visible.iter().any(|&g| {
                if g == f {
                    return false;
                }
                let (x, y, z) = faces[g];
                [(x, y), (y, z), (z, x)].contains(&(edge.1, edge.0))
            });
            if !twin_visible {
                horizon.push(edge);
            }
        }
    }

    for &f in visible.iter().rev() {
        faces.swap_remove(f);
    }
    for (e0, e1) in horizon {
        faces.push((e0, e1, idx));
    }
}
