//! Test helper functions for building trunks and request lists.
//!
//! This module provides factory functions and shared assertions that keep
//! the scenario and determinism suites short and consistent.

use glam::DVec3;
use hull::{Bounds, TriMesh};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::catalog::{BagKind, BagSize, BagSpec};
use crate::containment::FIT_TOL;
use crate::report::{PackReport, PlacedBag};
use crate::trunk::Trunk;

// =============================================================================
// Trunk Factories
// =============================================================================

/// Builds a watertight box trunk spanning `[0, size]` on every axis.
pub fn cuboid_trunk(size: DVec3) -> Trunk {
    Trunk::new(TriMesh::cuboid(Bounds::from_min_max(DVec3::ZERO, size)))
}

/// One cubic meter of cargo space.
pub fn unit_trunk() -> Trunk {
    cuboid_trunk(DVec3::ONE)
}

/// Builds a box trunk with one wall triangle removed.
///
/// The missing triangle makes the mesh non-watertight, which forces
/// containment onto the voxel path while leaving the interior unchanged.
pub fn open_trunk(size: DVec3) -> Trunk {
    let mut mesh = TriMesh::cuboid(Bounds::from_min_max(DVec3::ZERO, size));
    mesh.faces.pop();
    Trunk::new(mesh)
}

// =============================================================================
// Request Factories
// =============================================================================

/// A realistic mixed booking: one bag per major catalog family.
///
/// # Returns
///
/// Four catalog requests, largest first by volume.
pub fn family_trip_requests() -> Vec<BagSpec> {
    vec![
        BagSpec::catalog(BagKind::HardRolling, BagSize::Large),
        BagSpec::catalog(BagKind::SoftRolling, BagSize::Medium),
        BagSpec::catalog(BagKind::Duffle, BagSize::Medium),
        BagSpec::catalog(BagKind::Backpack, BagSize::Small),
    ]
}

/// Deterministic pseudo-random custom bags with edges in `[10, 60]` cm.
///
/// # Arguments
///
/// * `seed` - Seed for the request generator
/// * `count` - Number of bags to produce
pub fn random_requests(seed: u64, count: usize) -> Vec<BagSpec> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            BagSpec::custom(
                rng.gen_range(10.0..=60.0),
                rng.gen_range(10.0..=60.0),
                rng.gen_range(10.0..=60.0),
            )
        })
        .collect()
}

// =============================================================================
// Shared Assertions
// =============================================================================

/// Panics if any two placed bags overlap.
pub fn assert_disjoint(placed: &[PlacedBag]) {
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            assert!(
                !a.bounds.overlaps(&b.bounds),
                "bags {} and {} overlap: {:?} vs {:?}",
                a.original_idx,
                b.original_idx,
                a.bounds,
                b.bounds
            );
        }
    }
}

/// Panics if a placed bag leaves the placement envelope.
///
/// The envelope is the trunk AABB shrunk by `FIT_TOL`, which is the
/// usable bounds widened back out by the same tolerance. Every phase
/// keeps its accepted positions inside this band.
pub fn assert_inside(trunk: &Trunk, placed: &[PlacedBag]) {
    let envelope = trunk.bounds().shrink(FIT_TOL);
    for bag in placed {
        assert!(
            envelope.contains_bounds(&bag.bounds),
            "bag {} left the placement envelope: {:?} vs {:?}",
            bag.original_idx,
            bag.bounds,
            envelope
        );
    }
}

/// Serializes the parts of a report that must be reproducible.
///
/// Wall-clock timing is excluded: everything else has to be identical
/// across repeat runs.
pub fn reproducible_json(report: &PackReport) -> String {
    serde_json::to_string(&(&report.placed, &report.unplaced, &report.utilization)).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_trunk_is_watertight() {
        let trunk = cuboid_trunk(DVec3::new(1.2, 0.9, 0.6));
        assert!(trunk.is_watertight());
        assert!((trunk.capacity_volume() - 0.648).abs() < 1e-9);
    }

    #[test]
    fn open_trunk_is_not_watertight() {
        let trunk = open_trunk(DVec3::ONE);
        assert!(!trunk.is_watertight());
        assert_eq!(trunk.mesh().face_count(), 11);
    }

    #[test]
    fn random_requests_stay_in_catalog_range() {
        for spec in random_requests(3, 20) {
            match spec {
                BagSpec::Custom {
                    length_cm,
                    breadth_cm,
                    thickness_cm,
                } => {
                    for dim in [length_cm, breadth_cm, thickness_cm] {
                        assert!((10.0..=60.0).contains(&dim));
                    }
                }
                BagSpec::Catalog { .. } => panic!("expected custom bags"),
            }
        }
    }
}
