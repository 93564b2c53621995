//! Millimeter-scale nudging after the coarse passes.

use glam::DVec3;
use tracing::debug;

use crate::collision::CollisionField;
use crate::containment::{clamp_into, fits};
use crate::refine::{corner_norm_order, field_of_others};
use crate::search::BagInstance;
use crate::trunk::Trunk;

/// Nudge increment, in meters.
const STEP: f64 = 0.001;

/// Maximum sweeps over the whole placement.
const PASSES: usize = 3;

/// Nudge directions, tried in this order for each bag. Unlike compaction,
/// straight down ranks ahead of the diagonals, and each direction gets a
/// single trial step rather than a slide.
const DIRECTIONS: [DVec3; 7] = [
    DVec3::new(0.0, -1.0, 0.0),
    DVec3::new(-1.0, 0.0, 0.0),
    DVec3::new(0.0, 0.0, -1.0),
    DVec3::new(-1.0, -1.0, 0.0),
    DVec3::new(-1.0, 0.0, -1.0),
    DVec3::new(0.0, -1.0, -1.0),
    DVec3::new(-1.0, -1.0, -1.0),
];

/// Applies single-step nudges toward the origin corner until a sweep
/// changes nothing or [`PASSES`] is reached.
pub fn micro_adjust<F: CollisionField + Default>(trunk: &Trunk, placed: &mut [BagInstance]) {
    if placed.is_empty() {
        return;
    }
    let full = trunk.bounds();

    for pass in 0..PASSES {
        let mut moved_any = false;

        for slot in corner_norm_order(placed) {
            let field: F = field_of_others(placed, placed[slot].original_idx);
            let mut bounds = placed[slot].bounds;

            for direction in DIRECTIONS {
                let mut nudged = bounds;
                nudged.translate(direction * STEP);
                if fits(trunk, &nudged) && !field.collides(&nudged) {
                    bounds = nudged;
                    moved_any = true;
                }
            }
            placed[slot].bounds = clamp_into(&bounds, &full);
        }

        if !moved_any {
            debug!(passes = pass + 1, "micro adjustment converged");
            return;
        }
    }
    debug!(passes = PASSES, "micro adjustment pass budget exhausted");
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BagSpec;
    use crate::collision::AabbField;
    use hull::{Bounds, TriMesh};

    fn unit_trunk() -> Trunk {
        Trunk::new(TriMesh::cuboid(Bounds::from_min_max(
            DVec3::ZERO,
            DVec3::ONE,
        )))
    }

    fn instance(original_idx: usize, min: DVec3, size: f64) -> BagInstance {
        BagInstance {
            original_idx,
            spec: BagSpec::custom(size * 100.0, size * 100.0, size * 100.0),
            bounds: Bounds::from_min_max(min, min + DVec3::splat(size)),
        }
    }

    #[test]
    fn free_bag_creeps_toward_the_corner() {
        let trunk = unit_trunk();
        let mut placed = vec![instance(0, DVec3::splat(0.05), 0.2)];

        micro_adjust::<AabbField>(&trunk, &mut placed);

        // Four of the seven directions touch each axis, three passes each:
        // 12 millimeters of travel per axis.
        let min = placed[0].bounds.min;
        assert!((min.x - 0.038).abs() < 1e-9);
        assert!((min.y - 0.038).abs() < 1e-9);
        assert!((min.z - 0.038).abs() < 1e-9);
    }

    #[test]
    fn pinned_bag_stops_after_one_pass() {
        let trunk = unit_trunk();
        let start = DVec3::splat(0.005);
        let mut placed = vec![instance(0, start, 0.2)];

        micro_adjust::<AabbField>(&trunk, &mut placed);

        assert!((placed[0].bounds.min - start).length() < 1e-12);
    }

    #[test]
    fn nudges_respect_neighbors() {
        let trunk = unit_trunk();
        // Half a millimeter of clearance: a full step would overlap.
        let mut placed = vec![
            instance(0, DVec3::new(0.0055, 0.0055, 0.0055), 0.2),
            instance(1, DVec3::new(0.206, 0.0055, 0.0055), 0.2),
        ];

        micro_adjust::<AabbField>(&trunk, &mut placed);

        assert!(!placed[0].bounds.overlaps(&placed[1].bounds));
        assert!((placed[1].bounds.min.x - 0.206).abs() < 1e-12);
    }
}
