//! Corner compaction: slide bags toward the back-left-bottom corner.

use glam::DVec3;
use tracing::debug;

use crate::collision::CollisionField;
use crate::containment::{clamp_into, fits};
use crate::refine::{corner_norm_order, field_of_others};
use crate::search::BagInstance;
use crate::trunk::Trunk;

/// Slide increment, in meters.
const STEP: f64 = 0.005;

/// Maximum sweeps over the whole placement.
const PASSES: usize = 5;

/// Push directions, tried in this order for each bag. Single axes first,
/// then the diagonals; diagonal steps move the full increment on each of
/// their axes.
const DIRECTIONS: [DVec3; 7] = [
    DVec3::new(0.0, -1.0, 0.0),
    DVec3::new(-1.0, 0.0, 0.0),
    DVec3::new(-1.0, -1.0, 0.0),
    DVec3::new(0.0, 0.0, -1.0),
    DVec3::new(-1.0, 0.0, -1.0),
    DVec3::new(0.0, -1.0, -1.0),
    DVec3::new(-1.0, -1.0, -1.0),
];

/// Repeatedly slides each bag as far toward the origin corner as the
/// trunk and the other bags allow.
///
/// Bags move one at a time, nearest the corner first, each seeing the
/// others at their current positions. Sweeps repeat until a pass moves
/// nothing or [`PASSES`] is reached.
pub fn compact_bags<F: CollisionField + Default>(trunk: &Trunk, placed: &mut [BagInstance]) {
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
                let step = direction * STEP;
                loop {
                    let mut pushed = bounds;
                    pushed.translate(step);
                    if !fits(trunk, &pushed) || field.collides(&pushed) {
                        break;
                    }
                    bounds = pushed;
                    moved_any = true;
                }
            }
            placed[slot].bounds = clamp_into(&bounds, &full);
        }

        if !moved_any {
            debug!(passes = pass + 1, "compaction converged");
            return;
        }
    }
    debug!(passes = PASSES, "compaction pass budget exhausted");
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
    fn lone_bag_slides_into_the_corner() {
        let trunk = unit_trunk();
        let mut placed = vec![instance(0, DVec3::splat(0.503), 0.2)];

        compact_bags::<AabbField>(&trunk, &mut placed);

        // 99 steps of 0.005 land at 0.008; one more would breach the
        // wall tolerance.
        let min = placed[0].bounds.min;
        assert!((min.x - 0.008).abs() < 1e-6);
        assert!((min.y - 0.008).abs() < 1e-6);
        assert!((min.z - 0.008).abs() < 1e-6);
    }

    #[test]
    fn bags_stack_against_each_other() {
        let trunk = unit_trunk();
        let mut placed = vec![
            instance(0, DVec3::new(0.303, 0.303, 0.303), 0.2),
            instance(1, DVec3::new(0.553, 0.303, 0.302), 0.2),
        ];

        compact_bags::<AabbField>(&trunk, &mut placed);

        // Inner bag reaches the corner. The outer one slides over it while
        // still higher up, then drops until it rests on top.
        let inner = placed[0].bounds;
        let outer = placed[1].bounds;
        assert!((inner.min.x - 0.008).abs() < 1e-6);
        assert!((inner.min.z - 0.008).abs() < 1e-6);
        assert!((outer.min.x - 0.008).abs() < 1e-6);
        assert!((outer.min.z - 0.212).abs() < 1e-6);
        assert!(!inner.overlaps(&outer));
    }

    #[test]
    fn empty_slice_is_a_no_op() {
        let trunk = unit_trunk();
        let mut placed: Vec<BagInstance> = Vec::new();
        compact_bags::<AabbField>(&trunk, &mut placed);
        assert!(placed.is_empty());
    }
}
