//! Gravity settling: drop bags until they rest on something.

use glam::DVec3;
use tracing::debug;

use crate::collision::{BagId, CollisionField};
use crate::containment::{clamp_into, fits};
use crate::search::BagInstance;
use crate::trunk::Trunk;

/// Drop increment, in meters.
const STEP: f64 = 0.02;

/// Settles every bag downward as far as the trunk and the already-settled
/// bags allow.
///
/// Bags settle lowest-first, so a bag can land on one that settled before
/// it but never tunnels through one still waiting its turn. On return,
/// `placed` is reordered into settle order.
pub fn apply_gravity<F: CollisionField + Default>(trunk: &Trunk, placed: &mut Vec<BagInstance>) {
    if placed.is_empty() {
        return;
    }
    let full = trunk.bounds();
    let drop = DVec3::new(0.0, 0.0, -STEP);
    let mut field = F::default();

    placed.sort_by(|a, b| a.bounds.min.z.total_cmp(&b.bounds.min.z));
    for bag in placed.iter_mut() {
        let mut bounds = bag.bounds;
        loop {
            let mut lowered = bounds;
            lowered.translate(drop);
            if !fits(trunk, &lowered) || field.collides(&lowered) {
                break;
            }
            bounds = lowered;
        }
        bag.bounds = clamp_into(&bounds, &full);
        field.add(BagId::new(bag.original_idx), bag.bounds);
    }
    debug!(bags = placed.len(), "gravity settled");
}

// =============================================================================
// Tests
// =============================================================================
