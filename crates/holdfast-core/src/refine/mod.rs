//! Placement refinement passes.
//!
//! After the initial search, placements are good but loose. Four passes
//! tighten them, always in the same order:
//!
//! - [`apply_gravity`]: drop every bag until it rests on the floor or on
//!   another bag. Runs again at the very end of the pipeline.
//! - [`compact_bags`]: slide bags toward the back-left-bottom corner in
//!   coarse steps until nothing moves.
//! - [`fill_gaps`]: retry unplaced bags against floor-level gaps the
//!   earlier passes opened up.
//! - [`micro_adjust`]: millimeter nudges to close the last slivers.
//!
//! Every pass preserves the two core guarantees: no bag leaves the trunk
//! and no two bags overlap.

use crate::collision::{BagId, CollisionField};
use crate::search::BagInstance;

mod compact;
mod gaps;
mod gravity;
mod micro;

pub use compact::compact_bags;
pub use gaps::fill_gaps;
pub use gravity::apply_gravity;
pub use micro::micro_adjust;

/// Iteration order for the sliding passes: bags closest to the origin
/// corner move first, so inner bags free up room before outer ones chase
/// them.
pub(crate) fn corner_norm_order(placed: &[BagInstance]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..placed.len()).collect();
    order.sort_by(|&a, &b| {
        placed[a]
            .bounds
            .min
            .length()
            .total_cmp(&placed[b].bounds.min.length())
    });
    order
}

/// Collision field containing every placed bag except `exclude`.
pub(crate) fn field_of_others<F: CollisionField + Default>(
    placed: &[BagInstance],
    exclude: usize,
) -> F {
    let mut field = F::default();
    for other in placed {
        if other.original_idx != exclude {
            field.add(BagId::new(other.original_idx), other.bounds);
        }
    }
    field
}
