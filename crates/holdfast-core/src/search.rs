//! Initial placement search.
//!
//! Bags are ranked by volume, largest first, and each one scans a regular
//! grid of candidate positions inside the usable envelope. Candidates are
//! scored by their minimum corner as a `(z, y, x)` tuple, so the winner is
//! the lowest, rearmost, leftmost pocket the bag fits into. A per-bag
//! ceiling on evaluated candidates keeps worst-case runtime bounded.

use std::cmp::Ordering;

use glam::DVec3;
use hull::Bounds;
use tracing::debug;

use crate::catalog::{unique_rotations, BagFactory, BagSpec};
use crate::collision::{BagId, CollisionField};
use crate::containment::{clamp_into, fits, FIT_TOL};
use crate::profile::SearchProfile;
use crate::report::UnplacedBag;
use crate::trunk::Trunk;

/// Grid ranges stop one centimeter short of the usable maximum.
const RANGE_HEADROOM: f64 = 0.01;

// =============================================================================
// Types
// =============================================================================

/// A bag with a confirmed position inside the trunk.
#[derive(Debug, Clone)]
pub struct BagInstance {
    /// Index of the request that produced this bag.
    pub original_idx: usize,
    /// The request itself, kept for report labels.
    pub spec: BagSpec,
    /// Current world-space bounds.
    pub bounds: Bounds,
}

/// A request annotated with its rank-order metadata.
#[derive(Debug, Clone)]
pub(crate) struct RankedRequest {
    pub original_idx: usize,
    pub spec: BagSpec,
    pub extents: DVec3,
}

// =============================================================================
// Helpers
// =============================================================================

/// Half-open floating-point range: start inclusive, stop exclusive.
///
/// The value count is fixed up front as `ceil((stop - start) / step)`, so
/// accumulated rounding cannot change how many candidates a grid yields.
pub(crate) fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if stop <= start || step <= 0.0 {
        return Vec::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = ((stop - start) / step).ceil() as usize;
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// Lexicographic comparison of candidate scores.
pub(crate) fn lex_cmp(a: &[f64], b: &[f64]) -> Ordering {
    for (lhs, rhs) in a.iter().zip(b) {
        match lhs.total_cmp(rhs) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

/// Ranks requests for placement: volume descending, ties in request order.
pub(crate) fn rank_requests(factory: &mut BagFactory, requests: &[BagSpec]) -> Vec<RankedRequest> {
    let mut ranked: Vec<RankedRequest> = requests
        .iter()
        .enumerate()
        .map(|(original_idx, spec)| RankedRequest {
            original_idx,
            spec: spec.clone(),
            extents: factory.extents_m(spec),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.extents
            .element_product()
            .total_cmp(&a.extents.element_product())
    });
    ranked
}

/// Grid of candidate minimum-corner positions along one axis.
pub(crate) fn axis_grid(min: f64, max: f64, extent: f64, step: f64) -> Vec<f64> {
    arange(
        min + FIT_TOL,
        (max - extent - FIT_TOL).min(max - RANGE_HEADROOM),
        step,
    )
}

/// True if a rotation cannot fit the usable envelope on some axis.
pub(crate) fn oversized(rotation: DVec3, usable_size: DVec3) -> bool {
    rotation.x > usable_size.x || rotation.y > usable_size.y || rotation.z > usable_size.z
}

// =============================================================================
// Search
// =============================================================================

/// Places each requested bag at its best-scoring grid position.
///
/// Bags are tried in volume order, largest first. For every distinct
/// rotation the scan walks z layers bottom-up, breaking out of a layer
/// range as soon as it cannot beat the incumbent score. Placements are
/// clamped into the usable envelope and registered with `field` so later
/// bags avoid them; requests with no viable candidate are reported in
/// `unplaced` with their base dimensions.
///
/// `on_bag(rank, total, spec)` fires before each bag's scan, in rank
/// order, for progress reporting.
pub fn place_initial<F: CollisionField>(
    trunk: &Trunk,
    factory: &mut BagFactory,
    requests: &[BagSpec],
    profile: &SearchProfile,
    field: &mut F,
    mut on_bag: impl FnMut(usize, usize, &BagSpec),
) -> (Vec<BagInstance>, Vec<UnplacedBag>) {
    let mut placed = Vec::new();
    let mut unplaced = Vec::new();

    let usable = trunk.usable_bounds();
    let usable_size = usable.size();
    let ranked = rank_requests(factory, requests);
    let total = ranked.len();

    for (rank, request) in ranked.into_iter().enumerate() {
        on_bag(rank, total, &request.spec);

        let mut best: Option<([f64; 3], Bounds)> = None;
        let mut checks = 0usize;

        'rotations: for rotation in unique_rotations(request.extents) {
            if oversized(rotation, usable_size) {
                continue;
            }
            let xs = axis_grid(usable.min.x, usable.max.x, rotation.x, profile.grid_step);
            let ys = axis_grid(usable.min.y, usable.max.y, rotation.y, profile.grid_step);
            let zs = axis_grid(usable.min.z, usable.max.z, rotation.z, profile.grid_step);

            for &z in &zs {
                // A layer above the incumbent cannot beat it.
                if let Some((score, _)) = &best {
                    if z > score[0] {
                        break;
                    }
                }
                for &y in &ys {
                    for &x in &xs {
                        checks += 1;
                        if checks > profile.candidate_ceiling {
                            break 'rotations;
                        }

                        let min = DVec3::new(x, y, z);
                        let candidate = Bounds::from_min_max(min, min + rotation);
                        if fits(trunk, &candidate) && !field.collides(&candidate) {
                            let score = [candidate.min.z, candidate.min.y, candidate.min.x];
                            let improves = best
                                .as_ref()
                                .map_or(true, |(incumbent, _)| {
                                    lex_cmp(&score, incumbent) == Ordering::Less
                                });
                            if improves {
                                best = Some((score, candidate));
                            }
                        }
                    }
                }
            }
        }

        let id = BagId::new(request.original_idx);
        match best {
            Some((_, bounds)) => {
                let clamped = clamp_into(&bounds, &usable);
                field.add(id, clamped);
                debug!(bag = %id, checks, min = ?clamped.min, "placed");
                placed.push(BagInstance {
                    original_idx: request.original_idx,
                    spec: request.spec,
                    bounds: clamped,
                });
            }
            None => {
                debug!(bag = %id, checks, "no viable position");
                unplaced.push(UnplacedBag::for_request(
                    request.original_idx,
                    &request.spec,
                    request.extents,
                ));
            }
        }
    }

    (placed, unplaced)
}

// =============================================================================
// Tests
// =============================================================================
