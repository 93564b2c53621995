//! Second-chance placement for bags the initial search rejected.
//!
//! Compaction tends to open floor-level pockets. This pass retries every
//! still-unplaced request against the floor layer only, using a two-stage
//! scan: a coarse grid collects promising pockets, then a fine grid around
//! the best dozen of them picks the final position. Scores ignore height
//! (everything sits on the floor) and prefer rear, then left.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use glam::DVec3;
use hull::Bounds;
use tracing::debug;

use crate::catalog::{unique_rotations, BagFactory, BagSpec};
use crate::collision::{BagId, CollisionField};
use crate::containment::{clamp_into, fits, FIT_TOL};
use crate::profile::SearchProfile;
use crate::report::UnplacedBag;
use crate::search::{arange, axis_grid, lex_cmp, oversized, BagInstance, RankedRequest};
use crate::trunk::Trunk;

/// Coarse hits carried into the fine scan.
const TOP_HITS: usize = 12;

/// Retries unplaced requests against floor-level gaps.
///
/// Newly placed bags are appended to `placed` and their entries removed
/// from `unplaced`. The fine scan counts against the profile's candidate
/// ceiling; the coarse survey does not.
pub fn fill_gaps<F: CollisionField + Default>(
    trunk: &Trunk,
    factory: &mut BagFactory,
    requests: &[BagSpec],
    placed: &mut Vec<BagInstance>,
    unplaced: &mut Vec<UnplacedBag>,
    profile: &SearchProfile,
) {
    if placed.is_empty() || requests.is_empty() {
        return;
    }

    let placed_ids: BTreeSet<usize> = placed.iter().map(|bag| bag.original_idx).collect();
    let mut leftovers: Vec<RankedRequest> = requests
        .iter()
        .enumerate()
        .filter(|(original_idx, _)| !placed_ids.contains(original_idx))
        .map(|(original_idx, spec)| RankedRequest {
            original_idx,
            spec: spec.clone(),
            extents: factory.extents_m(spec),
        })
        .collect();
    if leftovers.is_empty() {
        return;
    }
    leftovers.sort_by(|a, b| {
        b.extents
            .element_product()
            .total_cmp(&a.extents.element_product())
    });

    let mut field = F::default();
    for bag in placed.iter() {
        field.add(BagId::new(bag.original_idx), bag.bounds);
    }

    let usable = trunk.usable_bounds();
    let usable_size = usable.size();
    let coarse = (profile.grid_step * 5.0).max(0.10);
    let fine = profile.grid_step.max(0.03);
    let floor_z = usable.min.z + FIT_TOL;

    for request in leftovers {
        let mut best: Option<([f64; 2], Bounds)> = None;
        let mut candidates = 0usize;

        'rotations: for rotation in unique_rotations(request.extents) {
            if oversized(rotation, usable_size) {
                continue;
            }
            let xs = axis_grid(usable.min.x, usable.max.x, rotation.x, coarse);
            let ys = axis_grid(usable.min.y, usable.max.y, rotation.y, coarse);

            // Coarse survey of the floor layer. Hits beyond TOP_HITS push
            // out the worst-scoring one.
            let mut top_hits: Vec<([f64; 2], Bounds)> = Vec::new();
            for &y in &ys {
                for &x in &xs {
                    let min = DVec3::new(x, y, floor_z);
                    let candidate = Bounds::from_min_max(min, min + rotation);
                    if fits(trunk, &candidate) && !field.collides(&candidate) {
                        top_hits.push(([candidate.min.y, candidate.min.x], candidate));
                        if top_hits.len() > TOP_HITS {
                            top_hits.sort_by(|a, b| lex_cmp(&a.0, &b.0));
                            top_hits.truncate(TOP_HITS);
                        }
                    }
                }
            }

            for (_, pocket) in top_hits {
                let xs_fine = arange(
                    (usable.min.x + FIT_TOL).max(pocket.min.x - coarse),
                    (usable.max.x - rotation.x - FIT_TOL).min(pocket.min.x + coarse),
                    fine,
                );
                let ys_fine = arange(
                    (usable.min.y + FIT_TOL).max(pocket.min.y - coarse),
                    (usable.max.y - rotation.y - FIT_TOL).min(pocket.min.y + coarse),
                    fine,
                );
                for &y in &ys_fine {
                    for &x in &xs_fine {
                        let min = DVec3::new(x, y, floor_z);
                        let candidate = Bounds::from_min_max(min, min + rotation);
                        candidates += 1;
                        if fits(trunk, &candidate) && !field.collides(&candidate) {
                            let score = [candidate.min.y, candidate.min.x];
                            let improves = best.as_ref().map_or(true, |(incumbent, _)| {
                                lex_cmp(&score, incumbent) == Ordering::Less
                            });
                            if improves {
                                best = Some((score, candidate));
                            }
                        }
                        if candidates >= profile.candidate_ceiling {
                            break 'rotations;
                        }
                    }
                }
            }
        }

        if let Some((_, bounds)) = best {
            let id = BagId::new(request.original_idx);
            let clamped = clamp_into(&bounds, &usable);
            field.add(id, clamped);
            unplaced.retain(|entry| entry.original_idx != request.original_idx);
            debug!(bag = %id, candidates, min = ?clamped.min, "gap filled");
            placed.push(BagInstance {
                original_idx: request.original_idx,
                spec: request.spec,
                bounds: clamped,
            });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::AabbField;
    use crate::search::place_initial;
    use hull::TriMesh;

    fn unit_trunk() -> Trunk {
        Trunk::new(TriMesh::cuboid(Bounds::from_min_max(
            DVec3::ZERO,
            DVec3::ONE,
        )))
    }

    #[test]
    fn leftover_bag_lands_in_a_floor_gap() {
        let trunk = unit_trunk();
        let mut factory = BagFactory::new();
        let mut field = AabbField::new();

        // A tight candidate ceiling makes the initial search give up on
        // the second bag before it scans past the first one.
        let requests = vec![
            BagSpec::custom(69.0, 69.0, 69.0),
            BagSpec::custom(20.0, 20.0, 20.0),
        ];
        let profile = SearchProfile::new(0.05, 10);

        let (mut placed, mut unplaced) = place_initial(
            &trunk,
            &mut factory,
            &requests,
            &profile,
            &mut field,
            |_, _, _| {},
        );
        assert_eq!(placed.len(), 1);
        assert_eq!(unplaced.len(), 1);

        fill_gaps::<AabbField>(
            &trunk,
            &mut factory,
            &requests,
            &mut placed,
            &mut unplaced,
            &profile,
        );

        assert_eq!(placed.len(), 2);
        assert!(unplaced.is_empty());
        // The small bag slots in beside the big one, on the floor.
        let rescued = &placed[1];
        assert_eq!(rescued.original_idx, 1);
        assert!((rescued.bounds.min.x - 0.715).abs() < 1e-9);
        assert!((rescued.bounds.min.y - 0.015).abs() < 1e-9);
        assert!((rescued.bounds.min.z - 0.015).abs() < 1e-9);
        assert!(!placed[0].bounds.overlaps(&rescued.bounds));
    }

    #[test]
    fn nothing_to_do_when_all_bags_are_placed() {
        let trunk = unit_trunk();
        let mut factory = BagFactory::new();
        let mut field = AabbField::new();

        let requests = vec![BagSpec::custom(20.0, 20.0, 20.0)];
        let (mut placed, mut unplaced) = place_initial(
            &trunk,
            &mut factory,
            &requests,
            &SearchProfile::default(),
            &mut field,
            |_, _, _| {},
        );
        assert!(unplaced.is_empty());
        let before = placed[0].bounds;

        fill_gaps::<AabbField>(
            &trunk,
            &mut factory,
            &requests,
            &mut placed,
            &mut unplaced,
            &SearchProfile::default(),
        );

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].bounds, before);
    }

    #[test]
    fn skipped_when_nothing_was_placed_at_all() {
        let trunk = unit_trunk();
        let mut factory = BagFactory::new();

        let requests = vec![BagSpec::custom(20.0, 20.0, 20.0)];
        let mut placed = Vec::new();
        let mut unplaced = vec![UnplacedBag::for_request(
            0,
            &requests[0],
            DVec3::splat(0.2),
        )];

        fill_gaps::<AabbField>(
            &trunk,
            &mut factory,
            &requests,
            &mut placed,
            &mut unplaced,
            &SearchProfile::default(),
        );

        assert!(placed.is_empty());
        assert_eq!(unplaced.len(), 1);
    }
}
