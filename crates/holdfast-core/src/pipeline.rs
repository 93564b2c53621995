//! The full packing pipeline, from raw requests to a finished report.
//!
//! [`pack_with_progress`] chains the placement search and the refinement
//! passes in production order:
//!
//! 1. greedy initial placement, largest bags first
//! 2. gravity settling
//! 3. corner compaction
//! 4. gap filling for bags the search rejected
//! 5. millimeter micro-adjustment
//! 6. a final gravity pass
//!
//! # Determinism
//!
//! Every phase is deterministic, so the same trunk, requests, and profile
//! always produce the same report apart from `processing_time_seconds`.

use std::time::Instant;

use tracing::info;

use crate::catalog::{BagFactory, BagSpec};
use crate::collision::AabbField;
use crate::profile::SearchProfile;
use crate::refine::{apply_gravity, compact_bags, fill_gaps, micro_adjust};
use crate::report::{PackReport, PlacedBag, Utilization};
use crate::search::place_initial;
use crate::trunk::Trunk;

/// A milestone emitted while a packing run advances.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    /// Overall completion in `[0.0, 1.0]`, non-decreasing over a run.
    pub fraction: f64,
    /// Operator-facing description of the current phase.
    pub phase: String,
}

impl ProgressInfo {
    fn new(fraction: f64, phase: impl Into<String>) -> Self {
        Self {
            fraction,
            phase: phase.into(),
        }
    }
}

/// Packs `requests` into `trunk`, discarding progress events.
#[must_use]
pub fn pack(trunk: &Trunk, requests: &[BagSpec], profile: &SearchProfile) -> PackReport {
    pack_with_progress(trunk, requests, profile, |_| ())
}

/// Packs `requests` into `trunk`, reporting milestones through `progress`.
///
/// The final event is always `1.0` / `"Packing completed"`, whether or
/// not anything was placed.
#[must_use]
pub fn pack_with_progress(
    trunk: &Trunk,
    requests: &[BagSpec],
    profile: &SearchProfile,
    mut progress: impl FnMut(ProgressInfo),
) -> PackReport {
    let started = Instant::now();
    let mut factory = BagFactory::new();
    let mut field = AabbField::new();

    progress(ProgressInfo::new(0.0, "Finding initial placements..."));
    let (mut placed, mut unplaced) = place_initial(
        trunk,
        &mut factory,
        requests,
        profile,
        &mut field,
        |rank, total, spec| {
            #[allow(clippy::cast_precision_loss)]
            let fraction = rank as f64 / total as f64 * 0.33;
            progress(ProgressInfo::new(
                fraction,
                format!(
                    "Placing bag {}/{} ({})...",
                    rank + 1,
                    total,
                    spec.kind_label()
                ),
            ));
        },
    );

    if placed.is_empty() {
        info!(
            requests = requests.len(),
            elapsed_s = started.elapsed().as_secs_f64(),
            "packing finished with no placements"
        );
        progress(ProgressInfo::new(1.0, "Packing completed"));
        return PackReport {
            placed: Vec::new(),
            unplaced,
            utilization: Utilization::default(),
            processing_time_seconds: started.elapsed().as_secs_f64(),
        };
    }

    progress(ProgressInfo::new(0.33, "Applying gravity..."));
    apply_gravity::<AabbField>(trunk, &mut placed);

    progress(ProgressInfo::new(0.55, "Compacting bags..."));
    compact_bags::<AabbField>(trunk, &mut placed);

    progress(ProgressInfo::new(0.75, "Filling gaps..."));
    fill_gaps::<AabbField>(
        trunk,
        &mut factory,
        requests,
        &mut placed,
        &mut unplaced,
        profile,
    );

    progress(ProgressInfo::new(0.90, "Micro-adjustments..."));
    micro_adjust::<AabbField>(trunk, &mut placed);

    progress(ProgressInfo::new(0.98, "Final gravity settling..."));
    apply_gravity::<AabbField>(trunk, &mut placed);

    let placed_report: Vec<PlacedBag> = placed.iter().map(PlacedBag::from_instance).collect();
    let utilization = Utilization::compute(trunk, &placed_report);
    let report = PackReport {
        placed: placed_report,
        unplaced,
        utilization,
        processing_time_seconds: started.elapsed().as_secs_f64(),
    };

    info!(
        placed = report.placed.len(),
        unplaced = report.unplaced.len(),
        volume_utilization = report.utilization.volume_utilization,
        elapsed_s = report.processing_time_seconds,
        "packing finished"
    );
    progress(ProgressInfo::new(1.0, "Packing completed"));
    report
}

// =============================================================================
// Tests
// =============================================================================
