//! Packing run outputs: placements, rejections, and utilization metrics.

use glam::DVec3;
use hull::{Bounds, TriMesh};
use serde::{Deserialize, Serialize};

use crate::catalog::BagSpec;
use crate::search::BagInstance;
use crate::trunk::Trunk;

// =============================================================================
// Report Types
// =============================================================================

/// A successfully placed bag, in final settle order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBag {
    /// Index of the request that produced this bag.
    pub original_idx: usize,
    /// Kind label, e.g. `"Duffle bag"` or `"Custom"`.
    pub kind: String,
    /// Size label, e.g. `"MEDIUM"`, or the dimensions for custom bags.
    pub size: String,
    /// Final world-space bounds.
    pub bounds: Bounds,
}

impl PlacedBag {
    pub(crate) fn from_instance(instance: &BagInstance) -> Self {
        Self {
            original_idx: instance.original_idx,
            kind: instance.spec.kind_label().to_owned(),
            size: instance.spec.size_label(),
            bounds: instance.bounds,
        }
    }
}

/// A bag no phase could place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnplacedBag {
    /// Index of the request that produced this bag.
    pub original_idx: usize,
    /// Combined kind and size label, e.g. `"Backpack Bag (SMALL)"`.
    pub label: String,
    /// Base dimensions formatted in centimeters, e.g. `"42.0x29.0x15.0"`.
    pub dimensions_cm: String,
    /// Why the bag was rejected.
    pub reason: String,
}

impl UnplacedBag {
    pub(crate) fn for_request(original_idx: usize, spec: &BagSpec, extents_m: DVec3) -> Self {
        let dims = extents_m * 100.0;
        Self {
            original_idx,
            label: format!("{} ({})", spec.kind_label(), spec.size_label()),
            dimensions_cm: format!("{:.1}x{:.1}x{:.1}", dims.x, dims.y, dims.z),
            reason: "No suitable position found".to_owned(),
        }
    }
}

// =============================================================================
// Utilization
// =============================================================================

/// How well a packing run used the available space, in percent.
///
/// All three metrics are clamped to `[0, 100]` and are zero when nothing
/// was placed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Utilization {
    /// Placed volume over trunk capacity.
    pub volume_utilization: f64,
    /// Bounding box of all placements over the trunk's bounding box.
    pub space_utilization_bbox: f64,
    /// Placed volume over the bounding box of all placements.
    pub packing_efficiency_bbox: f64,
}

impl Utilization {
    /// Computes the metrics for a finished run.
    ///
    /// Trunk capacity comes from [`Trunk::capacity_volume`], so open or
    /// degenerate meshes still yield sensible percentages.
    #[must_use]
    pub fn compute(trunk: &Trunk, placed: &[PlacedBag]) -> Self {
        if placed.is_empty() {
            return Self::default();
        }
        let capacity = trunk.capacity_volume();
        let placed_volume: f64 = placed.iter().map(|bag| bag.bounds.volume()).sum();

        let envelope = placed
            .iter()
            .skip(1)
            .fold(placed[0].bounds, |acc, bag| acc.union(&bag.bounds));
        let envelope_volume = envelope.volume();
        let trunk_bbox_volume = trunk.bounds().volume();

        let percent = |part: f64, whole: f64| {
            if whole > 0.0 {
                (part / whole * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            }
        };
        Self {
            volume_utilization: percent(placed_volume, capacity),
            space_utilization_bbox: percent(envelope_volume, trunk_bbox_volume),
            packing_efficiency_bbox: percent(placed_volume, envelope_volume),
        }
    }
}

// =============================================================================
// Pack Report
// =============================================================================

/// Everything a packing run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackReport {
    /// Placed bags, in final settle order.
    pub placed: Vec<PlacedBag>,
    /// Bags no phase could place, in placement-attempt order.
    pub unplaced: Vec<UnplacedBag>,
    /// Space usage metrics for the run.
    pub utilization: Utilization,
    /// Wall-clock duration of the run, in seconds.
    pub processing_time_seconds: f64,
}

/// Builds a single mesh of the trunk plus one box per placed bag,
/// suitable for STL export.
#[must_use]
pub fn scene_mesh(trunk: &Trunk, placed: &[PlacedBag]) -> TriMesh {
    let mut scene = trunk.mesh().clone();
    for bag in placed {
        scene.append(&TriMesh::cuboid(bag.bounds));
    }
    scene
}

// =============================================================================
// Tests
// =============================================================================
