//! Bag catalog, request specs, and rotation enumeration.
//!
//! Catalog dimensions are the lower bound of each published size range,
//! recorded in centimeters (length, breadth, thickness) and converted to
//! meters when box extents are built. Custom bags carry caller-supplied
//! centimeter dimensions instead.
//!
//! # Determinism
//!
//! Rotation enumeration visits axis permutations in a fixed order and keeps
//! the first occurrence of each distinct shape, so the candidate order seen
//! by the placement search is identical across runs and platforms.

use std::collections::BTreeMap;

use glam::DVec3;
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog Enums
// =============================================================================

/// Product family of a catalog bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BagKind {
    /// Fabric-shelled rolling luggage.
    SoftRolling,
    /// Hard-shelled rolling luggage.
    HardRolling,
    /// Backpacks.
    Backpack,
    /// Duffle bags.
    Duffle,
    /// Woven shopping bags.
    IndianShopping,
}

impl BagKind {
    /// Every catalog kind, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::SoftRolling,
        Self::HardRolling,
        Self::Backpack,
        Self::Duffle,
        Self::IndianShopping,
    ];

    /// Display label, matching the catalog wording exactly.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SoftRolling => "Soft Rolling Bag",
            Self::HardRolling => "Hard Rolling Bag",
            Self::Backpack => "Backpack Bag",
            Self::Duffle => "Duffle bag",
            Self::IndianShopping => "Indian Shopping bag",
        }
    }

    /// Parses a display label back into a kind.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

/// Size tier of a catalog bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BagSize {
    /// Smallest tier.
    Small,
    /// Middle tier.
    Medium,
    /// Largest tier.
    Large,
}

impl BagSize {
    /// Every size tier, smallest first.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Display label, matching the catalog wording exactly.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "SMALL",
            Self::Medium => "MEDIUM",
            Self::Large => "LARGE",
        }
    }

    /// Parses a display label back into a size tier.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.label() == label)
    }
}

// =============================================================================
// Bag Specs
// =============================================================================

/// A single requested bag, either from the catalog or with custom dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BagSpec {
    /// A standard bag from the published catalog.
    Catalog {
        /// Product family.
        kind: BagKind,
        /// Size tier.
        size: BagSize,
    },
    /// An arbitrary box with caller-supplied dimensions in centimeters.
    Custom {
        /// Length in centimeters.
        length_cm: f64,
        /// Breadth in centimeters.
        breadth_cm: f64,
        /// Thickness in centimeters.
        thickness_cm: f64,
    },
}

impl BagSpec {
    /// Creates a catalog bag spec.
    #[must_use]
    pub const fn catalog(kind: BagKind, size: BagSize) -> Self {
        Self::Catalog { kind, size }
    }

    /// Creates a custom bag spec from centimeter dimensions.
    #[must_use]
    pub const fn custom(length_cm: f64, breadth_cm: f64, thickness_cm: f64) -> Self {
        Self::Custom {
            length_cm,
            breadth_cm,
            thickness_cm,
        }
    }

    /// Display label for the bag's kind.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Catalog { kind, .. } => kind.label(),
            Self::Custom { .. } => "Custom",
        }
    }

    /// Display label for the bag's size.
    ///
    /// Catalog bags use their tier label; custom bags report their
    /// dimensions rounded to whole centimeters.
    #[must_use]
    pub fn size_label(&self) -> String {
        match *self {
            Self::Catalog { size, .. } => size.label().to_owned(),
            Self::Custom {
                length_cm,
                breadth_cm,
                thickness_cm,
            } => format!("{length_cm:.0}\u{d7}{breadth_cm:.0}\u{d7}{thickness_cm:.0}cm"),
        }
    }
}

// =============================================================================
// Bag Factory
// =============================================================================

/// Builds canonical box extents for bag specs, memoizing catalog entries.
#[derive(Debug, Default)]
pub struct BagFactory {
    cache: BTreeMap<(BagKind, BagSize), DVec3>,
}

impl BagFactory {
    /// Creates an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical box extents for a spec, in meters.
    ///
    /// The returned vector is the bag in its base orientation (length,
    /// breadth, thickness); use [`unique_rotations`] to enumerate the
    /// axis-aligned alternatives.
    pub fn extents_m(&mut self, spec: &BagSpec) -> DVec3 {
        match *spec {
            BagSpec::Catalog { kind, size } => *self
                .cache
                .entry((kind, size))
                .or_insert_with(|| catalog_dims_cm(kind, size) / 100.0),
            BagSpec::Custom {
                length_cm,
                breadth_cm,
                thickness_cm,
            } => DVec3::new(length_cm, breadth_cm, thickness_cm) / 100.0,
        }
    }
}

/// Catalog dimensions in centimeters: (length, breadth, thickness).
fn catalog_dims_cm(kind: BagKind, size: BagSize) -> DVec3 {
    let (l, b, t) = match (kind, size) {
        (BagKind::SoftRolling, BagSize::Small) => (53.5, 31.6, 20.0),
        (BagKind::SoftRolling, BagSize::Medium) => (65.5, 40.6, 26.0),
        (BagKind::SoftRolling, BagSize::Large) => (77.5, 46.6, 32.0),
        (BagKind::HardRolling, BagSize::Small) => (50.0, 34.5, 20.0),
        (BagKind::HardRolling, BagSize::Medium) => (65.0, 43.5, 26.0),
        (BagKind::HardRolling, BagSize::Large) => (77.0, 52.5, 32.0),
        (BagKind::Backpack, BagSize::Small) => (42.0, 29.0, 15.0),
        (BagKind::Backpack, BagSize::Medium) => (44.0, 31.0, 20.0),
        (BagKind::Backpack, BagSize::Large) => (52.0, 31.0, 25.0),
        (BagKind::Duffle, BagSize::Small) => (26.45, 45.5, 24.75),
        (BagKind::Duffle, BagSize::Medium) => (30.0, 56.0, 28.0),
        (BagKind::Duffle, BagSize::Large) => (66.0, 35.0, 35.0),
        (BagKind::IndianShopping, BagSize::Small) => (15.0, 15.0, 15.0),
        (BagKind::IndianShopping, BagSize::Medium) => (34.0, 18.0, 9.0),
        (BagKind::IndianShopping, BagSize::Large) => (38.0, 18.0, 9.0),
    };
    DVec3::new(l, b, t)
}

// =============================================================================
// Rotations
// =============================================================================

/// Axis permutations in enumeration order.
const PERMS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Enumerates the distinct axis-aligned orientations of a box.
///
/// Returns between one (cube) and six (all extents distinct) orientations.
/// The base orientation always comes first, and near-equal extents are
/// merged at micrometer resolution so float noise cannot split a shape
/// into spurious duplicates.
#[must_use]
pub fn unique_rotations(extents: DVec3) -> Vec<DVec3> {
    if (extents.x - extents.y).abs() < 1e-6 && (extents.y - extents.z).abs() < 1e-6 {
        return vec![extents];
    }

    let dims = [extents.x, extents.y, extents.z];
    let mut seen: Vec<[i64; 3]> = Vec::with_capacity(6);
    let mut rotations = Vec::with_capacity(6);
    for perm in PERMS {
        let candidate = DVec3::new(dims[perm[0]], dims[perm[1]], dims[perm[2]]);
        let key = [
            (candidate.x * 1e6).round() as i64,
            (candidate.y * 1e6).round() as i64,
            (candidate.z * 1e6).round() as i64,
        ];
        if !seen.contains(&key) {
            seen.push(key);
            rotations.push(candidate);
        }
    }
    rotations
}

// =============================================================================
// Tests
// =============================================================================
