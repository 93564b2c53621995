//! # Holdfast Core
//!
//! Deterministic trunk packing engine for Holdfast.
//!
//! This crate packs axis-aligned bag boxes into an arbitrary trunk mesh,
//! implementing the search-then-refine pipeline behind the booking flow.
//!
//! ## Architecture
//!
//! - **Trunk**: normalized cargo space geometry with containment queries
//! - **Search**: greedy grid placement, largest bags first
//! - **Refinement**: gravity, compaction, gap filling, micro-adjustment
//! - **Report**: placements, rejections, and utilization metrics
//!
//! ## Usage
//!
//! ```rust
//! use holdfast_core::{pack, BagSpec, SearchProfile, Trunk};
//! use hull::{Bounds, TriMesh};
//!
//! let trunk = Trunk::new(TriMesh::cuboid(Bounds::from_min_max(
//!     glam::DVec3::ZERO,
//!     glam::DVec3::new(1.2, 0.9, 0.6),
//! )));
//! let requests = vec![BagSpec::custom(40.0, 30.0, 20.0)];
//! let report = pack(&trunk, &requests, &SearchProfile::default());
//! assert_eq!(report.placed.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export hull for mesh and bounds types
pub use hull;

// Core modules
pub mod catalog;
pub mod collision;
pub mod containment;
pub mod error;
pub mod pipeline;
pub mod profile;
pub mod refine;
pub mod report;
pub mod search;
pub mod trunk;

pub use catalog::{unique_rotations, BagFactory, BagKind, BagSize, BagSpec};
pub use collision::{AabbField, BagId, CollisionField};
pub use containment::{clamp_into, fits, FIT_TOL, VOXEL_PITCH};
pub use error::PackError;
pub use pipeline::{pack, pack_with_progress, ProgressInfo};
pub use profile::SearchProfile;
pub use report::{scene_mesh, PackReport, PlacedBag, UnplacedBag, Utilization};
pub use search::{place_initial, BagInstance};
pub use trunk::{Trunk, WALL_MARGIN};

#[cfg(test)]
mod tests;
