//! Pairwise overlap tracking between placed bags.
//!
//! Every placement phase asks the same two questions: "register this bag"
//! and "does this candidate hit anything already registered". The
//! [`CollisionField`] trait captures that seam; [`AabbField`] is the
//! production implementation.
//!
//! # Determinism
//!
//! [`AabbField`] stores boxes in a `BTreeMap` keyed by [`BagId`], so any
//! iteration over registered bags happens in request order regardless of
//! insertion history.

use std::collections::BTreeMap;
use std::fmt;

use hull::Bounds;
use serde::{Deserialize, Serialize};

/// Identifier for a bag within a single packing run.
///
/// The value is the bag's position in the request list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BagId(usize);

impl BagId {
    /// Creates an ID from a request-list index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the request-list index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bag_{}", self.0)
    }
}

/// Occupancy structure the placement phases test candidates against.
pub trait CollisionField {
    /// Registers a bag's bounds, replacing any previous entry for `id`.
    fn add(&mut self, id: BagId, bounds: Bounds);

    /// True if `candidate` overlaps any registered bag.
    fn collides(&self, candidate: &Bounds) -> bool;
}

/// Axis-aligned box field with strict overlap semantics.
///
/// Touching faces do not count as collisions, matching
/// [`Bounds::overlaps`]. This is what lets the search pack bags flush
/// against each other.
#[derive(Debug, Clone, Default)]
pub struct AabbField {
    boxes: BTreeMap<BagId, Bounds>,
}

impl AabbField {
    /// Creates an empty field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered bags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True if no bags are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl CollisionField for AabbField {
    fn add(&mut self, id: BagId, bounds: Bounds) {
        self.boxes.insert(id, bounds);
    }

    fn collides(&self, candidate: &Bounds) -> bool {
        self.boxes.values().any(|other| other.overlaps(candidate))
    }
}

// =============================================================================
// Tests
// =============================================================================
