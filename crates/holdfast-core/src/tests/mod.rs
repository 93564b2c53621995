//! Test module for packing scenarios and determinism checks.
//!
//! This module holds the cross-phase suites that exercise the whole
//! pipeline rather than a single pass:
//! - **Scenario tests**: Full runs against realistic bookings
//! - **Determinism tests**: Verify identical inputs produce identical reports
//! - **Helper functions**: Trunk and request factories
//!
//! # Test Structure
//!
//! - `scenarios.rs`: End-to-end runs checking the packing guarantees
//! - `determinism.rs`: Repeat-run reproducibility
//! - `helpers.rs`: Shared factories and assertions

mod determinism;
mod helpers;

// Re-export for convenience
pub use helpers::*;
