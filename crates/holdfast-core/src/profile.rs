//! Tunable parameters for the placement search.

use serde::{Deserialize, Serialize};

/// Knobs for the initial placement scan.
///
/// The search walks a regular grid of candidate positions for each rotation
/// of each bag, so both fields trade solution quality against runtime. The
/// defaults reproduce the production configuration: a 5 cm grid with a hard
/// ceiling of 400 candidate positions per bag.
///
/// # Example
///
/// ```
/// use holdfast_core::SearchProfile;
///
/// let coarse = SearchProfile::new(0.10, 100);
/// assert!(coarse.grid_step > SearchProfile::default().grid_step);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchProfile {
    /// Spacing between candidate positions along each axis, in meters.
    pub grid_step: f64,
    /// Maximum number of candidate positions tried per bag.
    ///
    /// Every grid position drawn counts toward the ceiling, whether or
    /// not it survives the containment and collision checks.
    pub candidate_ceiling: usize,
}

impl SearchProfile {
    /// Creates a profile with explicit parameters.
    #[must_use]
    pub fn new(grid_step: f64, candidate_ceiling: usize) -> Self {
        Self {
            grid_step,
            candidate_ceiling,
        }
    }
}

impl Default for SearchProfile {
    fn default() -> Self {
        Self {
            grid_step: 0.05,
            candidate_ceiling: 400,
        }
    }
}
