//! Error types for the packing engine.

use thiserror::Error;

/// Errors produced while preparing a packing run.
///
/// Packing itself never fails: once a trunk is loaded, every requested bag
/// either receives a placement or is reported as unplaced with a reason.
/// Errors are therefore confined to geometry ingestion.
#[derive(Debug, Error)]
pub enum PackError {
    /// The trunk mesh could not be parsed or normalized.
    #[error(transparent)]
    Mesh(#[from] hull::MeshError),
}
