//! Error types for the behavioral-geometry engine

use thiserror::Error;

/// Errors that can occur during computation.
///
/// Only contract and configuration violations surface here. Numerical
/// degeneracy (undersized hulls, 0/0 running means, empty envelopes) is
/// reported in-band as `NaN` and never aborts a computation.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Invalid trial table: {0}")]
    InvalidTrialTable(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Grouping label mismatch: {0}")]
    LabelMismatch(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}
