//! Behavioral-geometry compute engine for social navigation decision data
//!
//! Transforms a subject's per-trial decision log into derived geometric
//! features through a deterministic pipeline: decision selection and
//! weighting → cumulative trajectories per character → polar descriptors
//! → consistency scoring → shape metrics → dissimilarity vectors.
//!
//! ## Modules
//!
//! - **Pipeline**: Run the full engine over a validated trial table
//! - **RDV**: Vectorize pairwise trial dissimilarity for representational
//!   similarity analysis

pub mod consistency;
pub mod decisions;
pub mod error;
pub mod hull;
pub mod pipeline;
pub mod polar;
pub mod rdv;
pub mod shape;
pub mod stats;
pub mod table;
pub mod trajectory;
pub mod types;

pub use error::ComputeError;
pub use pipeline::{compute_behavior, compute_behavior_grid, ComputeOutput, GeometryProcessor};
pub use rdv::{column_rdv, pairwise_rdv, rdv_len, DistanceMetric};
pub use table::{DerivedColumn, DerivedTable, TaskColumns};
pub use types::{
    ButtonPress, ConfigGrid, Configuration, CoordPolicy, DecisionPolicy, Dimension, GroupBy,
    TrialRecord, TrialTable, DECISION_TRIALS,
};

/// Engine version recorded by downstream analysis pipelines
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
