//! Representational dissimilarity vectors
//!
//! Vectorizes pairwise trial dissimilarity for representational
//! similarity analysis: the upper triangle of the trial-by-trial
//! distance matrix, flattened row-major, so two subjects' geometries can
//! be correlated against neural pattern distances of the same length.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::table::DerivedTable;

/// Distance metric between two trials' feature vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    Euclidean,
    Manhattan,
    /// One minus the cosine similarity
    Cosine,
    /// Angle between the vectors, scaled into [0, 1]
    Angular,
}

impl Default for DistanceMetric {
    fn default() -> Self {
        DistanceMetric::Euclidean
    }
}

fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|y| y * y).sum::<f64>().sqrt();
    dot / (norm_a * norm_b)
}

impl DistanceMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Angular => "angular",
        }
    }

    /// Distance between two equal-length feature vectors. Non-finite
    /// components propagate into the result.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        match self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt(),
            DistanceMetric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Cosine => 1.0 - cosine_similarity(a, b),
            DistanceMetric::Angular => cosine_similarity(a, b).clamp(-1.0, 1.0).acos() / PI,
        }
    }
}

/// Length of the upper-triangle vector over `n` trials
pub fn rdv_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Pairwise dissimilarity over trial feature vectors, upper triangle in
/// row-major order: (0,1), (0,2), .., (0,n-1), (1,2), ..
pub fn pairwise_rdv(vectors: &[Vec<f64>], metric: DistanceMetric) -> Vec<f64> {
    let n = vectors.len();
    let mut out = Vec::with_capacity(rdv_len(n));
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(metric.distance(&vectors[i], &vectors[j]));
        }
    }
    out
}

/// Build an RDV over trials from named derived columns.
///
/// # Arguments
/// * `table` - a computed derived table
/// * `columns` - column names forming each trial's feature vector
/// * `metric` - distance metric between trial vectors
///
/// # Returns
/// Upper-triangle dissimilarity vector of length `n·(n-1)/2`
pub fn column_rdv(
    table: &DerivedTable,
    columns: &[&str],
    metric: DistanceMetric,
) -> Result<Vec<f64>, ComputeError> {
    if columns.is_empty() {
        return Err(ComputeError::InvalidConfiguration(
            "dissimilarity vectors need at least one column".to_string(),
        ));
    }
    let mut series: Vec<&[f64]> = Vec::with_capacity(columns.len());
    for &name in columns {
        let values = table
            .column(name)
            .ok_or_else(|| ComputeError::UnknownColumn(name.to_string()))?;
        series.push(values);
    }

    let vectors: Vec<Vec<f64>> = (0..table.n_trials())
        .map(|t| series.iter().map(|s| s[t]).collect())
        .collect();
    Ok(pairwise_rdv(&vectors, metric))
}
