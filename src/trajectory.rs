//! Cartesian trajectory construction
//!
//! Builds the per-trial cumulative position of a subject in the 2D
//! behavior space, one grouping at a time: weighted decisions, running
//! coordinates, response-masked running means, and the centroid of the
//! coordinate cloud seen so far.

use crate::decisions::{apply_weights, decision_weights, response_mask, select_decisions};
use crate::hull::{hull_centroid, Point2};
use crate::stats::{nan_cumsum, prefix_scan, running_mean_masked};
use crate::types::{Configuration, CoordPolicy};
use serde::Serialize;

/// Cartesian state of one trial within its grouping
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrajectoryPoint {
    /// Position of the trial in the overall task sequence (0-based)
    pub trial_index: usize,
    /// Whether the subject made a choice on this trial
    pub responded: bool,
    /// Weighted affiliation decision
    pub affil_decision: f64,
    /// Weighted power decision
    pub power_decision: f64,
    /// Cumulative affiliation coordinate
    pub affil_coord: f64,
    /// Cumulative power coordinate
    pub power_coord: f64,
    /// Response-masked running mean of the weighted affiliation decisions
    pub affil_mean: f64,
    /// Response-masked running mean of the weighted power decisions
    pub power_mean: f64,
    /// Affiliation component of the centroid of all coordinates so far
    pub affil_centroid: f64,
    /// Power component of the centroid of all coordinates so far
    pub power_centroid: f64,
}

/// Cumulative coordinates from a weighted decision series.
///
/// Actual coordinates accumulate the decisions as made. Counterfactual
/// coordinates show where the trajectory would sit had the current
/// decision gone the other way, at every step:
///
/// Formula: `actual[i] = Σ w[0..=i]`, `counterfactual[i] = actual[i] - 2·w[i]`
pub fn cumulative_coords(weighted: &[f64], policy: CoordPolicy) -> Vec<f64> {
    let cumsum = nan_cumsum(weighted);
    match policy {
        CoordPolicy::Actual => cumsum,
        CoordPolicy::Counterfactual => cumsum
            .iter()
            .zip(weighted)
            .map(|(&c, &w)| c - 2.0 * w)
            .collect(),
    }
}

/// Center a coordinate series on its own mean
fn demean(values: &[f64]) -> Vec<f64> {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| v - mean).collect()
}

/// Build the trajectory of one grouping under a configuration.
///
/// # Arguments
/// * `trial_indices` - positions of the grouping's trials in the task
/// * `raw_affil` - unweighted affiliation decisions, in trial order
/// * `raw_power` - unweighted power decisions, in trial order
/// * `config` - decision, weight, and coordinate policies to apply
///
/// # Returns
/// One `TrajectoryPoint` per trial, in the given order. Response masks
/// always come from the raw decisions, so the previous-decision policy
/// shifts what accumulates without changing which trials count as
/// answered. Centroids need at least 3 coordinates and are NaN before
/// that.
pub fn build_trajectory(
    trial_indices: &[usize],
    raw_affil: &[f64],
    raw_power: &[f64],
    config: &Configuration,
) -> Vec<TrajectoryPoint> {
    let n = raw_affil.len();
    debug_assert_eq!(trial_indices.len(), n);
    debug_assert_eq!(raw_power.len(), n);

    let affil_mask = response_mask(raw_affil);
    let power_mask = response_mask(raw_power);

    let weights = decision_weights(n, config.weight);
    let affil_weighted = apply_weights(&select_decisions(raw_affil, config.decision), &weights);
    let power_weighted = apply_weights(&select_decisions(raw_power, config.decision), &weights);

    let mut affil_coords = cumulative_coords(&affil_weighted, config.coord);
    let mut power_coords = cumulative_coords(&power_weighted, config.coord);
    if config.demean_coords {
        affil_coords = demean(&affil_coords);
        power_coords = demean(&power_coords);
    }

    let affil_mean = running_mean_masked(&affil_weighted, &affil_mask);
    let power_mean = running_mean_masked(&power_weighted, &power_mask);

    let points: Vec<Point2> = affil_coords
        .iter()
        .zip(&power_coords)
        .map(|(&a, &p)| Point2::new(a, p))
        .collect();
    let centroids = prefix_scan(&points, hull_centroid);

    (0..n)
        .map(|i| {
            let centroid = centroids[i].unwrap_or(Point2::new(f64::NAN, f64::NAN));
            TrajectoryPoint {
                trial_index: trial_indices[i],
                responded: affil_mask[i] || power_mask[i],
                affil_decision: affil_weighted[i],
                power_decision: power_weighted[i],
                affil_coord: affil_coords[i],
                power_coord: power_coords[i],
                affil_mean: affil_mean[i],
                power_mean: power_mean[i],
                affil_centroid: centroid.x,
                power_centroid: centroid.y,
            }
        })
        .collect()
}
