//! Decision selection and weighting
//!
//! First stage of the pipeline: picks which choice enters each trial's
//! update and applies a temporal weight sequence to it. Both dimensions
//! are transformed independently and identically.

use crate::types::{DecisionPolicy, WeightPolicy};

/// Select the decision entering each trial's update.
///
/// `current` returns the input unchanged; `previous` shifts the sequence
/// forward by one position and fills the vacated leading slot with 0.
pub fn select_decisions(raw: &[f64], policy: DecisionPolicy) -> Vec<f64> {
    match policy {
        DecisionPolicy::Current => raw.to_vec(),
        DecisionPolicy::Previous => {
            let mut shifted = vec![0.0; raw.len()];
            if raw.len() > 1 {
                shifted[1..].copy_from_slice(&raw[..raw.len() - 1]);
            }
            shifted
        }
    }
}

/// Weight sequence for a trajectory of `n` trials.
///
/// Decay policies interpolate from 1 down to 1/n inclusive: linearly for
/// `linear_decay`, geometrically for `exponential_decay`. A single-trial
/// trajectory weighs exactly 1 under every policy.
pub fn decision_weights(n: usize, policy: WeightPolicy) -> Vec<f64> {
    match policy {
        WeightPolicy::Constant => vec![1.0; n],
        WeightPolicy::LinearDecay => linspace(1.0, 1.0 / n as f64, n),
        WeightPolicy::ExponentialDecay => geomspace(1.0, 1.0 / n as f64, n),
    }
}

/// Apply a weight sequence elementwise
pub fn apply_weights(decisions: &[f64], weights: &[f64]) -> Vec<f64> {
    debug_assert_eq!(decisions.len(), weights.len());
    decisions.iter().zip(weights).map(|(&d, &w)| d * w).collect()
}

/// Response presence per trial: whether the raw (unshifted) decision was
/// non-zero on this dimension
pub fn response_mask(raw: &[f64]) -> Vec<bool> {
    raw.iter().map(|&d| d != 0.0).collect()
}

/// Evenly spaced values from `start` to `stop` inclusive
fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![start];
    }
    let step = (stop - start) / (n - 1) as f64;
    let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
    values[n - 1] = stop;
    values
}

/// Geometrically spaced values from `start` to `stop` inclusive.
/// Both endpoints must be positive.
fn geomspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![start];
    }
    let log_step = (stop.ln() - start.ln()) / (n - 1) as f64;
    let mut values: Vec<f64> = (0..n)
        .map(|i| (start.ln() + log_step * i as f64).exp())
        .collect();
    values[0] = start;
    values[n - 1] = stop;
    values
}
