//! Decision consistency scoring
//!
//! Scores how internally consistent a subject's choices are by
//! simulating the two extremes their response pattern allows: a
//! perfectly consistent run (every answer pushes the same way) and a
//! perfectly inconsistent one (answers alternate). The actual running
//! mean is then min-max scaled inside that simulated envelope, per
//! dimension and for the combined decision vector.

use crate::stats::nan_cumsum;

/// Simulated extremes for one dimension's weighted decision series.
///
/// # Returns
/// `(consistent, inconsistent)`: the consistent series keeps every
/// answered trial's weight magnitude positive; the inconsistent series
/// alternates the sign across answered trials, starting positive.
/// Unanswered trials stay zero in both.
pub fn simulate_envelope(weighted: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let consistent: Vec<f64> = weighted.iter().map(|w| w.abs()).collect();
    let mut inconsistent = vec![0.0; weighted.len()];
    let mut answered = 0usize;
    for (i, &magnitude) in consistent.iter().enumerate() {
        if magnitude != 0.0 {
            inconsistent[i] = if answered % 2 == 0 {
                magnitude
            } else {
                -magnitude
            };
            answered += 1;
        }
    }
    (consistent, inconsistent)
}

/// Cumulative series normalized by the cumulative response mass
fn mass_normalized(values: &[f64], mass: &[f64]) -> Vec<f64> {
    nan_cumsum(values)
        .iter()
        .zip(nan_cumsum(mass))
        .map(|(&v, m)| v / m)
        .collect()
}

/// Derive the 3 consistency columns of one grouping's trajectory.
///
/// # Arguments
/// * `affil_weighted` - weighted affiliation decisions, in trial order
/// * `power_weighted` - weighted power decisions, in trial order
///
/// # Returns
/// Named columns `affil_consistency`, `power_consistency`, and the
/// combined `consistency`. Per-dimension values scale the absolute
/// running mean between the simulated minimum and maximum; the combined
/// value scales the length of the mean decision vector between the
/// lengths of the simulated extremes. A dimension's first answered
/// trial has a collapsed envelope and reports NaN, as do all trials
/// before the first answer.
pub fn consistency_columns(
    affil_weighted: &[f64],
    power_weighted: &[f64],
) -> Vec<(String, Vec<f64>)> {
    let n = affil_weighted.len();
    debug_assert_eq!(power_weighted.len(), n);

    let mut per_dim: Vec<Vec<f64>> = Vec::with_capacity(2);
    let mut mins: Vec<Vec<f64>> = Vec::with_capacity(2);
    let mut maxs: Vec<Vec<f64>> = Vec::with_capacity(2);
    let mut means: Vec<Vec<f64>> = Vec::with_capacity(2);

    for weighted in [affil_weighted, power_weighted] {
        let (consistent, inconsistent) = simulate_envelope(weighted);
        let mass = &consistent;
        let min = mass_normalized(&inconsistent, mass);
        let max = mass_normalized(&consistent, mass);
        let mean = mass_normalized(weighted, mass);

        let scaled = (0..n)
            .map(|i| (mean[i].abs() - min[i]) / (max[i] - min[i]))
            .collect();
        per_dim.push(scaled);
        mins.push(min);
        maxs.push(max);
        means.push(mean);
    }

    let row_norm = |series: &[Vec<f64>], i: usize| series[0][i].hypot(series[1][i]);
    let combined: Vec<f64> = (0..n)
        .map(|i| {
            let min_r = row_norm(&mins, i);
            let max_r = row_norm(&maxs, i);
            (row_norm(&means, i) - min_r) / (max_r - min_r)
        })
        .collect();

    let mut columns = per_dim.into_iter();
    vec![
        ("affil_consistency".to_string(), columns.next().unwrap_or_default()),
        ("power_consistency".to_string(), columns.next().unwrap_or_default()),
        ("consistency".to_string(), combined),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column<'a>(columns: &'a [(String, Vec<f64>)], name: &str) -> &'a [f64] {
        &columns
            .iter()
            .find(|(n, _)| n == name)
            .unwrap_or_else(|| panic!("missing column {name}"))
            .1
    }

    #[test]
    fn test_envelope_alternates_over_answered_trials() {
        let (consistent, inconsistent) = simulate_envelope(&[0.5, 0.0, -0.25, 1.0]);
        assert_eq!(consistent, vec![0.5, 0.0, 0.25, 1.0]);
        assert_eq!(inconsistent, vec![0.5, 0.0, -0.25, 1.0]);
    }

    #[test]
    fn test_all_same_direction_scores_one() {
        let cols = consistency_columns(&[1.0, 0.0, 1.0, 1.0], &[0.0, -1.0, 0.0, 0.0]);
        let affil = column(&cols, "affil_consistency");
        assert!(affil[0].is_nan());
        assert!(affil[1].is_nan());
        assert!((affil[2] - 1.0).abs() < 1e-12);
        assert!((affil[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_alternating_scores_zero() {
        let cols = consistency_columns(&[1.0, -1.0, 1.0, -1.0], &[0.0; 4]);
        let affil = column(&cols, "affil_consistency");
        assert!(affil[0].is_nan());
        for &v in &affil[1..] {
            assert!(v.abs() < 1e-12);
        }
    }

    #[test]
    fn test_unanswered_dimension_is_nan() {
        let cols = consistency_columns(&[1.0, 1.0, 1.0], &[0.0; 3]);
        for &v in column(&cols, "power_consistency") {
            assert!(v.is_nan());
        }
    }

    #[test]
    fn test_combined_needs_both_dimensions() {
        let cols = consistency_columns(&[1.0, 0.0, 1.0], &[0.0, 1.0, 0.0]);
        let combined = column(&cols, "consistency");
        // envelope collapsed while each dimension has a single answer
        assert!(combined[0].is_nan());
        assert!(combined[1].is_nan());
        assert!((combined[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let affil = [1.0, 0.0, -1.0, 1.0, 1.0, 0.0, -1.0];
        let power = [0.0, 1.0, 0.0, 0.0, 0.0, -1.0, 0.0];
        let cols = consistency_columns(&affil, &power);
        for (_, values) in &cols {
            for &v in values {
                if v.is_finite() {
                    assert!((-1e-12..=1.0 + 1e-12).contains(&v));
                }
            }
        }
    }

    #[test]
    fn test_fractional_weights_shape_the_envelope() {
        // decayed weights: same choices, shrinking influence
        let cols = consistency_columns(&[1.0, 0.75, 0.5], &[0.0; 3]);
        let affil = column(&cols, "affil_consistency");
        assert!(affil[0].is_nan());
        assert!((affil[1] - 1.0).abs() < 1e-12);
        assert!((affil[2] - 1.0).abs() < 1e-12);
    }
}
