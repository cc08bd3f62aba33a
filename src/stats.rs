//! Running statistics over trial sequences
//!
//! Cumulative means in linear and circular flavors, plus the prefix-scan
//! combinator used to recompute whole-set measures at every trial index.

use std::f64::consts::TAU;

/// NaN-safe cumulative sum: NaN entries contribute zero but still occupy
/// a position in the output
pub fn nan_cumsum(values: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    values
        .iter()
        .map(|&v| {
            if !v.is_nan() {
                total += v;
            }
            total
        })
        .collect()
}

/// Running mean with every trial in the denominator.
///
/// Formula: `nan_cumsum(values)[i] / (i + 1)`
pub fn running_mean(values: &[f64]) -> Vec<f64> {
    nan_cumsum(values)
        .iter()
        .enumerate()
        .map(|(i, &sum)| sum / (i + 1) as f64)
        .collect()
}

/// Running mean counting only masked-in trials in the denominator.
///
/// Formula: `nan_cumsum(values)[i] / count(mask[..=i])`
///
/// Division keeps IEEE semantics: prefixes with no masked-in trials yield
/// NaN (0/0) or infinity, never a clamped value. A masked-out trial whose
/// value is zero leaves the mean unchanged, which is how non-responses
/// carry the previous mean forward.
pub fn running_mean_masked(values: &[f64], mask: &[bool]) -> Vec<f64> {
    debug_assert_eq!(values.len(), mask.len());
    let sums = nan_cumsum(values);
    let mut count = 0.0;
    sums.iter()
        .zip(mask)
        .map(|(&sum, &included)| {
            if included {
                count += 1.0;
            }
            sum / count
        })
        .collect()
}

/// Mean direction of a set of angles (radians), wrapped to [0, 2π).
///
/// Formula: `atan2(Σ sin(aᵢ), Σ cos(aᵢ)) mod 2π` over finite entries.
/// Returns NaN when no finite angle is present.
pub fn circular_mean(angles: &[f64]) -> f64 {
    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    let mut count = 0usize;
    for &a in angles {
        if a.is_finite() {
            sin_sum += a.sin();
            cos_sum += a.cos();
            count += 1;
        }
    }
    if count == 0 {
        return f64::NAN;
    }
    sin_sum.atan2(cos_sum).rem_euclid(TAU)
}

/// Running circular mean over a trial sequence.
///
/// Index 0 carries the first angle unchanged (no wrapping); every later
/// masked-in index recomputes the mean direction over the whole prefix.
/// Masked-out indices carry the previous value forward.
pub fn running_circular_mean(angles: &[f64], mask: &[bool]) -> Vec<f64> {
    debug_assert_eq!(angles.len(), mask.len());
    let mut means = vec![0.0; angles.len()];
    for i in 0..angles.len() {
        if mask[i] {
            means[i] = if i == 0 {
                angles[0]
            } else {
                circular_mean(&angles[..=i])
            };
        } else if i > 0 {
            means[i] = means[i - 1];
        }
    }
    means
}

/// Apply `f` to every growing prefix of `items`, collecting one result per
/// prefix. Prefix k (1-based) covers `items[..k]`.
pub fn prefix_scan<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    F: Fn(&[T]) -> R,
{
    (1..=items.len()).map(|end| f(&items[..end])).collect()
}
