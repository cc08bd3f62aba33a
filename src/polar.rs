//! Polar descriptors
//!
//! Re-expresses trajectory coordinates as angles and distances from two
//! fixed reference frames: a neutral frame anchored at the space origin
//! and a point-of-view frame anchored at the subject's own position.
//! Each frame is evaluated in 2D and in 3D, where the third axis counts
//! interactions within the grouping.

use crate::hull::Point3;
use crate::stats::{running_circular_mean, running_mean};
use crate::types::SPACE_BOUND;

/// Offset added to every power coordinate before conversion, so points
/// sitting exactly on a frame origin keep a defined angle
pub const POWER_JITTER: f64 = 0.005;

struct Frame {
    name: &'static str,
    origin: Point3,
    reference: Point3,
    directed: bool,
}

fn frames() -> [Frame; 2] {
    let b = SPACE_BOUND;
    [
        Frame {
            name: "neu",
            origin: Point3::new(0.0, 0.0, 0.0),
            reference: Point3::new(b, 0.0, 0.0),
            directed: false,
        },
        Frame {
            name: "pov",
            origin: Point3::new(b, 0.0, 0.0),
            reference: Point3::new(b, b, 0.0),
            directed: true,
        },
    ]
}

/// Planar angle between a point vector and the frame's reference vector.
/// Undirected frames report the separation in [0, π]; directed frames
/// report the counterclockwise angle from reference to point in (-π, π].
fn angle_2d(vx: f64, vy: f64, rx: f64, ry: f64, directed: bool) -> f64 {
    if directed {
        (rx * vy - ry * vx).atan2(rx * vx + ry * vy)
    } else {
        let cos = (vx * rx + vy * ry) / (vx.hypot(vy) * rx.hypot(ry));
        cos.clamp(-1.0, 1.0).acos()
    }
}

/// Spatial angle between a point vector and the frame's reference
/// vector, always unsigned.
///
/// Formula: `acos(v·r / (|v|·|r|))`, clamped into the domain of acos
fn angle_3d(v: Point3, r: Point3) -> f64 {
    let cos = v.dot(r) / (v.norm() * r.norm());
    cos.clamp(-1.0, 1.0).acos()
}

/// Derive the 16 polar columns of one grouping's trajectory.
///
/// # Arguments
/// * `affil_coords` - cumulative affiliation coordinates, in trial order
/// * `power_coords` - cumulative power coordinates, in trial order
///
/// # Returns
/// Named columns in frame-major order: for each of {neu, pov} and each
/// of {2d, 3d}, the angle, its running circular mean, the distance from
/// the frame origin, and its running linear mean.
pub fn polar_descriptors(
    affil_coords: &[f64],
    power_coords: &[f64],
) -> Vec<(String, Vec<f64>)> {
    let n = affil_coords.len();
    debug_assert_eq!(power_coords.len(), n);

    let points: Vec<Point3> = (0..n)
        .map(|i| Point3::new(affil_coords[i], power_coords[i] + POWER_JITTER, (i + 1) as f64))
        .collect();
    let all_answered = vec![true; n];

    let mut columns: Vec<(String, Vec<f64>)> = Vec::with_capacity(16);
    for frame in frames() {
        for n_dim in [2usize, 3] {
            let angles: Vec<f64> = points
                .iter()
                .map(|p| {
                    let v = p.sub(frame.origin);
                    let r = frame.reference.sub(frame.origin);
                    if n_dim == 2 {
                        angle_2d(v.x, v.y, r.x, r.y, frame.directed)
                    } else {
                        angle_3d(v, r)
                    }
                })
                .collect();
            let distances: Vec<f64> = points
                .iter()
                .map(|p| {
                    let v = p.sub(frame.origin);
                    if n_dim == 2 {
                        v.x.hypot(v.y)
                    } else {
                        v.norm()
                    }
                })
                .collect();
            let angle_mean = running_circular_mean(&angles, &all_answered);
            let dist_mean = running_mean(&distances);

            let prefix = format!("{}_{}d", frame.name, n_dim);
            columns.push((format!("{prefix}_angle"), angles));
            columns.push((format!("{prefix}_angle_mean"), angle_mean));
            columns.push((format!("{prefix}_dist"), distances));
            columns.push((format!("{prefix}_dist_mean"), dist_mean));
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn column<'a>(columns: &'a [(String, Vec<f64>)], name: &str) -> &'a [f64] {
        &columns
            .iter()
            .find(|(n, _)| n == name)
            .unwrap_or_else(|| panic!("missing column {name}"))
            .1
    }

    #[test]
    fn test_column_names_and_order() {
        let cols = polar_descriptors(&[1.0], &[1.0]);
        let names: Vec<&str> = cols.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "neu_2d_angle",
                "neu_2d_angle_mean",
                "neu_2d_dist",
                "neu_2d_dist_mean",
                "neu_3d_angle",
                "neu_3d_angle_mean",
                "neu_3d_dist",
                "neu_3d_dist_mean",
                "pov_2d_angle",
                "pov_2d_angle_mean",
                "pov_2d_dist",
                "pov_2d_dist_mean",
                "pov_3d_angle",
                "pov_3d_angle_mean",
                "pov_3d_dist",
                "pov_3d_dist_mean",
            ]
        );
    }

    #[test]
    fn test_neutral_angle_is_undirected() {
        // one point above the reference axis, one below, same separation
        let above = polar_descriptors(&[1.0], &[1.0 - POWER_JITTER]);
        let below = polar_descriptors(&[1.0], &[-1.0 - POWER_JITTER]);
        let a = column(&above, "neu_2d_angle")[0];
        let b = column(&below, "neu_2d_angle")[0];
        assert!((a - FRAC_PI_4).abs() < 1e-12);
        assert!((b - FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_pov_angle_is_signed() {
        // pov reference points straight up from (6, 0)
        let toward_origin = polar_descriptors(&[0.0], &[-POWER_JITTER]);
        let a = column(&toward_origin, "pov_2d_angle")[0];
        assert!((a - FRAC_PI_2).abs() < 1e-12);

        let other_side = polar_descriptors(&[12.0], &[-POWER_JITTER]);
        let b = column(&other_side, "pov_2d_angle")[0];
        assert!((b + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_distances_from_both_origins() {
        let cols = polar_descriptors(&[3.0], &[4.0 - POWER_JITTER]);
        assert!((column(&cols, "neu_2d_dist")[0] - 5.0).abs() < 1e-12);
        let expected_pov = (9.0f64 + 16.0).sqrt();
        assert!((column(&cols, "pov_2d_dist")[0] - expected_pov).abs() < 1e-12);
    }

    #[test]
    fn test_3d_distance_includes_interaction_axis() {
        let cols = polar_descriptors(&[0.0, 0.0], &[-POWER_JITTER, -POWER_JITTER]);
        // second trial sits at z = 2
        assert!((column(&cols, "neu_3d_dist")[1] - 2.0).abs() < 1e-12);
        assert_eq!(column(&cols, "neu_2d_dist")[1], 0.0);
    }

    #[test]
    fn test_3d_angle_is_unsigned() {
        let cols = polar_descriptors(&[1.0, 1.0], &[-1.0 - POWER_JITTER, 1.0 - POWER_JITTER]);
        let angles = column(&cols, "neu_3d_angle");
        for &a in angles {
            assert!((0.0..=PI).contains(&a));
        }
    }

    #[test]
    fn test_angle_mean_starts_at_first_angle() {
        let cols = polar_descriptors(&[1.0, 0.0], &[1.0, 1.0]);
        let angles = column(&cols, "neu_2d_angle");
        let means = column(&cols, "neu_2d_angle_mean");
        assert_eq!(means[0], angles[0]);
    }

    #[test]
    fn test_dist_mean_is_cumulative_average() {
        let cols = polar_descriptors(&[3.0, 3.0], &[4.0 - POWER_JITTER, 4.0 - POWER_JITTER]);
        let means = column(&cols, "neu_2d_dist_mean");
        assert!((means[1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_point_on_neutral_origin() {
        // jitter cancelled out exactly: zero-length point vector
        let cols = polar_descriptors(&[0.0], &[-POWER_JITTER]);
        assert!(column(&cols, "neu_2d_angle")[0].is_nan());
        assert_eq!(column(&cols, "neu_2d_dist")[0], 0.0);
    }
}
