//! Shape metrics over the merged trajectory
//!
//! Describes the footprint of the full coordinate cloud as it grows
//! trial by trial: convex-hull size in 2D (with and without the
//! subject's own position included), overlap with the four quadrants of
//! the task space, and hull size in 3D with the interaction counter as
//! the third axis. Each metric is recomputed over every prefix of the
//! trajectory, so early trials with too little spatial extent report
//! NaN.

use crate::hull::{hull_size_2d, hull_size_3d, quadrant_overlap, Point2, Point3};
use crate::stats::prefix_scan;
use crate::types::SPACE_BOUND;

fn sizes_to_columns(sizes: &[Option<(f64, f64)>]) -> (Vec<f64>, Vec<f64>) {
    let first = sizes.iter().map(|s| s.map_or(f64::NAN, |(a, _)| a)).collect();
    let second = sizes.iter().map(|s| s.map_or(f64::NAN, |(_, b)| b)).collect();
    (first, second)
}

/// Derive the 10 shape columns of the merged trajectory.
///
/// # Arguments
/// * `affil_coords` - affiliation coordinates in task order
/// * `power_coords` - power coordinates in task order
/// * `char_decisions` - per-trial interaction counter, the 3D z axis
///
/// # Returns
/// Named columns: 2D hull perimeter and area, the same pair with the
/// point-of-view position prepended to every prefix, the hull's overlap
/// fraction with quadrants Q1..Q4, and 3D hull surface area and volume.
pub fn shape_columns(
    affil_coords: &[f64],
    power_coords: &[f64],
    char_decisions: &[f64],
) -> Vec<(String, Vec<f64>)> {
    let n = affil_coords.len();
    debug_assert_eq!(power_coords.len(), n);
    debug_assert_eq!(char_decisions.len(), n);

    let points: Vec<Point2> = (0..n)
        .map(|i| Point2::new(affil_coords[i], power_coords[i]))
        .collect();

    let sizes = prefix_scan(&points, hull_size_2d);
    let (perimeter, area) = sizes_to_columns(&sizes);

    // the pov variant anchors every prefix at the subject's own corner
    let mut pov_points = Vec::with_capacity(n + 1);
    pov_points.push(Point2::new(SPACE_BOUND, 0.0));
    pov_points.extend_from_slice(&points);
    let pov_sizes = prefix_scan(&pov_points, hull_size_2d);
    let (pov_perimeter, pov_area) = sizes_to_columns(&pov_sizes[1..]);

    let overlaps = prefix_scan(&points, quadrant_overlap);
    let overlap_column = |q: usize| -> Vec<f64> {
        overlaps
            .iter()
            .map(|o| o.map_or(f64::NAN, |fractions| fractions[q]))
            .collect()
    };

    let points_3d: Vec<Point3> = (0..n)
        .map(|i| Point3::new(affil_coords[i], power_coords[i], char_decisions[i]))
        .collect();
    let sizes_3d = prefix_scan(&points_3d, hull_size_3d);
    let (surface_area, volume) = sizes_to_columns(&sizes_3d);

    vec![
        ("perimeter".to_string(), perimeter),
        ("area".to_string(), area),
        ("pov_perimeter".to_string(), pov_perimeter),
        ("pov_area".to_string(), pov_area),
        ("Q1_overlap".to_string(), overlap_column(0)),
        ("Q2_overlap".to_string(), overlap_column(1)),
        ("Q3_overlap".to_string(), overlap_column(2)),
        ("Q4_overlap".to_string(), overlap_column(3)),
        ("surface_area".to_string(), surface_area),
        ("volume".to_string(), volume),
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

    fn sample() -> Vec<(String, Vec<f64>)> {
        shape_columns(
            &[1.0, 3.0, 2.0, 2.0],
            &[1.0, 1.0, 2.0, 0.0],
            &[1.0, 2.0, 3.0, 4.0],
        )
    }

    #[test]
    fn test_column_names_and_lengths() {
        let cols = sample();
        let names: Vec<&str> = cols.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "perimeter",
                "area",
                "pov_perimeter",
                "pov_area",
                "Q1_overlap",
                "Q2_overlap",
                "Q3_overlap",
                "Q4_overlap",
                "surface_area",
                "volume",
            ]
        );
        for (_, values) in &cols {
            assert_eq!(values.len(), 4);
        }
    }

    #[test]
    fn test_hull_grows_with_prefix() {
        let cols = sample();
        let perimeter = column(&cols, "perimeter");
        let area = column(&cols, "area");
        // two points span no area yet
        assert!(perimeter[0].is_nan() && perimeter[1].is_nan());
        let sqrt_2 = std::f64::consts::SQRT_2;
        assert!((perimeter[2] - (2.0 + 2.0 * sqrt_2)).abs() < 1e-12);
        assert!((area[2] - 1.0).abs() < 1e-12);
        assert!((perimeter[3] - 4.0 * sqrt_2).abs() < 1e-12);
        assert!((area[3] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_pov_anchor_extends_the_hull() {
        let cols = sample();
        let pov_area = column(&cols, "pov_area");
        // (6, 0) plus the first two points already spans a triangle
        assert!(pov_area[0].is_nan());
        assert!(pov_area[1].is_finite());
        assert!(pov_area[2] > column(&cols, "area")[2]);
    }

    #[test]
    fn test_quadrant_overlap_all_in_first_quadrant() {
        let cols = sample();
        assert!((column(&cols, "Q1_overlap")[2] - 1.0).abs() < 1e-12);
        assert_eq!(column(&cols, "Q2_overlap")[2], 0.0);
        assert!(column(&cols, "Q1_overlap")[0].is_nan());
    }

    #[test]
    fn test_3d_hull_needs_four_spanning_points() {
        let cols = sample();
        let volume = column(&cols, "volume");
        assert!(volume[0].is_nan() && volume[1].is_nan() && volume[2].is_nan());
        assert!((volume[3] - 8.0 / 6.0).abs() < 1e-12);
        assert!(column(&cols, "surface_area")[3].is_finite());
    }

    #[test]
    fn test_flat_trajectory_has_no_3d_volume() {
        // constant z keeps every prefix coplanar
        let cols = shape_columns(
            &[0.0, 1.0, 0.0, 1.0],
            &[0.0, 0.0, 1.0, 1.0],
            &[2.0, 2.0, 2.0, 2.0],
        );
        for v in column(&cols, "volume") {
            assert!(v.is_nan());
        }
    }

    #[test]
    fn test_empty_input() {
        let cols = shape_columns(&[], &[], &[]);
        assert_eq!(cols.len(), 10);
        for (_, values) in &cols {
            assert!(values.is_empty());
        }
    }
}
