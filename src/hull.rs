//! Convex-hull primitives
//!
//! Self-contained 2D and 3D hull computations behind the shape and
//! trajectory stages. Degenerate point sets (too few points, no spatial
//! extent) return `None` so callers can emit NaN for the affected fields
//! instead of aborting.

use crate::types::SPACE_BOUND;
use std::collections::BTreeSet;

/// Tolerance for visibility and degeneracy decisions in 3D
const EPS: f64 = 1e-9;

/// A point in the 2D behavior space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dist(self, other: Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point in the 3D behavior space (third axis: interaction count)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn sub(self, other: Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn dot(self, other: Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Twice the signed area of triangle (a, b, c); positive when c lies to
/// the left of the directed line a -> b
fn orient(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Convex hull of a 2D point set, counterclockwise without a repeated
/// endpoint. Returns `None` unless at least 3 distinct points span an
/// actual area.
pub fn convex_hull_2d(points: &[Point2]) -> Option<Vec<Point2>> {
    if points.iter().any(|p| !p.is_finite()) {
        return None;
    }
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| {
        (a.x, a.y)
            .partial_cmp(&(b.x, b.y))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pts.dedup_by(|a, b| a.x == b.x && a.y == b.y);
    if pts.len() < 3 {
        return None;
    }

    let mut lower: Vec<Point2> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && orient(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point2> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && orient(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    if lower.len() < 3 {
        return None;
    }
    Some(lower)
}

/// Perimeter of a polygon given in vertex order
pub fn polygon_perimeter(vertices: &[Point2]) -> f64 {
    let n = vertices.len();
    (0..n).map(|i| vertices[i].dist(vertices[(i + 1) % n])).sum()
}

/// Enclosed area of a simple polygon given in vertex order.
///
/// Formula: shoelace, `|Σ (xᵢ·yᵢ₊₁ - xᵢ₊₁·yᵢ)| / 2`
pub fn polygon_area(vertices: &[Point2]) -> f64 {
    let n = vertices.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let p = vertices[i];
            let q = vertices[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum();
    twice.abs() / 2.0
}

/// Hull perimeter and enclosed area of a 2D point set
pub fn hull_size_2d(points: &[Point2]) -> Option<(f64, f64)> {
    let hull = convex_hull_2d(points)?;
    Some((polygon_perimeter(&hull), polygon_area(&hull)))
}

/// Centroid of the convex hull of `points`.
///
/// Fewer than 3 points have no defined centroid. Sets with extent but no
/// area (collinear) collapse to the midpoint of their extreme points;
/// fully coincident sets collapse to the point itself.
pub fn hull_centroid(points: &[Point2]) -> Option<Point2> {
    if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
        return None;
    }
    if let Some(hull) = convex_hull_2d(points) {
        let n = hull.len();
        let mut twice_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let p = hull[i];
            let q = hull[(i + 1) % n];
            let w = p.x * q.y - q.x * p.y;
            twice_area += w;
            cx += (p.x + q.x) * w;
            cy += (p.y + q.y) * w;
        }
        let scale = 3.0 * twice_area;
        Some(Point2::new(cx / scale, cy / scale))
    } else {
        // no area: midpoint of the lexicographic extremes
        let mut min = points[0];
        let mut max = points[0];
        for &p in points {
            if (p.x, p.y) < (min.x, min.y) {
                min = p;
            }
            if (p.x, p.y) > (max.x, max.y) {
                max = p;
            }
        }
        Some(Point2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0))
    }
}

/// Clip a polygon against a convex clip polygon given counterclockwise.
/// Returns the intersection's vertices (possibly empty).
pub fn clip_convex(subject: &[Point2], clip: &[Point2]) -> Vec<Point2> {
    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let p = input[j];
            let q = input[(j + 1) % input.len()];
            let p_in = orient(a, b, p) >= 0.0;
            let q_in = orient(a, b, q) >= 0.0;
            if p_in {
                output.push(p);
                if !q_in {
                    output.push(edge_intersection(a, b, p, q));
                }
            } else if q_in {
                output.push(edge_intersection(a, b, p, q));
            }
        }
    }
    output
}

/// Intersection of the infinite line through (a, b) with segment (p, q).
/// Callers guarantee p and q straddle the line.
fn edge_intersection(a: Point2, b: Point2, p: Point2, q: Point2) -> Point2 {
    let a1 = b.y - a.y;
    let b1 = a.x - b.x;
    let c1 = a1 * a.x + b1 * a.y;
    let a2 = q.y - p.y;
    let b2 = p.x - q.x;
    let c2 = a2 * p.x + b2 * p.y;
    let det = a1 * b2 - a2 * b1;
    Point2::new((b2 * c1 - b1 * c2) / det, (a1 * c2 - a2 * c1) / det)
}

/// Fraction of the hull's area falling inside each of the four bounded
/// quadrant squares of the task space, in quadrant order Q1..Q4
pub fn quadrant_overlap(points: &[Point2]) -> Option<[f64; 4]> {
    let hull = convex_hull_2d(points)?;
    let hull_area = polygon_area(&hull);
    let b = SPACE_BOUND;
    let quadrants: [[Point2; 4]; 4] = [
        [
            Point2::new(0.0, 0.0),
            Point2::new(b, 0.0),
            Point2::new(b, b),
            Point2::new(0.0, b),
        ],
        [
            Point2::new(-b, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, b),
            Point2::new(-b, b),
        ],
        [
            Point2::new(0.0, 0.0),
            Point2::new(-b, 0.0),
            Point2::new(-b, -b),
            Point2::new(0.0, -b),
        ],
        [
            Point2::new(b, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, -b),
            Point2::new(b, -b),
        ],
    ];
    let mut overlap = [0.0; 4];
    for (i, quadrant) in quadrants.iter().enumerate() {
        let clipped = clip_convex(&hull, quadrant);
        let intersection = if clipped.len() < 3 {
            0.0
        } else {
            polygon_area(&clipped)
        };
        overlap[i] = intersection / hull_area;
    }
    Some(overlap)
}

/// Signed distance of `p` from the plane of face (a, b, c); positive on
/// the side the face normal points to
fn face_distance(points: &[Point3], face: [usize; 3], p: Point3) -> f64 {
    let a = points[face[0]];
    let normal = points[face[1]].sub(a).cross(points[face[2]].sub(a));
    normal.dot(p.sub(a))
}

/// Surface area and enclosed volume of the convex hull of a 3D point set.
/// Returns `None` unless the points span all three dimensions.
pub fn hull_size_3d(points: &[Point3]) -> Option<(f64, f64)> {
    if points.len() < 4 || points.iter().any(|p| !p.is_finite()) {
        return None;
    }

    // initial simplex: four points with pairwise extent in every dimension
    let i0 = 0;
    let i1 = (1..points.len()).find(|&i| points[i].sub(points[i0]).norm() > EPS)?;
    let i2 = (1..points.len()).find(|&i| {
        i != i1
            && points[i1]
                .sub(points[i0])
                .cross(points[i].sub(points[i0]))
                .norm()
                > EPS
    })?;
    let base_normal = points[i1].sub(points[i0]).cross(points[i2].sub(points[i0]));
    let i3 = (1..points.len())
        .find(|&i| i != i1 && i != i2 && base_normal.dot(points[i].sub(points[i0])).abs() > EPS)?;

    let centroid = Point3::new(
        (points[i0].x + points[i1].x + points[i2].x + points[i3].x) / 4.0,
        (points[i0].y + points[i1].y + points[i2].y + points[i3].y) / 4.0,
        (points[i0].z + points[i1].z + points[i2].z + points[i3].z) / 4.0,
    );

    let mut faces: Vec<[usize; 3]> = vec![
        [i0, i1, i2],
        [i0, i1, i3],
        [i0, i2, i3],
        [i1, i2, i3],
    ];
    for face in &mut faces {
        if face_distance(points, *face, centroid) > 0.0 {
            face.swap(1, 2);
        }
    }

    let simplex = [i0, i1, i2, i3];
    for pi in 0..points.len() {
        if simplex.contains(&pi) {
            continue;
        }
        let p = points[pi];
        // BTreeSet keeps face processing order deterministic, so repeated
        // runs sum areas and volumes in the same order bit for bit
        let visible: BTreeSet<usize> = (0..faces.len())
            .filter(|&fi| face_distance(points, faces[fi], p) > EPS)
            .collect();
        if visible.is_empty() {
            continue;
        }

        // horizon edges: directed edges of visible faces whose reverse
        // belongs to a face that stays
        let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();
        for &fi in &visible {
            let [a, b, c] = faces[fi];
            edges.insert((a, b));
            edges.insert((b, c));
            edges.insert((c, a));
        }
        let horizon: Vec<(usize, usize)> = edges
            .iter()
            .filter(|&&(a, b)| !edges.contains(&(b, a)))
            .copied()
            .collect();

        let mut next_faces: Vec<[usize; 3]> = faces
            .iter()
            .enumerate()
            .filter(|(fi, _)| !visible.contains(fi))
            .map(|(_, f)| *f)
            .collect();
        for (a, b) in horizon {
            next_faces.push([a, b, pi]);
        }
        faces = next_faces;
    }

    let mut surface = 0.0;
    let mut six_volume = 0.0;
    for &[a, b, c] in &faces {
        let (pa, pb, pc) = (points[a], points[b], points[c]);
        surface += pb.sub(pa).cross(pc.sub(pa)).norm() / 2.0;
        six_volume += pa.dot(pb.cross(pc));
    }
    Some((surface, six_volume.abs() / 6.0))
}
