//! Ear-clipping triangulation of a simple CCW polygon

use super::triangle::Triangle;
use crate::error::GeometryError;
use crate::geometry::Point;
use crate::geometry::point::{on_segment, orient2d, orientation, point_in_triangle};

/// Triangulate a simple polygon given in CCW order
///
/// Returns exactly `n - 2` triangles referencing indices into `points`.
/// The scan restarts from the first working vertex after every clip, so the
/// worst case is cubic in the vertex count.
pub fn triangulate(points: &[Point]) -> Result<Vec<Triangle>, GeometryError> {
    let n = points.len();
    if n < 3 {
        return Err(GeometryError::DegenerateInput { points: n });
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 2 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let prev = (i + m - 1) % m;
            let next = (i + 1) % m;
            is_ear(points, &remaining, prev, i, next)
        });

        let Some(i) = ear else {
            return Err(GeometryError::TriangulationFailure { remaining: m });
        };

        let a = remaining[(i + m - 1) % m];
        let b = remaining[i];
        let c = remaining[(i + 1) % m];
        triangles.push(Triangle::new(a, b, c));
        remaining.remove(i);
    }

    Ok(triangles)
}

/// Whether the working vertex at position `i` can be clipped
///
/// Collinear corners count as convex. For such a zero-area candidate the
/// barycentric test is undefined, so it is accepted only when no other
/// working vertex lies on the segment joining its neighbours.
fn is_ear(points: &[Point], remaining: &[usize], prev: usize, i: usize, next: usize) -> bool {
    let a = points[remaining[prev]];
    let b = points[remaining[i]];
    let c = points[remaining[next]];

    if !orientation(a, b, c) {
        return false;
    }

    let degenerate = orient2d(a, b, c) == 0.0;

    remaining
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != prev && j != i && j != next)
        .all(|(_, &idx)| {
            let p = points[idx];
            if degenerate {
                return !on_segment(p, a, c);
            }
            match point_in_triangle(p, a, b, c) {
                Some(inside) => !inside,
                None => !on_segment(p, a, c),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::signed_area;
    use approx::assert_relative_eq;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    fn total_area(points: &[Point], triangles: &[Triangle]) -> f64 {
        triangles.iter().map(|t| t.area(points)).sum()
    }

    #[test]
    fn test_triangulate_triangle() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let triangles = triangulate(&points).unwrap();
        assert_eq!(triangles, vec![Triangle::new(0, 1, 2)]);
    }

    #[test]
    fn test_triangulate_square() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let triangles = triangulate(&points).unwrap();
        assert_eq!(
            triangles,
            vec![Triangle::new(3, 0, 1), Triangle::new(3, 1, 2)]
        );
    }

    #[test]
    fn test_triangulate_l_shape() {
        let points = pts(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ]);
        let triangles = triangulate(&points).unwrap();

        assert_eq!(triangles.len(), 4);
        // The diagonal 5-1 would pass through the reflex vertex 3
        assert!(!triangles.contains(&Triangle::new(5, 0, 1)));
        for t in &triangles {
            assert!(t.orient(&points) > 0.0);
        }
        assert_relative_eq!(total_area(&points, &triangles), 3.0);
    }

    #[test]
    fn test_triangulation_count_and_area_on_star() {
        let points: Vec<Point> = (0..16)
            .map(|k| {
                let a = k as f64 * std::f64::consts::TAU / 16.0;
                let r = if k % 2 == 0 { 10.0 } else { 4.0 };
                Point::new(r * a.cos(), r * a.sin())
            })
            .collect();
        let triangles = triangulate(&points).unwrap();

        assert_eq!(triangles.len(), points.len() - 2);
        assert_relative_eq!(
            total_area(&points, &triangles),
            signed_area(&points),
            epsilon = 1e-9
        );
        for t in &triangles {
            assert!(t.orient(&points) > 0.0);
        }
    }

    #[test]
    fn test_triangulate_collinear_vertex() {
        // Vertex 0 sits mid-edge, so the first ear found has zero area
        let points = pts(&[(5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        let triangles = triangulate(&points).unwrap();

        assert_eq!(triangles.len(), 3);
        assert_eq!(triangles[0], Triangle::new(4, 0, 1));
        assert_eq!(triangles[0].orient(&points), 0.0);
        assert_relative_eq!(total_area(&points, &triangles), 100.0);
        for t in &triangles {
            assert!(t.orient(&points) >= 0.0);
        }
    }

    #[test]
    fn test_triangulate_clockwise_fails() {
        let points = pts(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let result = triangulate(&points);
        assert_eq!(
            result,
            Err(GeometryError::TriangulationFailure { remaining: 4 })
        );
    }

    #[test]
    fn test_triangulate_too_few_points() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(
            triangulate(&points),
            Err(GeometryError::DegenerateInput { points: 2 })
        );
    }
}
