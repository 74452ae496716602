//! Delaunay-like edge-flip refinement of a polygon triangulation
//!
//! An interior edge (x, y) shared by triangles with opposite vertices p and
//! q is flipped to (p, q) when the two angles facing it sum to more than
//! pi. Only diagonals are ever flipped; boundary edges have a single
//! incident triangle and stay put.

use std::f64::consts::PI;

use super::adjacency::Edge;
use super::triangle::{Triangle, Triangulation};
use crate::error::GeometryError;
use crate::geometry::point::{angle, orient2d};

/// Slack on the angle-sum test so cocircular quads do not oscillate
pub const ANGLE_TOLERANCE: f64 = 1e-9;

/// Default cap on flips for one polygon
pub const DEFAULT_MAX_FLIPS: usize = 10_000;

/// A diagonal whose flip would improve the triangulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flip {
    pub removed: [Triangle; 2],
    pub added: [Triangle; 2],
}

/// Flip violating diagonals until none remain
///
/// Returns the number of flips performed, or
/// `RefinementNonConvergence` once `max_flips` is exceeded.
pub fn refine(triangulation: &mut Triangulation, max_flips: usize) -> Result<usize, GeometryError> {
    let mut flips = 0;

    while let Some(flip) = find_flip(triangulation)? {
        if flips == max_flips {
            return Err(GeometryError::RefinementNonConvergence { flips });
        }
        apply_flip(triangulation, &flip)?;
        flips += 1;
        log::trace!("flipped {:?} -> {:?}", flip.removed, flip.added);
    }

    Ok(flips)
}

/// Scan all triangles for the first diagonal violating the angle criterion
pub fn find_flip(triangulation: &Triangulation) -> Result<Option<Flip>, GeometryError> {
    let points = triangulation.points();
    let adjacency = triangulation.adjacency();

    for &triangle in triangulation.triangles() {
        for (x, y, p) in triangle.edges() {
            let Some(across) = adjacency.neighbor(Edge::new(x, y), triangle) else {
                continue;
            };
            let q = across.opposite;

            let (px, py, pp, pq) = (points[x], points[y], points[p], points[q]);
            let facing = angle(px, pp, py)? + angle(px, pq, py)?;
            if facing <= PI + ANGLE_TOLERANCE {
                continue;
            }

            // Quad x-q-y-p split along p-q; both halves must keep positive area
            if orient2d(px, pq, pp) <= 0.0 || orient2d(pq, py, pp) <= 0.0 {
                continue;
            }

            return Ok(Some(Flip {
                removed: [triangle, across.triangle],
                added: [Triangle::new(x, q, p), Triangle::new(q, y, p)],
            }));
        }
    }

    Ok(None)
}

pub fn apply_flip(triangulation: &mut Triangulation, flip: &Flip) -> Result<(), GeometryError> {
    for &t in &flip.removed {
        triangulation.remove(t);
    }
    for &t in &flip.added {
        triangulation.insert(t)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::triangulation::triangulate;
    use crate::geometry::Point;
    use approx::assert_relative_eq;

    fn build(coords: &[(f64, f64)]) -> Triangulation {
        let points: Vec<Point> = coords.iter().map(|&c| Point::from(c)).collect();
        let triangles = triangulate(&points).unwrap();
        Triangulation::new(points, triangles).unwrap()
    }

    /// Every boundary edge has one triangle, every other indexed edge two
    fn assert_adjacency_invariant(tri: &Triangulation) {
        let n = tri.points().len();
        let boundary: Vec<Edge> = (0..n).map(|i| Edge::new(i, (i + 1) % n)).collect();
        for (edge, count) in tri.adjacency().edges() {
            if boundary.contains(&edge) {
                assert_eq!(count, 1, "boundary edge {:?}", edge);
            } else {
                assert_eq!(count, 2, "interior edge {:?}", edge);
            }
        }
        for edge in boundary {
            assert_eq!(tri.adjacency().incident(edge).len(), 1);
        }
    }

    #[test]
    fn test_long_diagonal_is_flipped() {
        // Flat rhombus; ear clipping picks the long diagonal 1-3
        let mut tri = build(&[(5.0, -1.0), (10.0, 0.0), (5.0, 1.0), (0.0, 0.0)]);
        assert_eq!(tri.adjacency().incident(Edge::new(1, 3)).len(), 2);

        let flips = refine(&mut tri, DEFAULT_MAX_FLIPS).unwrap();

        assert_eq!(flips, 1);
        assert_eq!(tri.adjacency().incident(Edge::new(0, 2)).len(), 2);
        assert!(tri.adjacency().incident(Edge::new(1, 3)).is_empty());
        assert!(tri.triangles().contains(&Triangle::new(0, 1, 2)));
        assert!(tri.triangles().contains(&Triangle::new(0, 2, 3)));
    }

    #[test]
    fn test_square_is_stable() {
        let mut tri = build(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let before = tri.triangles().clone();
        assert_eq!(refine(&mut tri, DEFAULT_MAX_FLIPS).unwrap(), 0);
        assert_eq!(tri.triangles(), &before);
    }

    #[test]
    fn test_flip_preserves_area_and_vertices() {
        let mut tri = build(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ]);
        let count = tri.len();
        let area = tri.area();
        let vertices = |t: &Triangulation| {
            let mut v: Vec<usize> = t.triangles().iter().flat_map(|t| t.vertices()).collect();
            v.sort();
            v.dedup();
            v
        };
        let before = vertices(&tri);

        let flip = find_flip(&tri).unwrap().expect("L-shape has a violating diagonal");
        apply_flip(&mut tri, &flip).unwrap();

        assert_eq!(tri.len(), count);
        assert_relative_eq!(tri.area(), area, epsilon = 1e-12);
        assert_eq!(vertices(&tri), before);
        assert_adjacency_invariant(&tri);
    }

    #[test]
    fn test_refinement_reaches_fixed_point() {
        let mut tri = build(&[
            (0.0, 0.0),
            (6.0, 0.0),
            (7.0, 3.0),
            (4.0, 2.5),
            (3.0, 6.0),
            (1.0, 5.0),
            (-1.0, 2.0),
        ]);
        assert_adjacency_invariant(&tri);
        let area = tri.area();

        refine(&mut tri, DEFAULT_MAX_FLIPS).unwrap();

        assert!(find_flip(&tri).unwrap().is_none());
        assert_adjacency_invariant(&tri);
        assert_relative_eq!(tri.area(), area, epsilon = 1e-9);

        let points = tri.points();
        for &t in tri.triangles() {
            for (x, y, p) in t.edges() {
                if let Some(across) = tri.adjacency().neighbor(Edge::new(x, y), t) {
                    let sum = angle(points[x], points[p], points[y]).unwrap()
                        + angle(points[x], points[across.opposite], points[y]).unwrap();
                    assert!(sum <= PI + ANGLE_TOLERANCE);
                }
            }
        }
    }

    #[test]
    fn test_near_circle_does_not_worsen_min_angle() {
        // Fan triangulation from ear clipping leaves thin slivers
        let coords: Vec<(f64, f64)> = (0..12)
            .map(|k| {
                let a = k as f64 * std::f64::consts::TAU / 12.0;
                let r = if k % 2 == 0 { 10.0 } else { 9.7 };
                (r * a.cos(), r * a.sin())
            })
            .collect();
        let mut tri = build(&coords);
        let before = tri.min_angle().unwrap();

        refine(&mut tri, DEFAULT_MAX_FLIPS).unwrap();

        let after = tri.min_angle().unwrap();
        assert!(after >= before - 1e-12, "min angle {} -> {}", before, after);
        assert_eq!(tri.len(), 10);
    }

    #[test]
    fn test_flip_cap_reports_non_convergence() {
        let mut tri = build(&[(5.0, -1.0), (10.0, 0.0), (5.0, 1.0), (0.0, 0.0)]);
        let result = refine(&mut tri, 0);
        assert_eq!(
            result,
            Err(GeometryError::RefinementNonConvergence { flips: 0 })
        );
    }
}
