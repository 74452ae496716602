//! Greedy fusion of a triangulation into convex polygons
//!
//! Each part starts from the first remaining triangle and grows across
//! shared diagonals while both new corners stay convex. The result is not
//! minimal; it depends on seed order, which the ordered triangle set keeps
//! reproducible.

use super::adjacency::Edge;
use super::triangle::{Triangle, Triangulation};
use crate::geometry::Point;
use crate::geometry::point::{orientation, signed_area};

/// CCW vertex indices of one convex part, starting at the smallest index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvexPolygon(Vec<usize>);

impl ConvexPolygon {
    pub fn new(mut indices: Vec<usize>) -> Self {
        if let Some(start) = indices
            .iter()
            .enumerate()
            .min_by_key(|&(_, &v)| v)
            .map(|(i, _)| i)
        {
            indices.rotate_left(start);
        }
        ConvexPolygon(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve the indices against a point arena
    pub fn points(&self, points: &[Point]) -> Vec<Point> {
        self.0.iter().map(|&i| points[i]).collect()
    }

    pub fn area(&self, points: &[Point]) -> f64 {
        signed_area(&self.points(points))
    }

    /// Left or straight turn at every corner
    ///
    /// Straight (pi) corners are accepted, so a part may keep a vertex that
    /// lies on the segment between its neighbours, such as a collinear
    /// outline point. Strict convexity would need a positive turn instead.
    pub fn is_convex(&self, points: &[Point]) -> bool {
        let m = self.0.len();
        (0..m).all(|i| {
            let a = points[self.0[(i + m - 1) % m]];
            let b = points[self.0[i]];
            let c = points[self.0[(i + 1) % m]];
            orientation(a, b, c)
        })
    }
}

/// A triangle that can be spliced into the working polygon
struct Candidate {
    triangle: Triangle,
    vertex: usize,
    position: usize,
}

/// Consume every triangle, fusing neighbours into convex parts
///
/// A neighbour is accepted when both corners it creates turn left or run
/// straight, so output parts may contain straight-angle vertices.
pub fn merge(mut triangulation: Triangulation) -> Vec<ConvexPolygon> {
    let mut parts = Vec::new();

    while let Some(seed) = triangulation.first() {
        triangulation.remove(seed);
        let mut polygon = seed.vertices().to_vec();

        while let Some(candidate) = find_candidate(&triangulation, &polygon) {
            triangulation.remove(candidate.triangle);
            polygon.insert(candidate.position, candidate.vertex);
        }

        log::debug!(
            "merged {} triangles into part {:?}",
            polygon.len() - 2,
            polygon
        );
        parts.push(ConvexPolygon::new(polygon));
    }

    parts
}

fn find_candidate(triangulation: &Triangulation, polygon: &[usize]) -> Option<Candidate> {
    let points = triangulation.points();
    let m = polygon.len();

    (0..m).find_map(|i| {
        let x = polygon[i];
        let y = polygon[(i + 1) % m];

        // The working polygon's own triangles are already gone, so a live
        // diagonal has exactly one incidence left
        let [across] = triangulation.adjacency().incident(Edge::new(x, y)) else {
            return None;
        };
        let newv = across.opposite;
        if polygon.contains(&newv) {
            return None;
        }

        let before = points[polygon[(i + m - 1) % m]];
        let after = points[polygon[(i + 2) % m]];
        let convex = orientation(before, points[x], points[newv])
            && orientation(points[newv], points[y], after);

        convex.then_some(Candidate {
            triangle: across.triangle,
            vertex: newv,
            position: i + 1,
        })
    })
}
