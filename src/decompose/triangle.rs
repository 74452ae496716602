use std::collections::BTreeSet;

use super::adjacency::{AdjacencyIndex, Edge};
use crate::error::GeometryError;
use crate::geometry::Point;
use crate::geometry::point::{angle, orient2d};

/// A triangle of vertex indices into a shape's point arena
///
/// Vertices are kept in CCW order and rotated so the smallest index comes
/// first, which makes equal vertex sets compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triangle([usize; 3]);

impl Triangle {
    /// Create a triangle from vertices given in CCW order
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        if a <= b && a <= c {
            Triangle([a, b, c])
        } else if b <= a && b <= c {
            Triangle([b, c, a])
        } else {
            Triangle([c, a, b])
        }
    }

    pub fn vertices(&self) -> [usize; 3] {
        self.0
    }

    pub fn contains(&self, v: usize) -> bool {
        self.0.contains(&v)
    }

    /// The three directed CCW edges paired with the vertex opposite each
    pub fn edges(&self) -> [(usize, usize, usize); 3] {
        let [a, b, c] = self.0;
        [(a, b, c), (b, c, a), (c, a, b)]
    }

    /// The vertex not on `edge`, if `edge` belongs to this triangle
    pub fn opposite(&self, edge: Edge) -> Option<usize> {
        let (u, v) = edge.vertices();
        if !self.contains(u) || !self.contains(v) {
            return None;
        }
        self.0.iter().copied().find(|&w| w != u && w != v)
    }

    /// Twice the signed area against the given coordinates
    pub fn orient(&self, points: &[Point]) -> f64 {
        let [a, b, c] = self.0;
        orient2d(points[a], points[b], points[c])
    }

    pub fn area(&self, points: &[Point]) -> f64 {
        self.orient(points).abs() / 2.0
    }

    pub fn corners(&self, points: &[Point]) -> [Point; 3] {
        self.0.map(|i| points[i])
    }
}

/// The triangles covering one polygon together with their adjacency
///
/// The triangle set is the source of truth; the adjacency index is kept
/// in lockstep by `insert` and `remove`.
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<Point>,
    triangles: BTreeSet<Triangle>,
    adjacency: AdjacencyIndex,
}

impl Triangulation {
    /// Seed a triangulation from ear-clipping output
    pub fn new(points: Vec<Point>, triangles: Vec<Triangle>) -> Result<Self, GeometryError> {
        let adjacency = AdjacencyIndex::build(&triangles)?;
        Ok(Self {
            points,
            triangles: triangles.into_iter().collect(),
            adjacency,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn triangles(&self) -> &BTreeSet<Triangle> {
        &self.triangles
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn first(&self) -> Option<Triangle> {
        self.triangles.first().copied()
    }

    pub fn insert(&mut self, triangle: Triangle) -> Result<(), GeometryError> {
        if self.triangles.insert(triangle) {
            self.adjacency.add(triangle)?;
        }
        Ok(())
    }

    pub fn remove(&mut self, triangle: Triangle) -> bool {
        let removed = self.triangles.remove(&triangle);
        if removed {
            self.adjacency.remove(triangle);
        }
        removed
    }

    /// Total area of all triangles
    pub fn area(&self) -> f64 {
        self.triangles.iter().map(|t| t.area(&self.points)).sum()
    }

    /// Smallest interior angle over all non-degenerate triangles
    pub fn min_angle(&self) -> Option<f64> {
        self.triangles
            .iter()
            .filter(|t| t.orient(&self.points) > 0.0)
            .filter_map(|t| {
                let [a, b, c] = t.corners(&self.points);
                let angles = [
                    angle(c, a, b).ok()?,
                    angle(a, b, c).ok()?,
                    angle(b, c, a).ok()?,
                ];
                angles.into_iter().reduce(f64::min)
            })
            .reduce(f64::min)
    }
}
