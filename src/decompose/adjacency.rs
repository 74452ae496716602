use smallvec::SmallVec;
use std::collections::HashMap;

use super::triangle::Triangle;
use crate::error::GeometryError;

/// Undirected edge between two vertex indices, stored (min, max)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(usize, usize);

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        if a < b { Edge(a, b) } else { Edge(b, a) }
    }

    pub fn vertices(&self) -> (usize, usize) {
        (self.0, self.1)
    }
}

/// A triangle touching an edge, with its vertex opposite that edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incidence {
    pub triangle: Triangle,
    pub opposite: usize,
}

/// Edge -> incident triangles, at most two per edge
///
/// One incidence marks an outer boundary edge, two an interior diagonal.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    edges: HashMap<Edge, SmallVec<[Incidence; 2]>>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the index with a complete triangle set
    pub fn build(triangles: &[Triangle]) -> Result<Self, GeometryError> {
        let mut index = Self {
            edges: HashMap::with_capacity(triangles.len() * 3),
        };
        for &t in triangles {
            index.add(t)?;
        }
        Ok(index)
    }

    pub fn add(&mut self, triangle: Triangle) -> Result<(), GeometryError> {
        for (a, b, opposite) in triangle.edges() {
            let entry = self.edges.entry(Edge::new(a, b)).or_default();
            if entry.len() == 2 {
                return Err(GeometryError::InvalidGeometry(format!(
                    "edge ({}, {}) would be shared by more than two triangles",
                    a, b
                )));
            }
            entry.push(Incidence { triangle, opposite });
        }
        Ok(())
    }

    pub fn remove(&mut self, triangle: Triangle) {
        for (a, b, _) in triangle.edges() {
            let edge = Edge::new(a, b);
            if let Some(entry) = self.edges.get_mut(&edge) {
                entry.retain(|inc| inc.triangle != triangle);
                if entry.is_empty() {
                    self.edges.remove(&edge);
                }
            }
        }
    }

    /// Triangles currently touching `edge`: 0, 1 or 2 entries
    pub fn incident(&self, edge: Edge) -> &[Incidence] {
        match self.edges.get(&edge) {
            Some(entry) => entry.as_slice(),
            None => &[],
        }
    }

    /// The triangle across `edge` from `triangle`, if any
    pub fn neighbor(&self, edge: Edge, triangle: Triangle) -> Option<Incidence> {
        self.incident(edge)
            .iter()
            .find(|inc| inc.triangle != triangle)
            .copied()
    }

    /// All indexed edges with their incidence count
    pub fn edges(&self) -> impl Iterator<Item = (Edge, usize)> + '_ {
        self.edges.iter().map(|(&edge, entry)| (edge, entry.len()))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
