//! Structural checks on triangulations and convex decompositions
//!
//! Reports rather than repairs:
//! - Degenerate (zero-area) triangles
//! - Edges whose incidence count disagrees with their boundary status
//! - Non-convex output parts
//! - Area drift against the outline, measured independently with `geo`

use geo::{Area, LineString, Polygon};

use super::Decomposition;
use super::adjacency::Edge;
use super::triangle::Triangulation;
use crate::geometry::Point;

/// Relative area difference tolerated before a result is flagged
pub const AREA_TOLERANCE: f64 = 1e-9;

/// Result of a decomposition check
#[derive(Debug, Default, Clone)]
pub struct ValidationResult {
    /// Triangles or convex parts inspected
    pub total: usize,
    /// Triangles with zero area
    pub degenerate: usize,
    pub boundary_edges: usize,
    pub interior_edges: usize,
    /// Edges with an incidence count other than 1 (boundary) or 2 (diagonal)
    pub invalid_edges: usize,
    pub non_convex: usize,
    /// Triangles not accounted for by the convex parts
    pub unconsumed_triangles: usize,
    /// |covered area - outline area| / outline area
    pub area_error: f64,
    /// Warning messages for issues found
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Check that the pieces tile the outline
    pub fn is_valid(&self) -> bool {
        self.invalid_edges == 0
            && self.non_convex == 0
            && self.unconsumed_triangles == 0
            && self.area_error <= AREA_TOLERANCE
    }

    pub fn has_issues(&self) -> bool {
        self.degenerate > 0 || !self.is_valid()
    }

    pub fn summary(&self) -> String {
        if !self.has_issues() {
            format!("Decomposition valid: {} pieces, no issues", self.total)
        } else {
            format!(
                "Decomposition issues: {} pieces, {} degenerate, {} bad edges, {} non-convex, {} unconsumed triangles, area error {:.2e}",
                self.total,
                self.degenerate,
                self.invalid_edges,
                self.non_convex,
                self.unconsumed_triangles,
                self.area_error
            )
        }
    }
}

/// Area of a closed outline computed with `geo`
fn outline_area(points: &[Point]) -> f64 {
    let ring: LineString<f64> = points.iter().map(|p| (p.x, p.y)).collect();
    Polygon::new(ring, vec![]).unsigned_area()
}

fn relative_error(covered: f64, outline: f64) -> f64 {
    if outline > 0.0 {
        (covered - outline).abs() / outline
    } else {
        covered.abs()
    }
}

/// Check the tiling and adjacency invariants of a triangulation
pub fn validate_triangulation(triangulation: &Triangulation) -> ValidationResult {
    let points = triangulation.points();
    let n = points.len();
    let mut result = ValidationResult {
        total: triangulation.len(),
        ..Default::default()
    };

    for &t in triangulation.triangles() {
        if t.orient(points) <= 0.0 {
            result.degenerate += 1;
        }
    }

    for (edge, count) in triangulation.adjacency().edges() {
        let (a, b) = edge.vertices();
        let on_boundary = b - a == 1 || (a == 0 && b == n - 1);
        match (on_boundary, count) {
            (true, 1) => result.boundary_edges += 1,
            (false, 2) => result.interior_edges += 1,
            _ => {
                result.invalid_edges += 1;
                result.warnings.push(format!(
                    "Edge ({}, {}) has {} incident triangles",
                    a, b, count
                ));
            }
        }
    }

    let missing = (0..n)
        .filter(|&i| triangulation.adjacency().incident(Edge::new(i, (i + 1) % n)).is_empty())
        .count();
    if missing > 0 && !triangulation.is_empty() {
        result.invalid_edges += missing;
        result
            .warnings
            .push(format!("{} outline edges are not covered", missing));
    }

    result.area_error = relative_error(triangulation.area(), outline_area(points));

    if result.degenerate > 0 {
        result.warnings.push(format!(
            "{} degenerate triangles detected",
            result.degenerate
        ));
    }
    if result.area_error > AREA_TOLERANCE {
        result.warnings.push(format!(
            "Triangles cover the outline with relative area error {:.2e}",
            result.area_error
        ));
    }

    result
}

/// Check that convex parts partition the outline
pub fn validate_decomposition(decomposition: &Decomposition) -> ValidationResult {
    let points = &decomposition.polygon;
    let mut result = ValidationResult {
        total: decomposition.parts.len(),
        ..Default::default()
    };

    for (i, part) in decomposition.parts.iter().enumerate() {
        if !part.is_convex(points) {
            result.non_convex += 1;
            result
                .warnings
                .push(format!("Part {} is not convex: {:?}", i, part.indices()));
        }
    }

    let consumed: usize = decomposition.parts.iter().map(|p| p.len().saturating_sub(2)).sum();
    if consumed != decomposition.triangle_count {
        result.unconsumed_triangles = consumed.abs_diff(decomposition.triangle_count);
        result.warnings.push(format!(
            "Parts account for {} of {} triangles",
            consumed, decomposition.triangle_count
        ));
    }

    let covered: f64 = decomposition.parts.iter().map(|p| p.area(points)).sum();
    result.area_error = relative_error(covered, outline_area(points));
    if result.area_error > AREA_TOLERANCE {
        result.warnings.push(format!(
            "Parts cover the outline with relative area error {:.2e}",
            result.area_error
        ));
    }

    result
}
