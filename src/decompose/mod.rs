//! Convex decomposition of simple polygons
//!
//! triangulate -> refine -> merge, all over one shape's point arena.

pub mod adjacency;
pub mod merge;
pub mod refine;
pub mod triangle;
pub mod triangulation;
pub mod validation;

pub use adjacency::{AdjacencyIndex, Edge, Incidence};
pub use merge::{ConvexPolygon, merge};
pub use refine::refine;
pub use triangle::{Triangle, Triangulation};
pub use triangulation::triangulate;
pub use validation::{ValidationResult, validate_decomposition, validate_triangulation};

use crate::error::GeometryError;
use crate::geometry::Point;
use crate::geometry::point::signed_area;

/// Per-shape decomposition settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecomposeOptions {
    /// Run edge-flip refinement between triangulation and merging
    pub refine_triangles: bool,
    /// Flip budget before refinement gives up
    pub max_flips: usize,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self {
            refine_triangles: true,
            max_flips: refine::DEFAULT_MAX_FLIPS,
        }
    }
}

/// A polygon and the convex parts that partition it
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Cleaned CCW outline; part indices point into it
    pub polygon: Vec<Point>,
    pub parts: Vec<ConvexPolygon>,
    pub triangle_count: usize,
    pub flips: usize,
}

impl Decomposition {
    pub fn part_points(&self, index: usize) -> Option<Vec<Point>> {
        self.parts.get(index).map(|p| p.points(&self.polygon))
    }

    pub fn convex_polygons(&self) -> Vec<Vec<Point>> {
        self.parts.iter().map(|p| p.points(&self.polygon)).collect()
    }

    /// The outline needed no splitting
    pub fn is_convex(&self) -> bool {
        self.parts.len() == 1
    }
}

/// Drop repeated points and orient the outline CCW
///
/// Consecutive duplicates and trailing copies of the first point are
/// removed. Fewer than 3 remaining points, or zero enclosed area, is
/// `DegenerateInput`.
pub fn prepare_polygon(points: &[Point]) -> Result<Vec<Point>, GeometryError> {
    if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
        return Err(GeometryError::InvalidGeometry(format!(
            "non-finite coordinate ({}, {})",
            bad.x, bad.y
        )));
    }

    let mut polygon: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if polygon.last() != Some(&p) {
            polygon.push(p);
        }
    }
    while polygon.len() > 1 && polygon.last() == polygon.first() {
        polygon.pop();
    }

    if polygon.len() < 3 {
        return Err(GeometryError::DegenerateInput {
            points: polygon.len(),
        });
    }

    let area = signed_area(&polygon);
    if area == 0.0 {
        return Err(GeometryError::DegenerateInput {
            points: polygon.len(),
        });
    }
    if area < 0.0 {
        polygon.reverse();
    }

    Ok(polygon)
}

/// Split a simple polygon into convex parts
pub fn decompose(points: &[Point], options: &DecomposeOptions) -> Result<Decomposition, GeometryError> {
    let polygon = prepare_polygon(points)?;

    let triangles = triangulate(&polygon)?;
    let triangle_count = triangles.len();
    let mut triangulation = Triangulation::new(polygon.clone(), triangles)?;

    let flips = if options.refine_triangles {
        refine(&mut triangulation, options.max_flips)?
    } else {
        0
    };

    let parts = merge(triangulation);
    log::debug!(
        "decomposed {} vertices: {} triangles, {} flips, {} parts",
        polygon.len(),
        triangle_count,
        flips,
        parts.len()
    );

    Ok(Decomposition {
        polygon,
        parts,
        triangle_count,
        flips,
    })
}
