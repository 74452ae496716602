use thiserror::Error;

/// Failures of the per-shape geometry pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("degenerate input: {points} usable points, at least 3 required")]
    DegenerateInput { points: usize },

    #[error("triangulation failed: no ear found with {remaining} vertices remaining")]
    TriangulationFailure { remaining: usize },

    #[error("refinement did not converge after {flips} edge flips")]
    RefinementNonConvergence { flips: usize },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// A geometry failure tagged with the shape that caused it
#[derive(Error, Debug, Clone, PartialEq)]
#[error("shape '{shape}': {source}")]
pub struct ShapeError {
    pub shape: String,
    #[source]
    pub source: GeometryError,
}

impl ShapeError {
    pub fn new(shape: impl Into<String>, source: GeometryError) -> Self {
        Self {
            shape: shape.into(),
            source,
        }
    }
}
