use crate::geometry::{Affine, Point, Segment};

/// Authored outline of one shape, in the shape's local units
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    /// Closed outline of line and curve segments, flattened before use
    Path(Vec<Segment>),
    /// Explicit vertex ring; rectangles arrive here too
    Polygon(Vec<Point>),
    /// Never triangulated
    Circle { center: Point, radius: f64 },
}

impl ShapeGeometry {
    /// Axis-aligned rectangle ring starting at its (x, y) corner
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        ShapeGeometry::Polygon(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }
}

/// A shape with its accumulated transform and level metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: String,
    pub geometry: ShapeGeometry,
    /// Local units -> canvas units, including every enclosing group
    pub transform: Affine,
    pub subclass: Option<String>,
    pub script: Option<String>,
}

impl Shape {
    pub fn new(id: impl Into<String>, geometry: ShapeGeometry) -> Self {
        Self {
            id: id.into(),
            geometry,
            transform: Affine::IDENTITY,
            subclass: None,
            script: None,
        }
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn is_circle(&self) -> bool {
        matches!(self.geometry, ShapeGeometry::Circle { .. })
    }
}

/// A named group of shapes, one table in the level output
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub shapes: Vec<Shape>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shapes: Vec::new(),
        }
    }
}

/// Everything read from one shape document
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub width: f64,
    pub height: f64,
    pub layers: Vec<Layer>,
}

impl Level {
    pub fn shape_count(&self) -> usize {
        self.layers.iter().map(|l| l.shapes.len()).sum()
    }
}
