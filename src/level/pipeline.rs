use crate::decompose::{DecomposeOptions, decompose, prepare_polygon, validate_decomposition};
use crate::domain::{
    BakedLayer, BakedLevel, Level, LevelObject, ObjectGeometry, Shape, ShapeGeometry,
};
use crate::error::{GeometryError, ShapeError};
use crate::geometry::{Normalizer, Point, flatten_and_simplify};

/// Default distance between consecutive samples on a curve, in canvas units
pub const DEFAULT_REFINEMENT: f64 = 18.0;

/// Settings for turning shapes into level objects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    /// Curve sampling distance and simplification area bound
    pub refinement: f64,
    /// Split polygons into convex parts
    pub convex: bool,
    pub decompose: DecomposeOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            refinement: DEFAULT_REFINEMENT,
            convex: true,
            decompose: DecomposeOptions::default(),
        }
    }
}

/// Result of baking a whole level
#[derive(Debug, Default)]
pub struct LevelReport {
    pub level: BakedLevel,
    /// Shapes that were skipped, in document order
    pub failures: Vec<ShapeError>,
    /// Validation findings on shapes that were kept
    pub warnings: Vec<String>,
    pub flips: usize,
}

/// Canvas-space outline of a non-circle shape
///
/// Paths are flattened and simplified in their local units before the
/// transform is applied.
pub fn shape_outline(shape: &Shape, refinement: f64) -> Result<Vec<Point>, GeometryError> {
    let local = match &shape.geometry {
        ShapeGeometry::Path(segments) => flatten_and_simplify(segments, refinement)?,
        ShapeGeometry::Polygon(points) => points.clone(),
        ShapeGeometry::Circle { .. } => {
            return Err(GeometryError::InvalidGeometry(
                "circles have no polygon outline".to_string(),
            ));
        }
    };
    Ok(shape.transform.apply_points(&local))
}

/// A baked object with what decomposition reported about it
#[derive(Debug, Clone)]
pub struct BakedShape {
    pub object: LevelObject,
    pub flips: usize,
    pub warnings: Vec<String>,
}

/// Bake one shape into a level object
pub fn process_shape(
    shape: &Shape,
    normalizer: &Normalizer,
    options: &PipelineOptions,
) -> Result<LevelObject, ShapeError> {
    bake_shape(shape, normalizer, options).map(|baked| baked.object)
}

/// Bake one shape, keeping flip counts and validation warnings
pub fn bake_shape(
    shape: &Shape,
    normalizer: &Normalizer,
    options: &PipelineOptions,
) -> Result<BakedShape, ShapeError> {
    let tag = |source| ShapeError::new(shape.id.clone(), source);
    let mut flips = 0;
    let mut warnings = Vec::new();

    let geometry = match &shape.geometry {
        ShapeGeometry::Circle { center, radius } => {
            let radius = normalizer.length(radius * shape.transform.scale_factor());
            if !(radius.is_finite() && radius > 0.0) {
                return Err(tag(GeometryError::InvalidGeometry(format!(
                    "circle radius must be positive, got {}",
                    radius
                ))));
            }
            ObjectGeometry::Circle {
                center: normalizer.point(shape.transform.apply(*center)),
                radius,
            }
        }
        _ => {
            let outline = shape_outline(shape, options.refinement).map_err(tag)?;
            let outline = normalizer.points(&outline);
            if options.convex {
                let decomposition = decompose(&outline, &options.decompose).map_err(tag)?;
                flips = decomposition.flips;
                warnings = validate_decomposition(&decomposition).warnings;
                let convex = decomposition.convex_polygons();
                ObjectGeometry::Polygon {
                    xy: decomposition.polygon,
                    convex: Some(convex),
                }
            } else {
                ObjectGeometry::Polygon {
                    xy: prepare_polygon(&outline).map_err(tag)?,
                    convex: None,
                }
            }
        }
    };

    Ok(BakedShape {
        object: LevelObject {
            id: shape.id.clone(),
            geometry,
            subclass: shape.subclass.clone(),
            script: shape.script.clone(),
        },
        flips,
        warnings,
    })
}

/// Bake every shape, skipping the ones that fail
pub fn process_level(level: &Level, options: &PipelineOptions) -> LevelReport {
    let normalizer = Normalizer::from_canvas(level.width, level.height);
    let mut report = LevelReport::default();

    for layer in &level.layers {
        let mut objects = Vec::with_capacity(layer.shapes.len());

        for shape in &layer.shapes {
            match bake_shape(shape, &normalizer, options) {
                Ok(baked) => {
                    for warning in baked.warnings {
                        log::warn!("{}: {}", shape.id, warning);
                        report.warnings.push(format!("{}: {}", shape.id, warning));
                    }
                    report.flips += baked.flips;
                    objects.push(baked.object);
                }
                Err(err) => {
                    log::warn!("skipping {}", err);
                    report.failures.push(err);
                }
            }
        }

        log::debug!("layer '{}': {} objects", layer.name, objects.len());
        report.level.layers.push(BakedLayer {
            name: layer.name.clone(),
            objects,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Layer;
    use crate::geometry::point::signed_area;
    use crate::geometry::{Affine, Segment};
    use approx::assert_relative_eq;

    fn canvas() -> Normalizer {
        Normalizer::from_canvas(100.0, 50.0)
    }

    #[test]
    fn test_rect_becomes_single_convex_part() {
        let shape = Shape::new("floor", ShapeGeometry::rect(0.0, 40.0, 100.0, 10.0));

        let object = process_shape(&shape, &canvas(), &PipelineOptions::default()).unwrap();

        let ObjectGeometry::Polygon { xy, convex } = object.geometry else {
            panic!("expected polygon");
        };
        assert_eq!(xy.len(), 4);
        let parts = convex.unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0], xy);
        // x spans the full width, y is flipped and width-relative
        for p in &xy {
            assert_relative_eq!(p.x.abs(), 0.5);
            assert!(p.y < -0.14 && p.y > -0.26);
        }
    }

    #[test]
    fn test_convex_off_keeps_outline() {
        let shape = Shape::new("floor", ShapeGeometry::rect(0.0, 40.0, 100.0, 10.0));
        let options = PipelineOptions {
            convex: false,
            ..Default::default()
        };

        let object = process_shape(&shape, &canvas(), &options).unwrap();

        match object.geometry {
            ObjectGeometry::Polygon { xy, convex } => {
                assert!(convex.is_none());
                // Reoriented CCW in level space
                assert_relative_eq!(xy[0].x, -0.5);
                assert_relative_eq!(xy[0].y, -0.25);
                assert!(signed_area(&xy) > 0.0);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_circle_is_transformed_not_triangulated() {
        let shape = Shape::new(
            "bumper",
            ShapeGeometry::Circle {
                center: Point::new(10.0, 10.0),
                radius: 5.0,
            },
        )
        .with_transform(Affine::scale(2.0, 2.0));

        let object = process_shape(&shape, &canvas(), &PipelineOptions::default()).unwrap();

        assert_eq!(
            object.geometry,
            ObjectGeometry::Circle {
                center: Point::new(-0.3, 0.05),
                radius: 0.1,
            }
        );
    }

    #[test]
    fn test_path_outline_is_flattened_then_transformed() {
        let segments = vec![
            Segment::line((0.0, 0.0), (40.0, 0.0)),
            Segment::line((40.0, 0.0), (40.0, 40.0)),
            Segment::line((40.0, 40.0), (0.0, 0.0)),
        ];
        let shape = Shape::new("ramp", ShapeGeometry::Path(segments))
            .with_transform(Affine::translate(5.0, 0.0));

        let outline = shape_outline(&shape, 1.0).unwrap();

        assert_eq!(
            outline,
            vec![
                Point::new(5.0, 0.0),
                Point::new(45.0, 0.0),
                Point::new(45.0, 40.0)
            ]
        );
    }

    #[test]
    fn test_degenerate_shape_is_tagged() {
        let shape = Shape::new(
            "sliver",
            ShapeGeometry::Polygon(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]),
        );

        let err = process_shape(&shape, &canvas(), &PipelineOptions::default()).unwrap_err();

        assert_eq!(err.shape, "sliver");
        assert_eq!(err.source, GeometryError::DegenerateInput { points: 2 });
    }

    #[test]
    fn test_process_level_skips_failures() {
        let mut walls = Layer::new("walls");
        walls
            .shapes
            .push(Shape::new("ok", ShapeGeometry::rect(0.0, 0.0, 10.0, 10.0)));
        walls.shapes.push(Shape::new(
            "bad",
            ShapeGeometry::Polygon(vec![Point::new(0.0, 0.0)]),
        ));
        let level = Level {
            width: 100.0,
            height: 50.0,
            layers: vec![walls],
        };

        let report = process_level(&level, &PipelineOptions::default());

        assert_eq!(report.level.object_count(), 1);
        assert_eq!(report.level.layers[0].objects[0].id, "ok");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].shape, "bad");
        assert!(report.warnings.is_empty());
    }
}
