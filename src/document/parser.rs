use super::model::{DocumentError, LayerNode, ShapeDocument, ShapeMeta, ShapeNode};
use crate::domain::{Layer, Level, Shape, ShapeGeometry};
use crate::geometry::{Affine, Point};

/// Parse a JSON shape document into a level
pub fn parse_document(json: &str) -> Result<Level, DocumentError> {
    let document: ShapeDocument = serde_json::from_str(json)?;
    document_to_level(&document)
}

/// Convert a shape document into domain layers
///
/// # Algorithm
/// 1. Lower-case each layer label and parse its transform
/// 2. Walk shapes depth-first, composing group transforms so every shape
///    carries its full local -> canvas transform
/// 3. Name unnamed shapes `<layer>/<index path>`, e.g. `walls/2/0` for the
///    first child of the third shape
pub fn document_to_level(document: &ShapeDocument) -> Result<Level, DocumentError> {
    if !(document.width > 0.0 && document.height > 0.0) {
        return Err(DocumentError::Canvas {
            width: document.width,
            height: document.height,
        });
    }

    let layers = document
        .layers
        .iter()
        .map(parse_layer)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Level {
        width: document.width,
        height: document.height,
        layers,
    })
}

fn parse_layer(node: &LayerNode) -> Result<Layer, DocumentError> {
    let name = node.label.to_lowercase();
    let transform = parse_transform(node.transform.as_deref(), &name)?;
    let mut shapes = Vec::new();
    collect_shapes(&node.shapes, &transform, &name, &mut shapes)?;
    Ok(Layer { name, shapes })
}

fn parse_transform(raw: Option<&str>, location: &str) -> Result<Affine, DocumentError> {
    match raw {
        Some(s) => Affine::parse(s).map_err(|source| DocumentError::Transform {
            location: location.to_string(),
            source,
        }),
        None => Ok(Affine::IDENTITY),
    }
}

fn collect_shapes(
    nodes: &[ShapeNode],
    parent: &Affine,
    prefix: &str,
    out: &mut Vec<Shape>,
) -> Result<(), DocumentError> {
    for (index, node) in nodes.iter().enumerate() {
        let path = format!("{}/{}", prefix, index);

        let (meta, geometry) = match node {
            ShapeNode::Group { transform, shapes } => {
                let own = parse_transform(transform.as_deref(), &path)?;
                collect_shapes(shapes, &parent.multiply(&own), &path, out)?;
                continue;
            }
            ShapeNode::Path { meta, segments } => (meta, ShapeGeometry::Path(segments.clone())),
            ShapeNode::Polygon { meta, points } => (meta, ShapeGeometry::Polygon(points.clone())),
            ShapeNode::Rect {
                meta,
                x,
                y,
                width,
                height,
            } => (meta, ShapeGeometry::rect(*x, *y, *width, *height)),
            ShapeNode::Circle { meta, cx, cy, r } => (
                meta,
                ShapeGeometry::Circle {
                    center: Point::new(*cx, *cy),
                    radius: *r,
                },
            ),
        };

        out.push(build_shape(meta, geometry, parent, path)?);
    }

    Ok(())
}

fn build_shape(
    meta: &ShapeMeta,
    geometry: ShapeGeometry,
    parent: &Affine,
    path: String,
) -> Result<Shape, DocumentError> {
    let id = meta.id.clone().unwrap_or(path);
    let own = parse_transform(meta.transform.as_deref(), &id)?;

    Ok(Shape {
        transform: parent.multiply(&own),
        subclass: meta.subclass.clone(),
        script: meta.script.clone(),
        ..Shape::new(id, geometry)
    })
}
