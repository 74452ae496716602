//! Serde model of the JSON shape document

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{Point, Segment, TransformError};

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to parse shape document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad transform on {location}: {source}")]
    Transform {
        location: String,
        #[source]
        source: TransformError,
    },

    #[error("canvas size must be positive, got {width}x{height}")]
    Canvas { width: f64, height: f64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShapeDocument {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub layers: Vec<LayerNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayerNode {
    pub label: String,
    #[serde(default)]
    pub transform: Option<String>,
    #[serde(default)]
    pub shapes: Vec<ShapeNode>,
}

/// Attributes shared by every drawable shape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShapeMeta {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub transform: Option<String>,
    #[serde(default)]
    pub subclass: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeNode {
    Path {
        #[serde(flatten)]
        meta: ShapeMeta,
        segments: Vec<Segment>,
    },
    Rect {
        #[serde(flatten)]
        meta: ShapeMeta,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        width: f64,
        height: f64,
    },
    Polygon {
        #[serde(flatten)]
        meta: ShapeMeta,
        points: Vec<Point>,
    },
    Circle {
        #[serde(flatten)]
        meta: ShapeMeta,
        cx: f64,
        cy: f64,
        r: f64,
    },
    Group {
        #[serde(default)]
        transform: Option<String>,
        #[serde(default)]
        shapes: Vec<ShapeNode>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_shape_kinds() {
        let json = r#"{
            "width": 800, "height": 600,
            "layers": [{
                "label": "Walls",
                "shapes": [
                    {"kind": "rect", "id": "floor", "width": 10, "height": 5},
                    {"kind": "circle", "cx": 5, "cy": 5, "r": 2, "subclass": "Bumper"},
                    {"kind": "group", "transform": "scale(2)", "shapes": [
                        {"kind": "polygon", "points": [[0, 0], [1, 0], [0, 1]]}
                    ]},
                    {"kind": "path", "segments": [
                        {"type": "line", "start": [0, 0], "end": [10, 0]},
                        {"type": "quadratic", "start": [10, 0], "control": [15, 5], "end": [0, 0]}
                    ]}
                ]
            }]
        }"#;

        let doc: ShapeDocument = serde_json::from_str(json).unwrap();

        assert_eq!(doc.width, 800.0);
        let shapes = &doc.layers[0].shapes;
        assert_eq!(shapes.len(), 4);
        match &shapes[0] {
            ShapeNode::Rect { meta, x, width, .. } => {
                assert_eq!(meta.id.as_deref(), Some("floor"));
                assert_eq!(*x, 0.0);
                assert_eq!(*width, 10.0);
            }
            other => panic!("expected rect, got {:?}", other),
        }
        match &shapes[1] {
            ShapeNode::Circle { meta, r, .. } => {
                assert_eq!(meta.subclass.as_deref(), Some("Bumper"));
                assert_eq!(*r, 2.0);
            }
            other => panic!("expected circle, got {:?}", other),
        }
        assert!(matches!(&shapes[2], ShapeNode::Group { shapes, .. } if shapes.len() == 1));
        assert!(matches!(&shapes[3], ShapeNode::Path { segments, .. } if segments.len() == 2));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"width": 1, "height": 1, "layers": [
            {"label": "a", "shapes": [{"kind": "ellipse"}]}
        ]}"#;
        let result: Result<ShapeDocument, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
