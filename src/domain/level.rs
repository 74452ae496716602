use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::geometry::Point;

/// Baked geometry in normalised level coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectGeometry {
    Polygon {
        xy: Vec<Point>,
        /// Convex parts partitioning `xy`, absent when decomposition is off
        #[serde(skip_serializing_if = "Option::is_none")]
        convex: Option<Vec<Vec<Point>>>,
    },
    Circle {
        center: Point,
        radius: f64,
    },
}

impl ObjectGeometry {
    pub fn is_finite(&self) -> bool {
        match self {
            ObjectGeometry::Polygon { xy, convex } => {
                xy.iter().all(|p| p.is_finite())
                    && convex
                        .iter()
                        .flatten()
                        .flatten()
                        .all(|p| p.is_finite())
            }
            ObjectGeometry::Circle { center, radius } => center.is_finite() && radius.is_finite(),
        }
    }
}

/// One entry of a layer's `objects` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelObject {
    pub id: String,
    #[serde(flatten)]
    pub geometry: ObjectGeometry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subclass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

impl LevelObject {
    pub fn part_count(&self) -> usize {
        match &self.geometry {
            ObjectGeometry::Polygon {
                convex: Some(parts),
                ..
            } => parts.len(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BakedLayer {
    pub name: String,
    pub objects: Vec<LevelObject>,
}

/// Pipeline output, ready for a level writer
///
/// Serializes as `{"<layer>": {"objects": [...]}, ...}` in layer order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BakedLevel {
    pub layers: Vec<BakedLayer>,
}

#[derive(Serialize)]
struct LayerBody<'a> {
    objects: &'a [LevelObject],
}

impl Serialize for BakedLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.layers.len()))?;
        for layer in &self.layers {
            map.serialize_entry(
                &layer.name,
                &LayerBody {
                    objects: &layer.objects,
                },
            )?;
        }
        map.end()
    }
}

impl BakedLevel {
    pub fn object_count(&self) -> usize {
        self.layers.iter().map(|l| l.objects.len()).sum()
    }

    pub fn part_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| &l.objects)
            .map(LevelObject::part_count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_serializes_flat() {
        let object = LevelObject {
            id: "walls/0".to_string(),
            geometry: ObjectGeometry::Circle {
                center: Point::new(0.25, -0.5),
                radius: 0.125,
            },
            subclass: Some("Bumper".to_string()),
            script: None,
        };
        let json = serde_json::to_value(&object).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "walls/0",
                "center": [0.25, -0.5],
                "radius": 0.125,
                "subclass": "Bumper"
            })
        );
    }

    #[test]
    fn test_level_serializes_as_layer_map() {
        let level = BakedLevel {
            layers: vec![BakedLayer {
                name: "walls".to_string(),
                objects: vec![],
            }],
        };
        assert_eq!(
            serde_json::to_string(&level).unwrap(),
            r#"{"walls":{"objects":[]}}"#
        );
    }

    #[test]
    fn test_part_count() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        let object = LevelObject {
            id: "a".to_string(),
            geometry: ObjectGeometry::Polygon {
                xy: square.clone(),
                convex: Some(vec![square]),
            },
            subclass: None,
            script: None,
        };
        let level = BakedLevel {
            layers: vec![BakedLayer {
                name: "walls".to_string(),
                objects: vec![object],
            }],
        };
        assert_eq!(level.object_count(), 1);
        assert_eq!(level.part_count(), 1);
    }
}
