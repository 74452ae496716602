pub mod level;
pub mod shape;

pub use level::{BakedLayer, BakedLevel, LevelObject, ObjectGeometry};
pub use shape::{Layer, Level, Shape, ShapeGeometry};
