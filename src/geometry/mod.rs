pub mod affine;
pub mod flatten;
pub mod normalize;
pub mod point;

pub use affine::{Affine, TransformError};
pub use flatten::{PathSegment, Segment, flatten_and_simplify, flatten_path, simplify_polygon};
pub use normalize::Normalizer;
pub use point::Point;
