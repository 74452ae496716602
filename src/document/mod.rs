pub mod model;
pub mod parser;

pub use model::{DocumentError, LayerNode, ShapeDocument, ShapeMeta, ShapeNode};
pub use parser::{document_to_level, parse_document};
