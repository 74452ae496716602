pub mod json;
pub mod lua;
pub mod pipeline;

pub use json::{level_to_json, write_json};
pub use lua::{level_to_lua, write_lua};
pub use pipeline::{BakedShape, LevelReport, PipelineOptions, bake_shape, process_level, process_shape};
