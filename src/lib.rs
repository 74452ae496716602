//! shapebake - Bake authored vector shapes into convex polygon level data

pub mod config;
pub mod decompose;
pub mod document;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod level;
pub mod logging;

pub use error::{GeometryError, ShapeError};
