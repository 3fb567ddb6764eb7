//! Render module - geometry synthesis and text output

mod geometry;
mod summary;

pub use geometry::{
    golden_spiral_point, hexagon_point, synthesize, GeometryParams, GeometryPoint, Shape,
    DEFAULT_STEPS, HEXAGON_ACTIVITY_THRESHOLD,
};
pub use summary::{summarize, DEFAULT_PREVIEW};
