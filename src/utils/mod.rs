// src/utils/mod.rs
pub mod geometry;

pub use geometry::{polygon_area, BoundingBox, Point2D};
