// src/model/mod.rs
pub mod block;
pub mod lot;
pub mod spatial;

pub use block::Block;
pub use lot::{Lot, LotInfo};
pub use spatial::{SpatialModel, MODEL_BOUNDS};
