// src/model/spatial.rs

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::{Block, Lot};

/// Dimensions of the background plan image the map surface renders against.
/// Model bounds are this fixed constant, never derived from the geometry.
pub const MODEL_BOUNDS: (f64, f64) = (1447.0, 1034.0);

/// The full ordered collection of blocks produced by one ingestion pass.
///
/// A model is built fresh every time a source is (re-)ingested; producers
/// never patch a previously returned one. After construction it is handed to
/// the editor session, which owns all further mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialModel {
    pub blocks: Vec<Block>,

    /// Output bounds `(width, height)` of the whole model.
    pub bounds: (f64, f64),
}

impl Default for SpatialModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialModel {
    pub fn new() -> Self {
        SpatialModel {
            blocks: Vec::new(),
            bounds: MODEL_BOUNDS,
        }
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// All lots across all blocks, in block order.
    pub fn lots(&self) -> impl Iterator<Item = &Lot> {
        self.blocks.iter().flat_map(|b| b.lots.iter())
    }

    pub fn lot_count(&self) -> usize {
        self.blocks.iter().map(|b| b.lots.len()).sum()
    }

    pub fn find_lot(&self, id: &str) -> Option<&Lot> {
        self.lots().find(|l| l.id == id)
    }

    pub fn find_lot_mut(&mut self, id: &str) -> Option<&mut Lot> {
        self.blocks
            .iter_mut()
            .flat_map(|b| b.lots.iter_mut())
            .find(|l| l.id == id)
    }

    /// Sum of the lots' recorded areas; lots without one contribute nothing.
    pub fn total_area(&self) -> f64 {
        self.lots().filter_map(|l| l.info.area).sum()
    }

    /// Content checksum over all blocks, folded in parallel. The editor uses
    /// it to tell the last saved snapshot from the present one.
    pub fn checksum(&self) -> u32 {
        self.blocks
            .par_iter()
            .map(|block| {
                let mut crc = 0u32;
                checksum_block(&mut crc, block);
                crc
            })
            .reduce(|| 0u32, |a, b| a.wrapping_add(b))
    }
}

// --- Checksum helper functions ---

fn add_crc(crc: &mut u32, value: u32) {
    *crc = crc.wrapping_add(value);
}

fn crc_f64(crc: &mut u32, value: f64) {
    let bits = value.to_bits();
    add_crc(crc, bits as u32);
    add_crc(crc, (bits >> 32) as u32);
}

fn crc_str(crc: &mut u32, value: &str) {
    for byte in value.as_bytes() {
        add_crc(crc, *byte as u32);
    }
}

fn checksum_lot(crc: &mut u32, lot: &Lot) {
    crc_str(crc, &lot.id);
    crc_str(crc, &lot.number);
    for point in &lot.coordinates {
        crc_f64(crc, point.x);
        crc_f64(crc, point.y);
    }
    // The info record is free-form; its serialized form is stable enough to
    // detect edits, which is all the checksum is for.
    if let Ok(text) = serde_json::to_string(&lot.info) {
        crc_str(crc, &text);
    }
}

fn checksum_block(crc: &mut u32, block: &Block) {
    crc_str(crc, &block.id);
    crc_str(crc, &block.name);
    for lot in &block.lots {
        checksum_lot(crc, lot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geometry::Point2D;

    fn sample_model() -> SpatialModel {
        let mut model = SpatialModel::new();
        let mut block = Block::new("1", "Quadra 1");
        block.push_lot(Lot::new(
            "1",
            "1",
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(8.0, 0.0),
                Point2D::new(8.0, 20.0),
                Point2D::new(0.0, 20.0),
            ],
        ));
        block.refresh_center();
        model.blocks.push(block);
        model
    }

    #[test]
    fn test_lookup_by_id() {
        let model = sample_model();
        assert!(model.find_lot("1-1").is_some());
        assert!(model.find_lot("1-2").is_none());
        assert!(model.block("1").is_some());
        assert_eq!(model.lot_count(), 1);
    }

    #[test]
    fn test_bounds_are_the_fixed_constant() {
        let model = sample_model();
        assert_eq!(model.bounds, MODEL_BOUNDS);
    }

    #[test]
    fn test_total_area_sums_recorded_areas() {
        let mut model = sample_model();
        model.find_lot_mut("1-1").unwrap().info.area = Some(160.0);
        assert_eq!(model.total_area(), 160.0);
    }

    #[test]
    fn test_checksum_tracks_edits() {
        let mut model = sample_model();
        let before = model.checksum();
        assert_eq!(before, model.clone().checksum());

        model.find_lot_mut("1-1").unwrap().info.price = Some(35_000.0);
        assert_ne!(before, model.checksum());
    }
}
