// src/model/block.rs

use log::warn;
use serde::{Deserialize, Serialize};

use crate::model::Lot;
use crate::utils::geometry::Point2D;

/// A quadra: a named group of lots sharing a configuration or a common
/// grouping key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,

    /// Display label, e.g. "Quadra 10".
    pub name: String,

    /// Member lots in generation/parse order, not spatial order.
    #[serde(default)]
    pub lots: Vec<Lot>,

    /// Unweighted mean of the member lots' centers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<Point2D>,
}

impl Block {
    pub fn new(id: &str, name: &str) -> Self {
        Block {
            id: id.to_string(),
            name: name.to_string(),
            lots: Vec::new(),
            center: None,
        }
    }

    /// Adds a lot, keeping insertion order. A lot whose id is already present
    /// replaces the existing one in place: last write wins, and the
    /// replacement is logged so it never happens unnoticed.
    pub fn push_lot(&mut self, lot: Lot) {
        if let Some(existing) = self.lots.iter_mut().find(|l| l.id == lot.id) {
            warn!("block {}: lot {} emitted twice, keeping the later one", self.id, lot.id);
            *existing = lot;
        } else {
            self.lots.push(lot);
        }
    }

    pub fn lot(&self, id: &str) -> Option<&Lot> {
        self.lots.iter().find(|l| l.id == id)
    }

    pub fn lot_mut(&mut self, id: &str) -> Option<&mut Lot> {
        self.lots.iter_mut().find(|l| l.id == id)
    }

    /// Recomputes the block center as the plain arithmetic mean of the member
    /// lots' centers. This is deliberately not an area-weighted centroid;
    /// consumers rely on the exact value.
    pub fn refresh_center(&mut self) {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut count = 0usize;
        for lot in &self.lots {
            if let Some(center) = &lot.center {
                sum_x += center.x;
                sum_y += center.y;
                count += 1;
            }
        }
        self.center = if count == 0 {
            None
        } else {
            Some(Point2D::new(sum_x / count as f64, sum_y / count as f64))
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot_at(block: &str, number: &str, x: f64, y: f64) -> Lot {
        Lot::new(
            block,
            number,
            vec![
                Point2D::new(x, y),
                Point2D::new(x + 4.0, y),
                Point2D::new(x + 4.0, y + 4.0),
                Point2D::new(x, y + 4.0),
            ],
        )
    }

    #[test]
    fn test_push_lot_keeps_order() {
        let mut block = Block::new("7", "Quadra 7");
        block.push_lot(lot_at("7", "1", 0.0, 0.0));
        block.push_lot(lot_at("7", "2", 10.0, 0.0));
        let numbers: Vec<&str> = block.lots.iter().map(|l| l.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2"]);
    }

    #[test]
    fn test_duplicate_id_is_last_write_wins() {
        let mut block = Block::new("7", "Quadra 7");
        block.push_lot(lot_at("7", "1", 0.0, 0.0));
        block.push_lot(lot_at("7", "1", 50.0, 50.0));
        assert_eq!(block.lots.len(), 1);
        assert_eq!(block.lots[0].center, Some(Point2D::new(52.0, 52.0)));
    }

    #[test]
    fn test_center_is_mean_of_lot_centers() {
        let mut block = Block::new("7", "Quadra 7");
        block.push_lot(lot_at("7", "1", 0.0, 0.0)); // center (2, 2)
        block.push_lot(lot_at("7", "2", 8.0, 0.0)); // center (10, 2)
        block.refresh_center();
        assert_eq!(block.center, Some(Point2D::new(6.0, 2.0)));
    }

    #[test]
    fn test_center_of_empty_block() {
        let mut block = Block::new("7", "Quadra 7");
        block.refresh_center();
        assert_eq!(block.center, None);
    }
}
