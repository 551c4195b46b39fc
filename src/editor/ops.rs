// src/editor/ops.rs

use crate::model::{Lot, LotInfo, SpatialModel};
use crate::utils::geometry::Point2D;

/// One user-initiated mutation of the model.
///
/// Ops only apply forward; undo is uniform because the editor session
/// snapshots the whole model through its history.
#[derive(Clone, Debug)]
pub enum EditOp {
    /// Replaces a lot's whole info record.
    ReplaceLotInfo { lot_id: String, info: LotInfo },

    /// Updates selected info fields, leaving the rest untouched.
    ModifyLotInfo {
        lot_id: String,
        area: Option<f64>,
        frontage: Option<f64>,
        price: Option<f64>,
        owner: Option<String>,
        notes: Option<String>,
    },

    /// Translates a lot's ring (and derived center) by a delta.
    MoveLot { lot_id: String, dx: f64, dy: f64 },

    /// Adds a hand-drawn lot to an existing block.
    AddLot {
        block_id: String,
        number: String,
        coordinates: Vec<Point2D>,
    },

    /// Removes a lot.
    RemoveLot { lot_id: String },

    /// Renames a block's display label.
    RenameBlock { block_id: String, name: String },

    /// Applies several ops as one history entry.
    Batch { ops: Vec<EditOp> },
}

impl EditOp {
    /// Applies the op to the model. The editor session applies ops to a
    /// working clone, so a failed op (or a partially applied batch) never
    /// reaches the committed state.
    pub fn apply(&self, model: &mut SpatialModel) -> Result<(), String> {
        match self {
            EditOp::Batch { ops } => {
                for op in ops {
                    op.apply(model)?;
                }
                Ok(())
            }
            EditOp::ReplaceLotInfo { lot_id, info } => match model.find_lot_mut(lot_id) {
                Some(lot) => {
                    lot.info = info.clone();
                    Ok(())
                }
                None => Err(format!("Lot {} not found", lot_id)),
            },
            EditOp::ModifyLotInfo {
                lot_id,
                area,
                frontage,
                price,
                owner,
                notes,
            } => match model.find_lot_mut(lot_id) {
                Some(lot) => {
                    if let Some(area) = area {
                        lot.info.area = Some(*area);
                    }
                    if let Some(frontage) = frontage {
                        lot.info.frontage = Some(*frontage);
                    }
                    if let Some(price) = price {
                        lot.info.price = Some(*price);
                    }
                    if let Some(owner) = owner {
                        lot.info.owner = Some(owner.clone());
                    }
                    if let Some(notes) = notes {
                        lot.info.notes = Some(notes.clone());
                    }
                    Ok(())
                }
                None => Err(format!("Lot {} not found", lot_id)),
            },
            EditOp::MoveLot { lot_id, dx, dy } => {
                for block in &mut model.blocks {
                    if let Some(lot) = block.lot_mut(lot_id) {
                        lot.translate(*dx, *dy);
                        block.refresh_center();
                        return Ok(());
                    }
                }
                Err(format!("Lot {} not found", lot_id))
            }
            EditOp::AddLot {
                block_id,
                number,
                coordinates,
            } => {
                if coordinates.len() < 3 {
                    return Err(format!(
                        "Lot {}-{} needs at least 3 points",
                        block_id, number
                    ));
                }
                match model.block_mut(block_id) {
                    Some(block) => {
                        let mut lot = Lot::new(block_id, number, coordinates.clone());
                        lot.info.area = lot.ring_area();
                        block.push_lot(lot);
                        block.refresh_center();
                        Ok(())
                    }
                    None => Err(format!("Block {} not found", block_id)),
                }
            }
            EditOp::RemoveLot { lot_id } => {
                for block in &mut model.blocks {
                    if let Some(position) = block.lots.iter().position(|l| l.id == *lot_id) {
                        block.lots.remove(position);
                        block.refresh_center();
                        return Ok(());
                    }
                }
                Err(format!("Lot {} not found", lot_id))
            }
            EditOp::RenameBlock { block_id, name } => match model.block_mut(block_id) {
                Some(block) => {
                    block.name = name.clone();
                    Ok(())
                }
                None => Err(format!("Block {} not found", block_id)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

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
    fn test_modify_info_merges_fields() {
        let mut model = sample_model();
        let op = EditOp::ModifyLotInfo {
            lot_id: "1-1".to_string(),
            area: Some(160.0),
            frontage: None,
            price: Some(42_000.0),
            owner: Some("Maria".to_string()),
            notes: None,
        };
        op.apply(&mut model).unwrap();
        let info = &model.find_lot("1-1").unwrap().info;
        assert_eq!(info.area, Some(160.0));
        assert_eq!(info.price, Some(42_000.0));
        assert_eq!(info.owner.as_deref(), Some("Maria"));
        assert_eq!(info.notes, None);
    }

    #[test]
    fn test_move_lot_refreshes_block_center() {
        let mut model = sample_model();
        let op = EditOp::MoveLot {
            lot_id: "1-1".to_string(),
            dx: 10.0,
            dy: 0.0,
        };
        op.apply(&mut model).unwrap();
        assert_eq!(
            model.find_lot("1-1").unwrap().center,
            Some(Point2D::new(14.0, 10.0))
        );
        assert_eq!(model.block("1").unwrap().center, Some(Point2D::new(14.0, 10.0)));
    }

    #[test]
    fn test_add_lot_rejects_degenerate_rings() {
        let mut model = sample_model();
        let op = EditOp::AddLot {
            block_id: "1".to_string(),
            number: "2".to_string(),
            coordinates: vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)],
        };
        assert!(op.apply(&mut model).is_err());
        assert_eq!(model.lot_count(), 1);
    }

    #[test]
    fn test_remove_then_missing() {
        let mut model = sample_model();
        let op = EditOp::RemoveLot {
            lot_id: "1-1".to_string(),
        };
        op.apply(&mut model).unwrap();
        assert_eq!(model.lot_count(), 0);
        assert!(op.apply(&mut model).is_err());
    }

    #[test]
    fn test_batch_applies_in_order() {
        let mut model = sample_model();
        let op = EditOp::Batch {
            ops: vec![
                EditOp::RenameBlock {
                    block_id: "1".to_string(),
                    name: "Quadra Central".to_string(),
                },
                EditOp::AddLot {
                    block_id: "1".to_string(),
                    number: "2".to_string(),
                    coordinates: vec![
                        Point2D::new(10.0, 0.0),
                        Point2D::new(18.0, 0.0),
                        Point2D::new(18.0, 20.0),
                        Point2D::new(10.0, 20.0),
                    ],
                },
            ],
        };
        op.apply(&mut model).unwrap();
        assert_eq!(model.block("1").unwrap().name, "Quadra Central");
        assert_eq!(model.lot_count(), 2);
    }
}
