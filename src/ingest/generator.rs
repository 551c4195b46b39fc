// src/ingest/generator.rs

use log::debug;

use crate::ingest::config::{BlockConfig, BlockKind, BlockPlan, GenerationStrategy};
use crate::model::{Block, Lot, SpatialModel};
use crate::utils::geometry::Point2D;

/// Default lot footprint, in plan-image units.
pub const DEFAULT_LOT_WIDTH: f64 = 8.0;
pub const DEFAULT_LOT_DEPTH: f64 = 20.0;

/// Gap between neighboring lots within a block.
pub const LOT_GAP: f64 = 2.0;

/// The administration block is placed by hand, not configured: one lot on a
/// fixed anchor, appended after every generated block.
pub const ADMIN_BLOCK_ID: &str = "adm";
pub const ADMIN_BLOCK_NAME: &str = "Administração";
pub const ADMIN_ANCHOR: Point2D = Point2D { x: 700.0, y: 520.0 };
pub const ADMIN_WIDTH: f64 = 30.0;
pub const ADMIN_DEPTH: f64 = 20.0;

// Spacing used by the grid-fill strategy.
const GRID_MARGIN: f64 = 40.0;
const GRID_STREET: f64 = 14.0;

/// Turns block configurations into polygon-bearing blocks.
#[derive(Debug, Clone)]
pub struct PlanGenerator {
    lot_width: f64,
    lot_depth: f64,
    gap: f64,
}

impl Default for PlanGenerator {
    fn default() -> Self {
        PlanGenerator {
            lot_width: DEFAULT_LOT_WIDTH,
            lot_depth: DEFAULT_LOT_DEPTH,
            gap: LOT_GAP,
        }
    }
}

impl PlanGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh model from the plan using the given strategy. The
    /// administration block is appended regardless of the plan contents, and
    /// the model bounds stay the fixed plan-image constant.
    pub fn generate(&self, plan: &BlockPlan, strategy: GenerationStrategy) -> SpatialModel {
        let mut model = SpatialModel::new();
        match strategy {
            GenerationStrategy::Manual => {
                for config in plan.iter() {
                    model.blocks.push(self.build_block(config));
                }
            }
            GenerationStrategy::GridFill {
                columns,
                rows,
                block_rows,
            } => {
                for config in self.grid_configs(columns, rows, block_rows) {
                    model.blocks.push(self.build_block(&config));
                }
            }
        }
        model.blocks.push(self.admin_block());
        model
    }

    /// One block from one configuration. Kinds without a generated layout
    /// produce an empty lot list rather than an error.
    fn build_block(&self, config: &BlockConfig) -> Block {
        let id = config.id.to_string();
        let mut block = Block::new(&id, &format!("Quadra {}", config.id));
        let width = config.lot_width.unwrap_or(self.lot_width);
        let depth = config.lot_depth.unwrap_or(self.lot_depth);

        match &config.kind {
            BlockKind::Rect => {
                // Two columns, always: column 1 fully numbered before column 2.
                let rows = config.rows.unwrap_or(0);
                for col in 0..2u32 {
                    for row in 0..rows {
                        let number = config.lot_start + col * rows + row;
                        block.push_lot(self.rect_lot(config, &id, number, col, row, width, depth));
                    }
                }
            }
            BlockKind::Angled => {
                // Zig-zag: index parity selects the column, index/2 the row.
                let count = config.lot_count.unwrap_or(0);
                for index in 0..count {
                    let number = config.lot_start + index;
                    block.push_lot(self.rect_lot(
                        config,
                        &id,
                        number,
                        index % 2,
                        index / 2,
                        width,
                        depth,
                    ));
                }
            }
            BlockKind::Irregular | BlockKind::Unknown(_) => {
                debug!("block {}: no generated layout for {:?}", id, config.kind);
            }
        }

        block.refresh_center();
        block
    }

    /// One axis-aligned rectangle at `(col, row)` of the block grid, rotated
    /// rigidly about the block origin. Each corner is rotated exactly once.
    fn rect_lot(
        &self,
        config: &BlockConfig,
        block_id: &str,
        number: u32,
        col: u32,
        row: u32,
        width: f64,
        depth: f64,
    ) -> Lot {
        let origin = Point2D::new(config.x, config.y);
        let x0 = config.x + col as f64 * (width + self.gap);
        let y0 = config.y + row as f64 * (depth + self.gap);
        let corners = [
            Point2D::new(x0, y0),
            Point2D::new(x0 + width, y0),
            Point2D::new(x0 + width, y0 + depth),
            Point2D::new(x0, y0 + depth),
        ];
        let ring: Vec<Point2D> = corners
            .iter()
            .map(|corner| corner.rotated_about(&origin, config.rotation))
            .collect();

        let mut lot = Lot::new(block_id, &number.to_string(), ring);
        lot.info.area = lot.ring_area();
        lot
    }

    fn admin_block(&self) -> Block {
        let mut block = Block::new(ADMIN_BLOCK_ID, ADMIN_BLOCK_NAME);
        let ring = vec![
            ADMIN_ANCHOR,
            Point2D::new(ADMIN_ANCHOR.x + ADMIN_WIDTH, ADMIN_ANCHOR.y),
            Point2D::new(ADMIN_ANCHOR.x + ADMIN_WIDTH, ADMIN_ANCHOR.y + ADMIN_DEPTH),
            Point2D::new(ADMIN_ANCHOR.x, ADMIN_ANCHOR.y + ADMIN_DEPTH),
        ];
        let mut lot = Lot::new(ADMIN_BLOCK_ID, "1", ring);
        lot.info.area = lot.ring_area();
        lot.info.kind = Some("administração".to_string());
        block.push_lot(lot);
        block.refresh_center();
        block
    }

    /// Configurations for the grid-fill strategy: rect blocks tiled row by
    /// row across the plan, ids assigned sequentially from 1.
    fn grid_configs(&self, columns: u32, rows: u32, block_rows: u32) -> Vec<BlockConfig> {
        let block_width = 2.0 * self.lot_width + self.gap;
        let block_height = block_rows as f64 * (self.lot_depth + self.gap) - self.gap;
        let mut configs = Vec::new();
        let mut id = 1u32;
        for row in 0..rows {
            for col in 0..columns {
                configs.push(BlockConfig {
                    id,
                    x: GRID_MARGIN + col as f64 * (block_width + GRID_STREET),
                    y: GRID_MARGIN + row as f64 * (block_height + GRID_STREET),
                    rotation: 0.0,
                    kind: BlockKind::Rect,
                    rows: Some(block_rows),
                    cols: None,
                    lot_start: 1,
                    lot_count: None,
                    lot_width: None,
                    lot_depth: None,
                });
                id += 1;
            }
        }
        configs
    }
}
