// src/ingest/config.rs

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::ingest::IngestError;

/// Layout family of a configured block.
///
/// Anything the plan format does not recognize collapses into `Unknown`,
/// which generates no lots instead of failing the whole plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    /// Two columns of stacked rectangular lots.
    Rect,
    /// A fixed lot count in a two-column zig-zag, rotated as a rigid unit.
    Angled,
    /// Outline drawn by hand in the editor; the generator emits no lots.
    Irregular,
    /// Unrecognized type string, preserved so the plan round-trips.
    Unknown(String),
}

impl From<String> for BlockKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "rect" => BlockKind::Rect,
            "angled" => BlockKind::Angled,
            "irregular" => BlockKind::Irregular,
            _ => BlockKind::Unknown(value),
        }
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Rect => "rect".to_string(),
            BlockKind::Angled => "angled".to_string(),
            BlockKind::Irregular => "irregular".to_string(),
            BlockKind::Unknown(value) => value,
        }
    }
}

/// Declarative description of one block, as read from a plan file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    pub id: u32,

    /// Block origin in plan coordinates.
    pub x: f64,
    pub y: f64,

    /// Rigid rotation of the whole block about its origin, in degrees.
    #[serde(default)]
    pub rotation: f64,

    #[serde(rename = "type")]
    pub kind: BlockKind,

    /// Rows per column for `rect` blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,

    /// Accepted for compatibility with older plan files; the rect layout is
    /// always two columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,

    /// First lot number; numbering continues sequentially from here.
    #[serde(default = "default_lot_start")]
    pub lot_start: u32,

    /// Lot count for `angled` blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_depth: Option<f64>,
}

fn default_lot_start() -> u32 {
    1
}

/// An ordered plan of block configurations, keyed by block id.
///
/// The id→config map makes the uniqueness invariant structural: inserting a
/// configuration whose id is already present replaces the earlier one in its
/// original position. Last write wins, and the replacement is logged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockPlan {
    order: Vec<u32>,
    configs: HashMap<u32, BlockConfig>,
}

impl BlockPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs(configs: Vec<BlockConfig>) -> Self {
        let mut plan = BlockPlan::new();
        for config in configs {
            plan.insert(config);
        }
        plan
    }

    /// Parses a plan from a JSON array of configurations.
    pub fn from_json(text: &str) -> Result<Self, IngestError> {
        let configs: Vec<BlockConfig> = serde_json::from_str(text)?;
        Ok(Self::from_configs(configs))
    }

    /// Reads and parses a plan file.
    pub fn from_path(path: &std::path::Path) -> Result<Self, IngestError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn insert(&mut self, config: BlockConfig) {
        let id = config.id;
        if self.configs.insert(id, config).is_some() {
            warn!("block config {} given twice, keeping the later one", id);
        } else {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: u32) -> Option<&BlockConfig> {
        self.configs.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.configs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Configurations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockConfig> {
        self.order.iter().filter_map(|id| self.configs.get(id))
    }
}

/// How a plan turns into blocks. Selected explicitly at call time.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationStrategy {
    /// Lay out exactly the blocks the plan describes.
    Manual,
    /// Ignore per-block origins and synthesize a regular `columns × rows`
    /// grid of rect blocks, each with `block_rows` lot rows.
    GridFill {
        columns: u32,
        rows: u32,
        block_rows: u32,
    },
}
