// src/ingest/features.rs

use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ingest::IngestError;
use crate::model::{Block, Lot, LotInfo, SpatialModel};
use crate::utils::geometry::Point2D;

/// Half the side of the square a `Point` feature is expanded into, so every
/// lot is polygon-shaped downstream.
pub const POINT_HALF_SIZE: f64 = 5.0;

/// An externally supplied geographic feature collection.
///
/// Only the parts the adapter consumes are typed; geometry coordinates stay
/// raw values because malformed entries must degrade, not fail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl FeatureCollection {
    /// Parses a collection from JSON text. This is the only point where the
    /// adapter can fail; everything downstream degrades silently.
    pub fn from_json(text: &str) -> Result<Self, IngestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a collection file.
    pub fn from_path(path: &std::path::Path) -> Result<Self, IngestError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Normalizes a feature collection into the same block/lot shapes the
/// parametric generator produces.
pub struct FeatureAdapter;

impl FeatureAdapter {
    pub fn adapt(collection: &FeatureCollection) -> SpatialModel {
        let mut blocks: Vec<Block> = Vec::new();
        let mut by_quadra: HashMap<String, usize> = HashMap::new();

        for (index, feature) in collection.features.iter().enumerate() {
            let quadra = match feature.properties.get("quadra").and_then(key_string) {
                Some(quadra) => quadra,
                None => {
                    debug!("feature {}: no quadra property, dropped", index);
                    continue;
                }
            };
            let number = feature
                .properties
                .get("lote")
                .and_then(key_string)
                .unwrap_or_else(|| format!("unknown-{}", index));

            let ring = match feature.geometry.as_ref().and_then(lot_ring) {
                Some(ring) => ring,
                None => {
                    debug!("feature {}: no usable geometry, dropped", index);
                    continue;
                }
            };

            let mut lot = Lot::new(&quadra, &number, ring);
            // `Lot::new` centers on the bounding-box midpoint, skipping bad
            // coordinates; when nothing was usable it degrades to the origin.
            if lot.center.is_none() {
                lot.center = Some(Point2D::new(0.0, 0.0));
            }
            lot.info = info_from_properties(&feature.properties);
            if lot.info.area.is_none() {
                lot.info.area = lot.ring_area();
            }

            let slot = *by_quadra.entry(quadra.clone()).or_insert_with(|| {
                blocks.push(Block::new(&quadra, &format!("Quadra {}", quadra)));
                blocks.len() - 1
            });
            blocks[slot].push_lot(lot);
        }

        for block in &mut blocks {
            block.refresh_center();
        }
        blocks.sort_by(|a, b| compare_block_ids(&a.id, &b.id));

        let mut model = SpatialModel::new();
        model.blocks = blocks;
        model
    }
}

/// `quadra`/`lote` values may arrive as numbers or strings; both become the
/// canonical string key. Anything else is treated as absent.
fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Extracts the lot ring from a geometry: a polygon's outer ring (inner
/// rings are holes and are ignored), or the fixed square around a point.
fn lot_ring(geometry: &Geometry) -> Option<Vec<Point2D>> {
    match geometry.kind.as_str() {
        "Polygon" => {
            let outer = geometry.coordinates.as_array()?.first()?.as_array()?;
            Some(outer.iter().map(coordinate).collect())
        }
        "Point" => {
            let pair = geometry.coordinates.as_array()?;
            let x = pair.first().and_then(Value::as_f64)?;
            let y = pair.get(1).and_then(Value::as_f64)?;
            Some(vec![
                Point2D::new(x - POINT_HALF_SIZE, y - POINT_HALF_SIZE),
                Point2D::new(x + POINT_HALF_SIZE, y - POINT_HALF_SIZE),
                Point2D::new(x + POINT_HALF_SIZE, y + POINT_HALF_SIZE),
                Point2D::new(x - POINT_HALF_SIZE, y + POINT_HALF_SIZE),
            ])
        }
        other => {
            debug!("unsupported geometry type {:?}", other);
            None
        }
    }
}

/// One coordinate pair. Non-numeric entries become NaN components so the
/// ring keeps its length; bounds and area computations skip them.
fn coordinate(entry: &Value) -> Point2D {
    let pair = entry.as_array();
    let component = |index: usize| {
        pair.and_then(|p| p.get(index))
            .and_then(Value::as_f64)
            .unwrap_or(f64::NAN)
    };
    Point2D::new(component(0), component(1))
}

/// Builds the lot info record: `quadra`/`lote` are identity, `area`/`tipo`
/// are lifted into typed fields, and every other property is carried through
/// verbatim.
fn info_from_properties(properties: &Map<String, Value>) -> LotInfo {
    let mut info = LotInfo::default();
    for (key, value) in properties {
        match key.as_str() {
            "quadra" | "lote" => {}
            "area" => info.area = value.as_f64(),
            "tipo" => info.kind = value.as_str().map(str::to_string),
            _ => {
                info.extra.insert(key.clone(), value.clone());
            }
        }
    }
    info
}

/// Blocks are grouped in first-seen order, then ordered numerically when
/// both ids parse as integers, lexically otherwise.
fn compare_block_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        _ => a.cmp(b),
    }
}
