// src/model/lot.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::geometry::{polygon_area, BoundingBox, Point2D};

/// Mutable descriptive record attached to every lot.
///
/// The typed fields are the attributes the editor understands; everything
/// else an imported feature carried is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LotInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,

    /// Street-facing width, when surveyed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontage: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Usage kind, e.g. "residencial", "comercial".
    #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Source properties carried through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One parcel entity: identity, polygon ring, derived center and info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    /// Globally unique id, always `<block>-<number>`.
    pub id: String,

    /// Owning block id.
    pub block: String,

    /// Lot number, unique within its block.
    #[serde(rename = "lot")]
    pub number: String,

    /// Polygon ring in emission order. Winding is whatever the producer
    /// emitted; it is never normalized.
    pub coordinates: Vec<Point2D>,

    /// Derived display anchor (bounding-box midpoint); not authoritative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<Point2D>,

    #[serde(default)]
    pub info: LotInfo,
}

impl Lot {
    /// Builds a lot with its id derived from the owning block and number and
    /// its center derived from the ring.
    pub fn new(block: &str, number: &str, coordinates: Vec<Point2D>) -> Self {
        let center = BoundingBox::from_points(&coordinates).map(|b| b.midpoint());
        Lot {
            id: format!("{}-{}", block, number),
            block: block.to_string(),
            number: number.to_string(),
            coordinates,
            center,
            info: LotInfo::default(),
        }
    }

    /// Recomputes the derived center after the ring changed.
    pub fn refresh_center(&mut self) {
        self.center = BoundingBox::from_points(&self.coordinates).map(|b| b.midpoint());
    }

    /// Ring area by the shoelace formula; `None` for degenerate rings.
    pub fn ring_area(&self) -> Option<f64> {
        polygon_area(&self.coordinates)
    }

    /// Translates the whole ring (and derived center) by the given delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for point in &mut self.coordinates {
            point.x += dx;
            point.y += dy;
        }
        self.refresh_center();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, side: f64) -> Vec<Point2D> {
        vec![
            Point2D::new(x, y),
            Point2D::new(x + side, y),
            Point2D::new(x + side, y + side),
            Point2D::new(x, y + side),
        ]
    }

    #[test]
    fn test_id_derivation() {
        let lot = Lot::new("10", "3", square(0.0, 0.0, 8.0));
        assert_eq!(lot.id, "10-3");
        assert_eq!(lot.block, "10");
        assert_eq!(lot.number, "3");
    }

    #[test]
    fn test_center_is_bbox_midpoint() {
        let lot = Lot::new("1", "1", square(2.0, 4.0, 10.0));
        assert_eq!(lot.center, Some(Point2D::new(7.0, 9.0)));
    }

    #[test]
    fn test_translate_moves_ring_and_center() {
        let mut lot = Lot::new("1", "1", square(0.0, 0.0, 10.0));
        lot.translate(5.0, -2.0);
        assert_eq!(lot.coordinates[0], Point2D::new(5.0, -2.0));
        assert_eq!(lot.center, Some(Point2D::new(10.0, 3.0)));
    }

    #[test]
    fn test_info_roundtrip_keeps_extra() {
        let mut info = LotInfo::default();
        info.area = Some(160.0);
        info.extra
            .insert("matricula".to_string(), serde_json::json!("XII-45"));
        let text = serde_json::to_string(&info).unwrap();
        let back: LotInfo = serde_json::from_str(&text).unwrap();
        assert_eq!(back, info);
    }
}
