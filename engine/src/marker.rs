use serde::{Deserialize, Serialize};
use terrawatch_shared::{GeoPoint, Rgb};

use crate::record::LayerRecord;

/// Visual encoding of one marker, in the units the renderer expects
/// (radius in pixels, opacities in [0, 1]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill: Rgb,
    pub fill_opacity: f64,
    pub stroke: Rgb,
    pub stroke_opacity: f64,
    pub stroke_weight: f64,
}

/// Human-readable payload shown when a marker is opened. Renderers decide the
/// markup; the engine only supplies a title and detail lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerInfo {
    pub title: String,
    pub lines: Vec<String>,
}

/// One renderable point. Derived deterministically from a single upstream
/// record; the record rides along so selection events can hand it back to the
/// host unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: GeoPoint,
    pub style: MarkerStyle,
    pub info: MarkerInfo,
    pub record: LayerRecord,
}
