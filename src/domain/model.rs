use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type FeatureId = i64;

/// Which numeric attribute and color ramp drive the choropleth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationMode {
    #[serde(rename = "temp")]
    Temperature,
    #[serde(rename = "green")]
    GreenCover,
}

/// Which thresholds are combined into the active layer filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterPreset {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "hot")]
    HotOnly,
    #[serde(rename = "hotLowGreen")]
    HotAndLowGreen,
}

/// Live slider values. Thresholds drive filtering; class breaks drive
/// coloring. The two never mix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdState {
    pub heat: f64,
    pub green: f64,
}

/// Five ascending class bounds plus the matching 5-color ramps. Index 0 of
/// `breaks` is the attribute domain floor; indices 1..=4 are the step stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBands {
    pub breaks: [f64; 5],
    pub colors: [String; 5],
    pub colors_cb: [String; 5],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// One rendered map feature as reported by the surface. Attributes are
/// read-only to the engine; `anchor` is a representative coordinate used
/// for camera moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub anchor: Option<LngLat>,
}

impl FeatureRecord {
    pub fn attr(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Best-effort numeric read: numbers pass through, numeric strings are
    /// parsed, everything else is `None`.
    pub fn numeric_attr(&self, key: &str) -> Option<f64> {
        coerce_number(self.attributes.get(key)?)
    }

    pub fn text_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }
}

/// Shared numeric coercion rule for attribute values. A value that fails
/// here lands in the lowest color bucket and is excluded from threshold
/// filters; both sites depend on this one function agreeing with itself.
pub fn coerce_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

/// Hover line shown next to the pointer; the value is the active mode's
/// attribute, `None` when it does not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub name: String,
    pub metric_label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub label: String,
    pub value: Option<f64>,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupContent {
    pub title: String,
    pub feature_id: Option<FeatureId>,
    pub rows: Vec<DetailRow>,
}

/// Attribute names as they appear in the tileset, mapped once at
/// configuration time so the engine never hard-codes dataset columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMap {
    pub id: String,
    pub name: String,
    pub temp: String,
    pub green: String,
    #[serde(default)]
    pub details: Vec<DetailField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailField {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub center: LngLat,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

/// A vector tileset reference: endpoint plus the named layer inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetSpec {
    pub url: String,
    pub source_layer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found {
        id: Option<FeatureId>,
        name: String,
        anchor: Option<LngLat>,
    },
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Fill,
    Line,
}

/// Declarative layer registration handed to the surface once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    pub kind: LayerKind,
    pub source: String,
    pub source_layer: String,
    pub paint: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
}

/// One element of an update batch. A batch is submitted to the surface in a
/// single call so dependent layers never render from a half-applied state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LayerOp {
    SetFilter {
        layer: String,
        filter: Option<serde_json::Value>,
    },
    SetPaint {
        layer: String,
        property: String,
        value: serde_json::Value,
    },
    SetVisibility {
        layer: String,
        visible: bool,
    },
}
