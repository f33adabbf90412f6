//! Builders for the declarative expressions handed to the rendering
//! surface. The engine never interprets these itself except through
//! `core::eval`, which mirrors the surface's semantics.

use crate::core::classify;
use crate::domain::model::{ClassBands, FeatureId, FieldMap, FilterPreset, ThresholdState};
use serde_json::{json, Value};

/// Identifier guaranteed never to occur in real data. The surface's filter
/// language wants a value, not an absence, so "highlight nothing" is spelled
/// as an equality check against this. It exists only at this boundary;
/// everything upstream carries `Option<FeatureId>`.
pub const NO_MATCH_ID: FeatureId = -999_999;

/// 5-class step color expression over the given attribute.
pub fn step_color(field: &str, bands: &ClassBands, color_blind: bool) -> Value {
    let c = classify::ramp(bands, color_blind);
    let b = &bands.breaks;
    json!([
        "step",
        ["to-number", ["get", field]],
        c[0].as_str(),
        b[1], c[1].as_str(),
        b[2], c[2].as_str(),
        b[3], c[3].as_str(),
        b[4], c[4].as_str()
    ])
}

/// Active layer filter for a preset, or `None` when every feature passes.
/// Attribute values that fail `to-number` cannot satisfy either comparison,
/// so unparseable features drop out of Hot/LowGreen results.
pub fn preset_filter(
    fields: &FieldMap,
    preset: FilterPreset,
    thresholds: ThresholdState,
) -> Option<Value> {
    match preset {
        FilterPreset::None => None,
        FilterPreset::HotOnly => Some(json!([
            ">=",
            ["to-number", ["get", fields.temp.as_str()]],
            thresholds.heat
        ])),
        FilterPreset::HotAndLowGreen => Some(json!([
            "all",
            [">=", ["to-number", ["get", fields.temp.as_str()]], thresholds.heat],
            ["<=", ["to-number", ["get", fields.green.as_str()]], thresholds.green]
        ])),
    }
}

/// Exact-id highlight filter; `None` becomes the no-match sentinel.
pub fn highlight_filter(id_field: &str, target: Option<FeatureId>) -> Value {
    json!(["==", ["get", id_field], target.unwrap_or(NO_MATCH_ID)])
}
