use crate::domain::model::{
    ClassificationMode, FeatureRecord, FilterPreset, LngLat, ScreenPoint,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Everything the viewer bridge can deliver: surface lifecycle and pointer
/// events plus the UI control changes (sliders, radios, buttons, search box).
/// All of them are handled on one logical thread of control.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    Load,
    /// Non-fatal asynchronous error from the surface (failed tile or style
    /// fetch). Diagnostic only; there is no retry.
    Error {
        message: Option<String>,
        stack: Option<String>,
        resource: Option<String>,
    },
    PointerMove {
        point: ScreenPoint,
        lng_lat: LngLat,
        feature: Option<FeatureRecord>,
    },
    PointerLeave,
    Click {
        lng_lat: LngLat,
        feature: Option<FeatureRecord>,
    },
    MoveEnd,

    SetMode {
        mode: ClassificationMode,
    },
    SetHeatThreshold {
        value: f64,
    },
    SetGreenThreshold {
        value: f64,
    },
    SetPreset {
        preset: FilterPreset,
    },
    SetColorBlind {
        enabled: bool,
    },
    ResetView,
    ShowHotspots,
    ClearFilter,
    Search {
        query: String,
    },
    RefreshSuggestions,
}

/// Wire envelope around a bridge event; `ts` is stamped by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeEnvelope {
    #[serde(default)]
    pub ts: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub event: BridgeEvent,
}
