use crate::domain::model::{ClassificationMode, FeatureId, FilterPreset, ThresholdState};

/// The whole mutable engine state, owned by the controller and passed into
/// the pure builders. Single writer: every mutation happens inside one
/// event-callback invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineState {
    pub mode: ClassificationMode,
    pub preset: FilterPreset,
    pub thresholds: ThresholdState,
    pub color_blind: bool,
    pub hovered: Option<FeatureId>,
}

impl EngineState {
    pub fn new(defaults: ThresholdState) -> Self {
        Self {
            mode: ClassificationMode::Temperature,
            preset: FilterPreset::None,
            thresholds: defaults,
            color_blind: false,
            hovered: None,
        }
    }

    /// Thresholds are constrained to the attribute domain regardless of what
    /// the control sends.
    pub fn set_heat_threshold(&mut self, value: f64, domain: (f64, f64)) {
        self.thresholds.heat = value.clamp(domain.0, domain.1);
    }

    pub fn set_green_threshold(&mut self, value: f64, domain: (f64, f64)) {
        self.thresholds.green = value.clamp(domain.0, domain.1);
    }
}
