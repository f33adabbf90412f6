use crate::domain::model::{
    ClassBands, ClassificationMode, FeatureRecord, FieldMap, LayerOp, LayerSpec, Legend, LngLat,
    PopupContent, ScreenPoint, ThresholdState, TilesetSpec, TooltipContent, ViewState,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The external rendering surface, treated as a black-box collaborator.
/// The engine only ever hands it declarative data; rendering, tile fetching
/// and vector-tile decoding stay on the other side of this boundary.
#[async_trait]
pub trait RenderSurface: Send + Sync {
    async fn init_map(&self, access_token: &str, style_url: &str, view: &ViewState) -> Result<()>;
    async fn add_vector_source(&self, id: &str, url: &str) -> Result<()>;
    async fn add_layer(&self, spec: &LayerSpec) -> Result<()>;

    /// Applies a whole update batch in one call. Callers rely on this for
    /// the three-way layer sync invariant: no frame may show one dependent
    /// layer updated while another is stale.
    async fn apply(&self, batch: &[LayerOp]) -> Result<()>;

    async fn ease_to(&self, center: LngLat, zoom: f64, duration_ms: u64) -> Result<()>;
    /// `zoom` is a floor: the surface keeps its current zoom when already
    /// closer in.
    async fn fly_to(&self, center: LngLat, zoom: f64, speed: f64) -> Result<()>;

    async fn show_popup(&self, at: LngLat, content: &PopupContent) -> Result<()>;
    async fn show_tooltip(&self, at: ScreenPoint, content: &TooltipContent) -> Result<()>;
    async fn hide_tooltip(&self) -> Result<()>;

    async fn render_legend(&self, legend: &Legend) -> Result<()>;
    async fn set_search_suggestions(&self, names: &[String]) -> Result<()>;
    /// Dismissible user-visible notice (e.g. search miss). Not an error.
    async fn show_notice(&self, message: &str) -> Result<()>;

    /// Features currently rendered on screen within the given layers. Vector
    /// tiles never expose the full dataset client-side, so this is all the
    /// engine can ever see.
    async fn query_rendered_features(&self, layers: &[&str]) -> Result<Vec<FeatureRecord>>;
}

/// Read-only view of the map configuration, everything the controller needs
/// to drive the surface.
pub trait MapConfigProvider: Send + Sync {
    fn access_token(&self) -> &str;
    fn style_url(&self) -> &str;
    fn tileset(&self) -> &TilesetSpec;
    fn overlay(&self) -> Option<&TilesetSpec>;
    fn fields(&self) -> &FieldMap;
    fn bands(&self, mode: ClassificationMode) -> &ClassBands;
    fn initial_view(&self) -> &ViewState;
    fn default_thresholds(&self) -> ThresholdState;
    /// Inclusive slider domain for the mode's attribute; incoming threshold
    /// values are clamped to it.
    fn threshold_domain(&self, mode: ClassificationMode) -> (f64, f64);
}
