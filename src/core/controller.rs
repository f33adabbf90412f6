use crate::core::{classify, expression, popup, search::SearchIndex, state::EngineState};
use crate::domain::events::BridgeEvent;
use crate::domain::model::{
    ClassificationMode, FeatureRecord, FilterPreset, LayerKind, LayerOp, LayerSpec, Legend,
    LngLat, ScreenPoint, SearchOutcome,
};
use crate::domain::ports::{MapConfigProvider, RenderSurface};
use crate::utils::error::Result;
use serde_json::json;

pub const SOURCE_ID: &str = "uhi";
pub const OVERLAY_SOURCE_ID: &str = "borough";
pub const FILL_LAYER: &str = "uhi-fill";
pub const OUTLINE_LAYER: &str = "uhi-outline";
pub const HOVER_LAYER: &str = "uhi-hover";
pub const HOTSPOT_LAYER: &str = "hotspot-outline";
pub const OVERLAY_LAYER: &str = "borough-boundary";

const SUGGESTION_CAP: usize = 2000;
const RESET_EASE_MS: u64 = 900;
const SEARCH_ZOOM_FLOOR: f64 = 12.0;
const SEARCH_FLY_SPEED: f64 = 1.2;

/// Event-driven choropleth controller. Every recomputation happens
/// synchronously inside one event invocation: read state, compute the
/// declarative update, hand it to the surface in a single batch.
pub struct MapController<S: RenderSurface, C: MapConfigProvider> {
    surface: S,
    config: C,
    state: EngineState,
    index: SearchIndex,
}

impl<S: RenderSurface, C: MapConfigProvider> MapController<S, C> {
    pub fn new(surface: S, config: C) -> Self {
        let state = EngineState::new(config.default_thresholds());
        Self {
            surface,
            config,
            state,
            index: SearchIndex::new(),
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Hands the surface its style and initial camera. Layer registration
    /// waits for the surface's load event.
    pub async fn initialize(&self) -> Result<()> {
        tracing::info!("🗺️  Initializing map view");
        self.surface
            .init_map(
                self.config.access_token(),
                self.config.style_url(),
                self.config.initial_view(),
            )
            .await
    }

    pub async fn handle(&mut self, event: BridgeEvent) -> Result<()> {
        match event {
            BridgeEvent::Load => self.on_load().await,
            BridgeEvent::Error {
                message,
                stack,
                resource,
            } => {
                self.on_surface_error(message, stack, resource);
                Ok(())
            }
            BridgeEvent::PointerMove { point, feature, .. } => {
                self.on_pointer_move(point, feature).await
            }
            BridgeEvent::PointerLeave => self.on_pointer_leave().await,
            BridgeEvent::Click { lng_lat, feature } => self.on_click(lng_lat, feature).await,
            BridgeEvent::MoveEnd => self.refresh_suggestions().await,
            BridgeEvent::SetMode { mode } => self.set_mode(mode).await,
            BridgeEvent::SetHeatThreshold { value } => {
                self.state
                    .set_heat_threshold(value, self.config.threshold_domain(ClassificationMode::Temperature));
                self.apply_filter().await
            }
            BridgeEvent::SetGreenThreshold { value } => {
                self.state
                    .set_green_threshold(value, self.config.threshold_domain(ClassificationMode::GreenCover));
                self.apply_filter().await
            }
            BridgeEvent::SetPreset { preset } => {
                self.state.preset = preset;
                self.apply_filter().await
            }
            BridgeEvent::SetColorBlind { enabled } => self.set_color_blind(enabled).await,
            BridgeEvent::ResetView => self.reset_view().await,
            BridgeEvent::ShowHotspots => self.show_hotspots().await,
            BridgeEvent::ClearFilter => {
                self.state.preset = FilterPreset::None;
                self.apply_filter().await
            }
            BridgeEvent::Search { query } => self.search(&query).await,
            BridgeEvent::RefreshSuggestions => self.refresh_suggestions().await,
        }
    }

    /// Registers the full layer stack once the surface reports its style is
    /// ready, then brings paint, filter, legend and suggestions in line with
    /// the current state so the view starts consistent with the defaults.
    async fn on_load(&mut self) -> Result<()> {
        tracing::info!("✅ Surface loaded, registering layers");
        let tileset = self.config.tileset();
        let id_field = self.config.fields().id.clone();

        self.surface
            .add_vector_source(SOURCE_ID, &tileset.url)
            .await?;

        self.surface
            .add_layer(&LayerSpec {
                id: FILL_LAYER.to_string(),
                kind: LayerKind::Fill,
                source: SOURCE_ID.to_string(),
                source_layer: tileset.source_layer.clone(),
                paint: json!({
                    "fill-color": self.fill_color(),
                    "fill-opacity": 0.70
                }),
                layout: None,
                filter: None,
            })
            .await?;

        self.surface
            .add_layer(&LayerSpec {
                id: OUTLINE_LAYER.to_string(),
                kind: LayerKind::Line,
                source: SOURCE_ID.to_string(),
                source_layer: tileset.source_layer.clone(),
                paint: json!({
                    "line-color": "rgba(0,0,0,0.25)",
                    "line-width": 0.6
                }),
                layout: None,
                filter: None,
            })
            .await?;

        self.surface
            .add_layer(&LayerSpec {
                id: HOVER_LAYER.to_string(),
                kind: LayerKind::Line,
                source: SOURCE_ID.to_string(),
                source_layer: tileset.source_layer.clone(),
                paint: json!({
                    "line-color": "#00FFFF",
                    "line-width": 2
                }),
                layout: None,
                filter: Some(expression::highlight_filter(&id_field, None)),
            })
            .await?;

        self.surface
            .add_layer(&LayerSpec {
                id: HOTSPOT_LAYER.to_string(),
                kind: LayerKind::Line,
                source: SOURCE_ID.to_string(),
                source_layer: tileset.source_layer.clone(),
                paint: json!({
                    "line-color": "#ffbf00",
                    "line-width": 2.5,
                    "line-opacity": 0.95
                }),
                layout: Some(json!({ "visibility": "none" })),
                filter: Some(expression::highlight_filter(&id_field, None)),
            })
            .await?;

        if let Some(overlay) = self.config.overlay() {
            self.surface
                .add_vector_source(OVERLAY_SOURCE_ID, &overlay.url)
                .await?;
            self.surface
                .add_layer(&LayerSpec {
                    id: OVERLAY_LAYER.to_string(),
                    kind: LayerKind::Line,
                    source: OVERLAY_SOURCE_ID.to_string(),
                    source_layer: overlay.source_layer.clone(),
                    paint: json!({
                        "line-color": "#000",
                        "line-width": 1.0,
                        "line-opacity": 0.8
                    }),
                    layout: None,
                    filter: None,
                })
                .await?;
        }

        self.surface.render_legend(&self.legend()).await?;
        self.apply_filter().await?;
        self.refresh_suggestions().await
    }

    fn on_surface_error(
        &self,
        message: Option<String>,
        stack: Option<String>,
        resource: Option<String>,
    ) {
        // diagnostic only, matching the surface's non-fatal error contract;
        // worst case is a visually incomplete map
        tracing::error!(
            "❌ Surface error: {}",
            message.as_deref().unwrap_or("(no message)")
        );
        if let Some(stack) = stack {
            tracing::debug!("Surface error stack: {}", stack);
        }
        if let Some(resource) = resource {
            tracing::error!("Surface error resource: {}", resource);
        }
    }

    async fn on_pointer_move(
        &mut self,
        point: ScreenPoint,
        feature: Option<FeatureRecord>,
    ) -> Result<()> {
        let Some(feature) = feature else {
            return Ok(());
        };
        let id = crate::core::search::feature_id(self.config.fields(), &feature);
        let tip = popup::tooltip(self.config.fields(), self.state.mode, &feature);

        self.state.hovered = id;
        if id.is_some() {
            let op = LayerOp::SetFilter {
                layer: HOVER_LAYER.to_string(),
                filter: Some(expression::highlight_filter(&self.config.fields().id, id)),
            };
            self.surface.apply(&[op]).await?;
        }

        self.surface.show_tooltip(point, &tip).await
    }

    async fn on_pointer_leave(&mut self) -> Result<()> {
        self.state.hovered = None;
        let op = LayerOp::SetFilter {
            layer: HOVER_LAYER.to_string(),
            filter: Some(expression::highlight_filter(&self.config.fields().id, None)),
        };
        self.surface.apply(&[op]).await?;
        self.surface.hide_tooltip().await
    }

    async fn on_click(&self, at: LngLat, feature: Option<FeatureRecord>) -> Result<()> {
        let Some(feature) = feature else {
            return Ok(());
        };
        let content = popup::details(self.config.fields(), &feature);
        self.surface.show_popup(at, &content).await
    }

    async fn set_mode(&mut self, mode: ClassificationMode) -> Result<()> {
        self.state.mode = mode;
        // repaint and filter travel in one batch so the choropleth never
        // renders the new ramp against the old filter
        self.state.hovered = None;
        let mut batch = vec![self.repaint_op()];
        batch.extend(self.filter_batch());
        self.surface.apply(&batch).await?;
        self.surface.render_legend(&self.legend()).await
    }

    async fn set_color_blind(&mut self, enabled: bool) -> Result<()> {
        self.state.color_blind = enabled;
        self.surface.apply(&[self.repaint_op()]).await?;
        self.surface.render_legend(&self.legend()).await
    }

    async fn reset_view(&self) -> Result<()> {
        let view = self.config.initial_view();
        self.surface
            .ease_to(view.center, view.zoom, RESET_EASE_MS)
            .await
    }

    /// One-click hotspots: combined preset plus the recommended P80/P20
    /// thresholds, applied as a single filter change.
    async fn show_hotspots(&mut self) -> Result<()> {
        tracing::info!("🔥 Hotspot preset activated");
        self.state.preset = FilterPreset::HotAndLowGreen;
        self.state.thresholds = self.config.default_thresholds();
        self.apply_filter().await
    }

    async fn search(&mut self, query: &str) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        match self.index.lookup(query) {
            SearchOutcome::Found { id, name, anchor } => {
                tracing::info!("🔎 Search hit: {}", name);
                if id.is_some() {
                    self.state.hovered = id;
                    let op = LayerOp::SetFilter {
                        layer: HOVER_LAYER.to_string(),
                        filter: Some(expression::highlight_filter(&self.config.fields().id, id)),
                    };
                    self.surface.apply(&[op]).await?;
                }
                if let Some(anchor) = anchor {
                    self.surface
                        .fly_to(anchor, SEARCH_ZOOM_FLOOR, SEARCH_FLY_SPEED)
                        .await?;
                }
                Ok(())
            }
            SearchOutcome::NotFound => {
                tracing::debug!("Search miss: {}", query);
                self.surface
                    .show_notice(
                        "Not found in current view. Tip: zoom out and refresh the list, then try again.",
                    )
                    .await
            }
        }
    }

    /// Rebuilds the name index from the features currently rendered in the
    /// fill layer. Search stays viewport-scoped: the tile source never hands
    /// the full dataset to this side of the boundary.
    async fn refresh_suggestions(&mut self) -> Result<()> {
        let rendered = self
            .surface
            .query_rendered_features(&[FILL_LAYER])
            .await?;
        self.index.rebuild(self.config.fields(), &rendered);
        tracing::debug!("Search index rebuilt with {} names", self.index.len());

        let names = self.index.suggestions(SUGGESTION_CAP);
        self.surface.set_search_suggestions(&names).await
    }

    /// Recomputes the active filter and pushes every dependent layer in one
    /// batch: fill and outline take the filter, the hover highlight resets,
    /// and the hotspot outline is shown with the combined filter exactly
    /// when the preset asks for it.
    async fn apply_filter(&mut self) -> Result<()> {
        self.state.hovered = None;
        let batch = self.filter_batch();
        self.surface.apply(&batch).await
    }

    fn filter_batch(&self) -> Vec<LayerOp> {
        let fields = self.config.fields();
        let filter = expression::preset_filter(fields, self.state.preset, self.state.thresholds);
        let cleared = expression::highlight_filter(&fields.id, None);

        let mut batch = vec![
            LayerOp::SetFilter {
                layer: FILL_LAYER.to_string(),
                filter: filter.clone(),
            },
            LayerOp::SetFilter {
                layer: OUTLINE_LAYER.to_string(),
                filter: filter.clone(),
            },
            LayerOp::SetFilter {
                layer: HOVER_LAYER.to_string(),
                filter: Some(cleared.clone()),
            },
        ];

        if self.state.preset == FilterPreset::HotAndLowGreen {
            batch.push(LayerOp::SetFilter {
                layer: HOTSPOT_LAYER.to_string(),
                filter,
            });
            batch.push(LayerOp::SetVisibility {
                layer: HOTSPOT_LAYER.to_string(),
                visible: true,
            });
        } else {
            batch.push(LayerOp::SetVisibility {
                layer: HOTSPOT_LAYER.to_string(),
                visible: false,
            });
            batch.push(LayerOp::SetFilter {
                layer: HOTSPOT_LAYER.to_string(),
                filter: Some(cleared),
            });
        }
        batch
    }

    fn repaint_op(&self) -> LayerOp {
        LayerOp::SetPaint {
            layer: FILL_LAYER.to_string(),
            property: "fill-color".to_string(),
            value: self.fill_color(),
        }
    }

    fn fill_color(&self) -> serde_json::Value {
        let fields = self.config.fields();
        let field = match self.state.mode {
            ClassificationMode::Temperature => &fields.temp,
            ClassificationMode::GreenCover => &fields.green,
        };
        expression::step_color(
            field,
            self.config.bands(self.state.mode),
            self.state.color_blind,
        )
    }

    fn legend(&self) -> Legend {
        classify::legend(
            self.state.mode,
            self.config.bands(self.state.mode),
            self.state.color_blind,
        )
    }
}
