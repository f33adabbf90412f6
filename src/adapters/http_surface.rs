use crate::domain::events::BridgeEnvelope;
use crate::domain::model::{
    FeatureRecord, LayerOp, LayerSpec, Legend, LngLat, PopupContent, ScreenPoint, TooltipContent,
    ViewState,
};
use crate::domain::ports::RenderSurface;
use crate::utils::error::{MapError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

/// JSON-over-HTTP adapter to the viewer bridge hosting the actual map.
/// Each declarative command is one POST; a whole `LayerOp` batch travels in
/// a single request so the bridge can apply it within one frame.
#[derive(Debug, Clone)]
pub struct HttpSurface {
    base: Url,
    client: Client,
}

impl HttpSurface {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| MapError::InvalidConfigValueError {
            field: "bridge_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        Ok(Self {
            base,
            client: Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|e| MapError::ProtocolError {
            message: format!("Cannot build bridge endpoint '{}': {}", path, e),
        })
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        let url = self.endpoint(path)?;
        tracing::debug!("Bridge POST /{}", path);
        let response = self.client.post(url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(MapError::ProtocolError {
                message: format!("Bridge rejected '{}': {}", path, response.status()),
            });
        }
        Ok(())
    }

    /// Long-polls the bridge for the next slice of surface/control events.
    /// An empty vector just means the poll window elapsed quietly.
    pub async fn poll_events(&self) -> Result<Vec<BridgeEnvelope>> {
        let url = self.endpoint("events")?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(MapError::ProtocolError {
                message: format!("Bridge event poll failed: {}", response.status()),
            });
        }
        Ok(response.json::<Vec<BridgeEnvelope>>().await?)
    }
}

#[async_trait]
impl RenderSurface for HttpSurface {
    async fn init_map(&self, access_token: &str, style_url: &str, view: &ViewState) -> Result<()> {
        self.post(
            "init",
            &json!({
                "access_token": access_token,
                "style": style_url,
                "view": view
            }),
        )
        .await
    }

    async fn add_vector_source(&self, id: &str, url: &str) -> Result<()> {
        self.post("source", &json!({ "id": id, "type": "vector", "url": url }))
            .await
    }

    async fn add_layer(&self, spec: &LayerSpec) -> Result<()> {
        self.post("layer", &serde_json::to_value(spec)?).await
    }

    async fn apply(&self, batch: &[LayerOp]) -> Result<()> {
        self.post("batch", &serde_json::to_value(batch)?).await
    }

    async fn ease_to(&self, center: LngLat, zoom: f64, duration_ms: u64) -> Result<()> {
        self.post(
            "camera/ease",
            &json!({ "center": center, "zoom": zoom, "duration_ms": duration_ms }),
        )
        .await
    }

    async fn fly_to(&self, center: LngLat, zoom: f64, speed: f64) -> Result<()> {
        self.post(
            "camera/fly",
            &json!({ "center": center, "zoom": zoom, "speed": speed }),
        )
        .await
    }

    async fn show_popup(&self, at: LngLat, content: &PopupContent) -> Result<()> {
        self.post("popup", &json!({ "at": at, "content": content }))
            .await
    }

    async fn show_tooltip(&self, at: ScreenPoint, content: &TooltipContent) -> Result<()> {
        self.post("tooltip", &json!({ "at": at, "content": content }))
            .await
    }

    async fn hide_tooltip(&self) -> Result<()> {
        self.post("tooltip/hide", &json!({})).await
    }

    async fn render_legend(&self, legend: &Legend) -> Result<()> {
        self.post("legend", &serde_json::to_value(legend)?).await
    }

    async fn set_search_suggestions(&self, names: &[String]) -> Result<()> {
        self.post("suggestions", &json!({ "names": names })).await
    }

    async fn show_notice(&self, message: &str) -> Result<()> {
        self.post("notice", &json!({ "message": message })).await
    }

    async fn query_rendered_features(&self, layers: &[&str]) -> Result<Vec<FeatureRecord>> {
        let url = self.endpoint("query")?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "layers": layers }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MapError::ProtocolError {
                message: format!("Bridge feature query failed: {}", response.status()),
            });
        }
        Ok(response.json::<Vec<FeatureRecord>>().await?)
    }
}
