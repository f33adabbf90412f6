use anyhow::Result;
use httpmock::prelude::*;
use uhi_explorer::domain::events::BridgeEvent;
use uhi_explorer::domain::model::FilterPreset;
use uhi_explorer::{HttpSurface, MapConfig, MapController};

fn test_config() -> MapConfig {
    let mut config = MapConfig::default();
    config.style.access_token = "pk.test".to_string();
    config
}

#[tokio::test]
async fn test_startup_registers_sources_and_layers() -> Result<()> {
    let server = MockServer::start();

    let init_mock = server.mock(|when, then| {
        when.method(POST).path("/init");
        then.status(200);
    });
    let source_mock = server.mock(|when, then| {
        when.method(POST).path("/source");
        then.status(200);
    });
    let layer_mock = server.mock(|when, then| {
        when.method(POST).path("/layer");
        then.status(200);
    });
    let batch_mock = server.mock(|when, then| {
        when.method(POST).path("/batch");
        then.status(200);
    });
    let legend_mock = server.mock(|when, then| {
        when.method(POST).path("/legend");
        then.status(200);
    });
    let suggestions_mock = server.mock(|when, then| {
        when.method(POST).path("/suggestions");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(POST).path("/query");
        then.status(200).json_body(serde_json::json!([]));
    });

    let surface = HttpSurface::new(&server.base_url())?;
    let mut controller = MapController::new(surface, test_config());

    controller.initialize().await?;
    controller.handle(BridgeEvent::Load).await?;

    init_mock.assert();
    source_mock.assert_hits(2); // choropleth tileset + borough overlay
    layer_mock.assert_hits(5); // fill, outline, hover, hotspot, borough
    batch_mock.assert(); // initial filter applied so view matches defaults
    legend_mock.assert();
    suggestions_mock.assert();

    Ok(())
}

#[tokio::test]
async fn test_filter_changes_reach_bridge_as_single_batches() -> Result<()> {
    let server = MockServer::start();

    let batch_mock = server.mock(|when, then| {
        when.method(POST).path("/batch");
        then.status(200);
    });

    let surface = HttpSurface::new(&server.base_url())?;
    let mut controller = MapController::new(surface, test_config());

    controller
        .handle(BridgeEvent::SetPreset {
            preset: FilterPreset::HotOnly,
        })
        .await?;
    controller
        .handle(BridgeEvent::SetHeatThreshold { value: 19.0 })
        .await?;
    controller
        .handle(BridgeEvent::SetPreset {
            preset: FilterPreset::HotAndLowGreen,
        })
        .await?;

    // three control changes, exactly three batches, no partial updates
    batch_mock.assert_hits(3);

    Ok(())
}

#[tokio::test]
async fn test_hotspot_batch_carries_visibility_and_filter_together() -> Result<()> {
    let server = MockServer::start();

    // the combined preset must deliver the hotspot visibility toggle in the
    // same request as the layer filters
    let batch_mock = server.mock(|when, then| {
        when.method(POST).path("/batch").matches(|req| {
            let body = req.body.clone().unwrap_or_default();
            let ops: serde_json::Value = match serde_json::from_slice(&body) {
                Ok(v) => v,
                Err(_) => return false,
            };
            let Some(arr) = ops.as_array() else {
                return false;
            };
            let shows_hotspot = arr.iter().any(|op| {
                op["op"] == "set_visibility"
                    && op["layer"] == "hotspot-outline"
                    && op["visible"] == true
            });
            let filters_fill = arr
                .iter()
                .any(|op| op["op"] == "set_filter" && op["layer"] == "uhi-fill");
            shows_hotspot && filters_fill
        });
        then.status(200);
    });

    let surface = HttpSurface::new(&server.base_url())?;
    let mut controller = MapController::new(surface, test_config());

    controller.handle(BridgeEvent::ShowHotspots).await?;

    batch_mock.assert();

    Ok(())
}

#[tokio::test]
async fn test_reset_view_moves_camera() -> Result<()> {
    let server = MockServer::start();

    let ease_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/camera/ease")
            .json_body(serde_json::json!({
                "center": { "lng": -0.1276, "lat": 51.5072 },
                "zoom": 9.7,
                "duration_ms": 900
            }));
        then.status(200);
    });

    let surface = HttpSurface::new(&server.base_url())?;
    let mut controller = MapController::new(surface, test_config());

    controller.handle(BridgeEvent::ResetView).await?;

    ease_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_bridge_error_does_not_stop_the_engine() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/batch");
        then.status(502);
    });
    let notice_mock = server.mock(|when, then| {
        when.method(POST).path("/notice");
        then.status(200);
    });

    let surface = HttpSurface::new(&server.base_url())?;
    let mut controller = MapController::new(surface, test_config());

    // a rejected batch surfaces as an error the caller logs and moves past
    let result = controller
        .handle(BridgeEvent::SetPreset {
            preset: FilterPreset::HotOnly,
        })
        .await;
    assert!(result.is_err());

    // the controller stays usable afterwards
    controller
        .handle(BridgeEvent::Search {
            query: "soho".to_string(),
        })
        .await?;
    notice_mock.assert();

    Ok(())
}
