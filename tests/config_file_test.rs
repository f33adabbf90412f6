use uhi_explorer::domain::model::ClassificationMode;
use uhi_explorer::domain::ports::MapConfigProvider;
use uhi_explorer::utils::validation::Validate;
use uhi_explorer::MapConfig;
use std::io::Write;
use tempfile::NamedTempFile;

const FULL_CONFIG: &str = r##"
[style]
access_token = "pk.integration-test"
url = "mapbox://styles/someone/citystyle"

[tileset]
url = "mapbox://someone.citytiles"
source_layer = "City_UHI"

[overlay]
url = "mapbox://someone.boroughs"
source_layer = "City_Boroughs"

[fields]
id = "FID"
name = "district"
temp = "summer_temp"
green = "pct_green"

[[fields.details]]
key = "summer_temp"
label = "Summer temp"
unit = "°C"

[[fields.details]]
key = "pct_green"
label = "Green cover"
unit = "%"

[view]
center = { lng = 2.3522, lat = 48.8566 }
zoom = 11.0
min_zoom = 9.0
max_zoom = 16.0

[classification.heat]
breaks = [20.0, 21.0, 22.0, 23.0, 24.0]
colors = ["#fee5d9", "#fcae91", "#fb6a4a", "#de2d26", "#a50f15"]
colors_cb = ["#f7fbff", "#c6dbef", "#6baed6", "#2171b5", "#08306b"]

[classification.green]
breaks = [0.0, 15.0, 30.0, 45.0, 60.0]
colors = ["#ffffcc", "#c2e699", "#78c679", "#31a354", "#006837"]
colors_cb = ["#f7fcf5", "#c7e9c0", "#74c476", "#238b45", "#00441b"]

[thresholds]
heat_default = 22.5
green_default = 12.0
heat_range = [18.0, 26.0]
green_range = [0.0, 80.0]
"##;

#[test]
fn test_full_config_round_trip_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FULL_CONFIG.as_bytes()).unwrap();

    let config = MapConfig::from_file(file.path()).unwrap();
    config.validate().unwrap();

    assert_eq!(config.fields().id, "FID");
    assert_eq!(config.fields().details.len(), 2);
    assert_eq!(config.tileset().source_layer, "City_UHI");
    assert_eq!(config.overlay().unwrap().source_layer, "City_Boroughs");
    assert_eq!(config.initial_view().zoom, 11.0);
    assert_eq!(
        config.bands(ClassificationMode::Temperature).breaks,
        [20.0, 21.0, 22.0, 23.0, 24.0]
    );
    assert_eq!(config.default_thresholds().green, 12.0);
    assert_eq!(
        config.threshold_domain(ClassificationMode::Temperature),
        (18.0, 26.0)
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let err = MapConfig::from_file("/nonexistent/uhi.toml").unwrap_err();
    assert!(matches!(err, uhi_explorer::MapError::IoError(_)));
}

#[test]
fn test_malformed_toml_is_config_error() {
    let err = MapConfig::from_toml_str("[style\naccess_token = ").unwrap_err();
    assert!(matches!(
        err,
        uhi_explorer::MapError::ConfigValidationError { .. }
    ));
}

#[test]
fn test_shipped_london_preset_parses_and_validates() {
    std::env::set_var("MAPBOX_ACCESS_TOKEN", "pk.ci-placeholder");

    let config = MapConfig::from_file(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/config/london.toml"
    ))
    .unwrap();
    config.validate().unwrap();

    assert_eq!(config.fields().name, "neighborhood");
    assert_eq!(config.fields().details.len(), 13);
    assert_eq!(config.style_url(), "mapbox://styles/3044551c/cmlomc4jn001501s4hbz8792e");
    assert_eq!(config.access_token(), "pk.ci-placeholder");

    std::env::remove_var("MAPBOX_ACCESS_TOKEN");
}
