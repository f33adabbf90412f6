use crate::domain::model::{
    ClassBands, ClassificationMode, DetailField, FieldMap, LngLat, ThresholdState, TilesetSpec,
    ViewState,
};
use crate::domain::ports::MapConfigProvider;
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub style: StyleConfig,
    pub tileset: TilesetSpec,
    pub overlay: Option<TilesetSpec>,
    pub fields: FieldMap,
    pub view: ViewState,
    pub classification: ClassificationConfig,
    pub thresholds: ThresholdConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    pub access_token: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    pub heat: ClassBands,
    pub green: ClassBands,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// P80 of mean temperature across the dataset (computed offline).
    pub heat_default: f64,
    /// P20 of blue/green cover across the dataset (computed offline).
    pub green_default: f64,
    pub heat_range: [f64; 2],
    pub green_range: [f64; 2],
}

impl MapConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string, substituting `${VAR}`
    /// references (the access token usually arrives this way).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| MapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.style.access_token.trim().is_empty() {
            return Err(MapError::MissingConfigError {
                field: "style.access_token".to_string(),
            });
        }
        validation::validate_url("style.url", &self.style.url)?;
        validation::validate_url("tileset.url", &self.tileset.url)?;
        validation::validate_non_empty_string("tileset.source_layer", &self.tileset.source_layer)?;
        if let Some(overlay) = &self.overlay {
            validation::validate_url("overlay.url", &overlay.url)?;
            validation::validate_non_empty_string("overlay.source_layer", &overlay.source_layer)?;
        }

        validation::validate_non_empty_string("fields.id", &self.fields.id)?;
        validation::validate_non_empty_string("fields.name", &self.fields.name)?;
        validation::validate_non_empty_string("fields.temp", &self.fields.temp)?;
        validation::validate_non_empty_string("fields.green", &self.fields.green)?;

        for (name, bands) in [
            ("classification.heat", &self.classification.heat),
            ("classification.green", &self.classification.green),
        ] {
            validation::validate_ascending(&format!("{}.breaks", name), &bands.breaks)?;
            for color in bands.colors.iter().chain(bands.colors_cb.iter()) {
                validation::validate_hex_color(&format!("{}.colors", name), color)?;
            }
        }

        let t = &self.thresholds;
        validation::validate_range(
            "thresholds.heat_default",
            t.heat_default,
            t.heat_range[0],
            t.heat_range[1],
        )?;
        validation::validate_range(
            "thresholds.green_default",
            t.green_default,
            t.green_range[0],
            t.green_range[1],
        )?;

        if self.view.min_zoom > self.view.max_zoom {
            return Err(MapError::InvalidConfigValueError {
                field: "view.min_zoom".to_string(),
                value: self.view.min_zoom.to_string(),
                reason: "min_zoom cannot exceed max_zoom".to_string(),
            });
        }

        Ok(())
    }
}

// The London urban-heat-island preset; class breaks and the P80/P20
// thresholds were computed offline in ArcGIS Pro.
impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style: StyleConfig {
                access_token: String::new(),
                url: "mapbox://styles/3044551c/cmlomc4jn001501s4hbz8792e".to_string(),
            },
            tileset: TilesetSpec {
                url: "mapbox://3044551c.8algotvt".to_string(),
                source_layer: "London_UHI-2jo4a5".to_string(),
            },
            overlay: Some(TilesetSpec {
                url: "mapbox://3044551c.7fwxnfl2".to_string(),
                source_layer: "London_Boroughs-79qglv".to_string(),
            }),
            fields: default_fields(),
            view: ViewState {
                center: LngLat {
                    lng: -0.1276,
                    lat: 51.5072,
                },
                zoom: 9.7,
                min_zoom: 8.0,
                max_zoom: 15.0,
            },
            classification: ClassificationConfig {
                heat: ClassBands {
                    breaks: [17.17, 17.72, 18.26, 18.81, 19.35],
                    colors: [
                        "#fee5d9".to_string(),
                        "#fcae91".to_string(),
                        "#fb6a4a".to_string(),
                        "#de2d26".to_string(),
                        "#a50f15".to_string(),
                    ],
                    colors_cb: [
                        "#f7fbff".to_string(),
                        "#c6dbef".to_string(),
                        "#6baed6".to_string(),
                        "#2171b5".to_string(),
                        "#08306b".to_string(),
                    ],
                },
                green: ClassBands {
                    breaks: [1.41, 20.0, 40.0, 60.0, 93.11],
                    colors: [
                        "#ffffcc".to_string(),
                        "#c2e699".to_string(),
                        "#78c679".to_string(),
                        "#31a354".to_string(),
                        "#006837".to_string(),
                    ],
                    colors_cb: [
                        "#f7fcf5".to_string(),
                        "#c7e9c0".to_string(),
                        "#74c476".to_string(),
                        "#238b45".to_string(),
                        "#00441b".to_string(),
                    ],
                },
            },
            thresholds: ThresholdConfig {
                heat_default: 18.231_944_751_439_27,
                green_default: 24.847_093_292_284_23,
                heat_range: [15.0, 22.0],
                green_range: [0.0, 100.0],
            },
        }
    }
}

fn default_fields() -> FieldMap {
    let details = [
        ("mean_temp", "Mean temp", "°C"),
        ("pct_blue_green", "Blue/Green cover", "%"),
        ("pct_tree", "Tree canopy", "%"),
        ("pct_income_deprived", "Income deprived", "%"),
        ("pm25_conc", "PM2.5", "µg/m³"),
        ("no2_conc", "NO2", "µg/m³"),
        ("pct_flood_risk", "Flood risk", "%"),
        ("pct_no_open_space", "No open space access", "%"),
        ("pct_under5", "Under 5", "%"),
        ("pct_over75", "Over 75", "%"),
        ("pct_not_english", "Not proficient in English", "%"),
        ("pct_social_housing", "Social housing", "%"),
        ("pct_bame", "BAME", "%"),
    ];

    FieldMap {
        id: "OBJECTID".to_string(),
        name: "neighborhood".to_string(),
        temp: "mean_temp".to_string(),
        green: "pct_blue_green".to_string(),
        details: details
            .iter()
            .map(|(key, label, unit)| DetailField {
                key: key.to_string(),
                label: label.to_string(),
                unit: unit.to_string(),
            })
            .collect(),
    }
}

impl MapConfigProvider for MapConfig {
    fn access_token(&self) -> &str {
        &self.style.access_token
    }

    fn style_url(&self) -> &str {
        &self.style.url
    }

    fn tileset(&self) -> &TilesetSpec {
        &self.tileset
    }

    fn overlay(&self) -> Option<&TilesetSpec> {
        self.overlay.as_ref()
    }

    fn fields(&self) -> &FieldMap {
        &self.fields
    }

    fn bands(&self, mode: ClassificationMode) -> &ClassBands {
        match mode {
            ClassificationMode::Temperature => &self.classification.heat,
            ClassificationMode::GreenCover => &self.classification.green,
        }
    }

    fn initial_view(&self) -> &ViewState {
        &self.view
    }

    fn default_thresholds(&self) -> ThresholdState {
        ThresholdState {
            heat: self.thresholds.heat_default,
            green: self.thresholds.green_default,
        }
    }

    fn threshold_domain(&self, mode: ClassificationMode) -> (f64, f64) {
        match mode {
            ClassificationMode::Temperature => {
                (self.thresholds.heat_range[0], self.thresholds.heat_range[1])
            }
            ClassificationMode::GreenCover => (
                self.thresholds.green_range[0],
                self.thresholds.green_range[1],
            ),
        }
    }
}

impl Validate for MapConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
