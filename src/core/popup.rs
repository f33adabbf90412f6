use crate::core::search;
use crate::domain::model::{
    ClassificationMode, DetailRow, FeatureRecord, FieldMap, PopupContent, TooltipContent,
};

/// Hover line content for the active mode. The value stays `None` when the
/// attribute is missing or unparseable; the surface renders that as "N/A".
pub fn tooltip(
    fields: &FieldMap,
    mode: ClassificationMode,
    feature: &FeatureRecord,
) -> TooltipContent {
    let name = feature
        .text_attr(&fields.name)
        .map(str::to_string)
        .unwrap_or_else(|| match search::feature_id(fields, feature) {
            Some(id) => format!("ID {}", id),
            None => "ID N/A".to_string(),
        });

    let (key, metric_label) = match mode {
        ClassificationMode::Temperature => (&fields.temp, "Temp (°C)"),
        ClassificationMode::GreenCover => (&fields.green, "Green/Blue (%)"),
    };

    TooltipContent {
        name,
        metric_label: metric_label.to_string(),
        value: feature.numeric_attr(key),
    }
}

/// Full indicator table for a clicked feature, one row per configured
/// detail field.
pub fn details(fields: &FieldMap, feature: &FeatureRecord) -> PopupContent {
    PopupContent {
        title: feature
            .text_attr(&fields.name)
            .unwrap_or("(unknown)")
            .to_string(),
        feature_id: search::feature_id(fields, feature),
        rows: fields
            .details
            .iter()
            .map(|detail| DetailRow {
                label: detail.label.clone(),
                value: feature.numeric_attr(&detail.key),
                unit: detail.unit.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DetailField;
    use serde_json::json;
    use std::collections::HashMap;

    fn fields() -> FieldMap {
        FieldMap {
            id: "OBJECTID".to_string(),
            name: "neighborhood".to_string(),
            temp: "mean_temp".to_string(),
            green: "pct_blue_green".to_string(),
            details: vec![
                DetailField {
                    key: "mean_temp".to_string(),
                    label: "Mean temp".to_string(),
                    unit: "°C".to_string(),
                },
                DetailField {
                    key: "pm25_conc".to_string(),
                    label: "PM2.5".to_string(),
                    unit: "µg/m³".to_string(),
                },
            ],
        }
    }

    fn feature(pairs: &[(&str, serde_json::Value)]) -> FeatureRecord {
        let mut attributes = HashMap::new();
        for (k, v) in pairs {
            attributes.insert(k.to_string(), v.clone());
        }
        FeatureRecord {
            attributes,
            anchor: None,
        }
    }

    #[test]
    fn test_tooltip_follows_mode() {
        let feature = feature(&[
            ("neighborhood", json!("Soho")),
            ("mean_temp", json!(18.7)),
            ("pct_blue_green", json!(12.3)),
        ]);

        let tip = tooltip(&fields(), ClassificationMode::Temperature, &feature);
        assert_eq!(tip.name, "Soho");
        assert_eq!(tip.metric_label, "Temp (°C)");
        assert_eq!(tip.value, Some(18.7));

        let tip = tooltip(&fields(), ClassificationMode::GreenCover, &feature);
        assert_eq!(tip.metric_label, "Green/Blue (%)");
        assert_eq!(tip.value, Some(12.3));
    }

    #[test]
    fn test_tooltip_falls_back_to_id() {
        let feature = feature(&[("OBJECTID", json!(17)), ("mean_temp", json!("bad"))]);
        let tip = tooltip(&fields(), ClassificationMode::Temperature, &feature);
        assert_eq!(tip.name, "ID 17");
        assert_eq!(tip.value, None);
    }

    #[test]
    fn test_details_rows() {
        let feature = feature(&[
            ("OBJECTID", json!(3)),
            ("neighborhood", json!("Camden")),
            ("mean_temp", json!(19.02)),
        ]);

        let popup = details(&fields(), &feature);
        assert_eq!(popup.title, "Camden");
        assert_eq!(popup.feature_id, Some(3));
        assert_eq!(popup.rows.len(), 2);
        assert_eq!(popup.rows[0].label, "Mean temp");
        assert_eq!(popup.rows[0].value, Some(19.02));
        assert_eq!(popup.rows[0].unit, "°C");
        // missing indicator renders as N/A downstream
        assert_eq!(popup.rows[1].value, None);
    }

    #[test]
    fn test_details_unknown_feature() {
        let popup = details(&fields(), &feature(&[]));
        assert_eq!(popup.title, "(unknown)");
        assert_eq!(popup.feature_id, None);
    }
}
