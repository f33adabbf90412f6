use crate::domain::model::{FeatureId, FeatureRecord, FieldMap, LngLat, SearchOutcome};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct IndexEntry {
    name: String,
    id: Option<FeatureId>,
    anchor: Option<LngLat>,
}

/// Name lookup over whatever the surface currently has on screen. Vector
/// tiles do not expose the full dataset client-side, so the index is
/// rebuilt from rendered features on every settled viewport change and is
/// viewport-scoped by construction, not by choice.
#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: HashMap<String, IndexEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild(&mut self, fields: &FieldMap, features: &[FeatureRecord]) {
        self.entries.clear();
        for feature in features {
            let Some(name) = feature.text_attr(&fields.name) else {
                continue;
            };
            let entry = IndexEntry {
                name: name.to_string(),
                id: feature_id(fields, feature),
                anchor: feature.anchor,
            };
            // a polygon can span several tiles; first rendered copy wins
            self.entries.entry(name.to_lowercase()).or_insert(entry);
        }
    }

    /// Case-insensitive exact match on display name.
    pub fn lookup(&self, query: &str) -> SearchOutcome {
        match self.entries.get(&query.trim().to_lowercase()) {
            Some(entry) => SearchOutcome::Found {
                id: entry.id,
                name: entry.name.clone(),
                anchor: entry.anchor,
            },
            None => SearchOutcome::NotFound,
        }
    }

    /// Sorted display names for the search box, capped to keep the control
    /// responsive on dense viewports.
    pub fn suggestions(&self, cap: usize) -> Vec<String> {
        let mut names: Vec<String> = self.entries.values().map(|e| e.name.clone()).collect();
        names.sort();
        names.truncate(cap);
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn feature_id(fields: &FieldMap, feature: &FeatureRecord) -> Option<FeatureId> {
    feature
        .numeric_attr(&fields.id)
        .map(|v| v as FeatureId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn fields() -> FieldMap {
        FieldMap {
            id: "OBJECTID".to_string(),
            name: "neighborhood".to_string(),
            temp: "mean_temp".to_string(),
            green: "pct_blue_green".to_string(),
            details: vec![],
        }
    }

    fn rendered(name: &str, id: i64) -> FeatureRecord {
        let mut attributes = HashMap::new();
        attributes.insert("OBJECTID".to_string(), json!(id));
        attributes.insert("neighborhood".to_string(), json!(name));
        FeatureRecord {
            attributes,
            anchor: Some(LngLat {
                lng: -0.13,
                lat: 51.51,
            }),
        }
    }

    #[test]
    fn test_case_insensitive_hit() {
        let mut index = SearchIndex::new();
        index.rebuild(&fields(), &[rendered("Soho", 1), rendered("Mayfair", 2)]);

        match index.lookup("mayfair") {
            SearchOutcome::Found { id, name, anchor } => {
                assert_eq!(id, Some(2));
                assert_eq!(name, "Mayfair");
                assert!(anchor.is_some());
            }
            SearchOutcome::NotFound => panic!("expected a hit"),
        }
    }

    #[test]
    fn test_miss() {
        let mut index = SearchIndex::new();
        index.rebuild(&fields(), &[rendered("Soho", 1), rendered("Mayfair", 2)]);
        assert_eq!(index.lookup("chelsea"), SearchOutcome::NotFound);
    }

    #[test]
    fn test_rebuild_replaces_previous_viewport() {
        let mut index = SearchIndex::new();
        index.rebuild(&fields(), &[rendered("Soho", 1)]);
        assert_eq!(index.len(), 1);

        index.rebuild(&fields(), &[rendered("Camden", 3), rendered("Hackney", 4)]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("soho"), SearchOutcome::NotFound);
    }

    #[test]
    fn test_duplicate_tiles_keep_first_copy() {
        let mut index = SearchIndex::new();
        index.rebuild(&fields(), &[rendered("Soho", 1), rendered("Soho", 1)]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_suggestions_sorted_and_capped() {
        let mut index = SearchIndex::new();
        index.rebuild(
            &fields(),
            &[rendered("Soho", 1), rendered("Camden", 3), rendered("Mayfair", 2)],
        );

        assert_eq!(index.suggestions(10), vec!["Camden", "Mayfair", "Soho"]);
        assert_eq!(index.suggestions(2), vec!["Camden", "Mayfair"]);
    }

    #[test]
    fn test_feature_without_name_is_skipped() {
        let mut attributes = HashMap::new();
        attributes.insert("OBJECTID".to_string(), json!(9));
        let nameless = FeatureRecord {
            attributes,
            anchor: None,
        };

        let mut index = SearchIndex::new();
        index.rebuild(&fields(), &[nameless]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_unparseable_id_yields_none() {
        let mut attributes = HashMap::new();
        attributes.insert("OBJECTID".to_string(), json!("abc"));
        attributes.insert("neighborhood".to_string(), json!("Soho"));
        let feature = FeatureRecord {
            attributes,
            anchor: None,
        };
        assert_eq!(feature_id(&fields(), &feature), None);
    }
}
