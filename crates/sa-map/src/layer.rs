//! Marker layer: one point feature per university

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use sa_core::{Catalog, MarkerSettings, UniversityId, UniversityRecord};
use serde::{Deserialize, Serialize};

/// Feature property carrying the university identifier
pub const UNIVERSITY_PROPERTY: &str = "university";

/// Layer registration handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: GeoJsonSource,
    pub layout: SymbolLayout,
    pub paint: JsonObject,
}

/// Inline GeoJSON source of a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: FeatureCollection,
}

/// Icon layout of a symbol layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SymbolLayout {
    pub icon_image: String,
    pub icon_allow_overlap: bool,
    pub icon_size: f64,
}

impl LayerSpec {
    /// Symbol layer showing one marker per university of `catalog`
    pub fn markers(catalog: &Catalog, marker: &MarkerSettings) -> Self {
        Self {
            id: marker.layer_id.clone(),
            kind: "symbol".to_string(),
            source: GeoJsonSource {
                kind: "geojson".to_string(),
                data: feature_collection(catalog),
            },
            layout: SymbolLayout {
                icon_image: marker.icon_image.clone(),
                icon_allow_overlap: marker.icon_allow_overlap,
                icon_size: marker.icon_size,
            },
            paint: JsonObject::new(),
        }
    }

    pub fn feature_count(&self) -> usize {
        self.source.data.features.len()
    }

    /// Renderer-facing JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Point feature of a single university
pub fn university_feature(record: &UniversityRecord) -> Feature {
    let mut properties = JsonObject::new();
    // Renderer feature properties are string-keyed and string-valued
    properties.insert(
        UNIVERSITY_PROPERTY.to_string(),
        serde_json::Value::String(record.id.to_string()),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![record.lng, record.lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// All universities, in catalog order
pub fn feature_collection(catalog: &Catalog) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: catalog.iter().map(|record| university_feature(record)).collect(),
        foreign_members: None,
    }
}

/// Identifier carried by a feature, if it has a well-formed one
pub fn feature_university_id(feature: &Feature) -> Option<UniversityId> {
    let value = feature.properties.as_ref()?.get(UNIVERSITY_PROPERTY)?;

    match value {
        serde_json::Value::String(s) => s.parse().ok(),
        // Some renderers hand numeric-looking properties back as numbers
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()).map(UniversityId),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, lng: f64, lat: f64) -> UniversityRecord {
        UniversityRecord {
            id: UniversityId(id),
            name: format!("Uni {}", id),
            city: String::new(),
            country: String::new(),
            lng,
            lat,
            description_text: String::new(),
            languages: Vec::new(),
            rating: None,
            movers: 0,
        }
    }

    #[test]
    fn test_one_feature_per_record_in_order() {
        let catalog = Catalog::new(vec![record(4, 12.5, 41.9), record(2, -3.6, 37.18)]).unwrap();
        let collection = feature_collection(&catalog);

        assert_eq!(collection.features.len(), 2);
        for (position, feature) in collection.features.iter().enumerate() {
            let id = feature_university_id(feature).unwrap();
            assert_eq!(catalog.position_of(id), Some(position));
        }

        let geometry = collection.features[0].geometry.as_ref().unwrap();
        assert_eq!(geometry.value, Value::Point(vec![12.5, 41.9]));
    }

    #[test]
    fn test_property_decoding_tolerates_numbers_and_rejects_garbage() {
        let mut feature = university_feature(&record(8, 0.0, 0.0));
        assert_eq!(feature_university_id(&feature), Some(UniversityId(8)));

        feature
            .properties
            .as_mut()
            .unwrap()
            .insert(UNIVERSITY_PROPERTY.to_string(), serde_json::json!(8));
        assert_eq!(feature_university_id(&feature), Some(UniversityId(8)));

        feature
            .properties
            .as_mut()
            .unwrap()
            .insert(UNIVERSITY_PROPERTY.to_string(), serde_json::json!("eight"));
        assert_eq!(feature_university_id(&feature), None);

        feature.properties = None;
        assert_eq!(feature_university_id(&feature), None);
    }

    #[test]
    fn test_layer_json_shape() {
        let catalog = Catalog::new(vec![record(1, 11.5, 38.05)]).unwrap();
        let layer = LayerSpec::markers(&catalog, &MarkerSettings::default());
        let json: serde_json::Value = serde_json::from_str(&layer.to_json().unwrap()).unwrap();

        assert_eq!(json["id"], "unis");
        assert_eq!(json["type"], "symbol");
        assert_eq!(json["source"]["type"], "geojson");
        assert_eq!(json["source"]["data"]["type"], "FeatureCollection");
        assert_eq!(json["layout"]["icon-image"], "town-hall-15");
        assert_eq!(json["layout"]["icon-allow-overlap"], true);
        assert_eq!(json["layout"]["icon-size"], 1.5);
        assert_eq!(layer.feature_count(), 1);
    }
}
