//! Map view configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::LngLat;
use crate::preview::PREVIEW_CHARS;

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid zoom range: min {min} is above max {max}")]
    InvalidZoomRange { min: f64, max: f64 },
}

/// Settings of the map and the list synchronization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Id of the element hosting the map canvas
    pub container: String,

    /// Renderer style reference
    pub style: String,

    /// Renderer access token
    pub access_token: Option<String>,

    /// Initial viewport center
    pub center: LngLat,

    /// Initial zoom level
    pub zoom: f64,

    pub min_zoom: f64,
    pub max_zoom: f64,

    /// Zoom level used when a list row is hovered
    pub list_hover_zoom: f64,

    /// Horizontal distance between the pointer and the hover label, in pixels
    pub hover_offset_x: f64,

    /// Description characters kept in the popup preview
    pub preview_chars: usize,

    pub marker: MarkerSettings,
}

/// Marker layer appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    pub layer_id: String,
    pub icon_image: String,
    pub icon_allow_overlap: bool,
    pub icon_size: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            container: "map".to_string(),
            style: "mapbox://styles/grandmagauss/cjggub0jm00242so9u41xd01o".to_string(),
            access_token: None,
            center: LngLat::new(11.5, 38.05),
            zoom: 1.5,
            min_zoom: 1.6,
            max_zoom: 5.0,
            list_hover_zoom: 4.0,
            hover_offset_x: 20.0,
            preview_chars: PREVIEW_CHARS,
            marker: MarkerSettings::default(),
        }
    }
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            layer_id: "unis".to_string(),
            icon_image: "town-hall-15".to_string(),
            icon_allow_overlap: true,
            icon_size: 1.5,
        }
    }
}

impl MapSettings {
    /// Parse settings from JSON; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_zoom > self.max_zoom {
            return Err(SettingsError::InvalidZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = MapSettings::from_json_str(r#"{"max_zoom": 7.0}"#).unwrap();

        assert_eq!(settings.max_zoom, 7.0);
        assert_eq!(settings.min_zoom, 1.6);
        assert_eq!(settings.marker.layer_id, "unis");
        assert_eq!(settings.center, LngLat::new(11.5, 38.05));
    }

    #[test]
    fn test_inverted_zoom_range_is_rejected() {
        let err = MapSettings::from_json_str(r#"{"min_zoom": 8.0, "max_zoom": 2.0}"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidZoomRange { .. }));
    }
}
