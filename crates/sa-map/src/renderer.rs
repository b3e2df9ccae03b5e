//! Map renderer abstraction - the contract the sync core drives

use std::fmt;

use geojson::Feature;
use sa_core::{LngLat, ScreenPoint};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::layer::LayerSpec;

/// Errors reported by a map renderer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("Map has not been constructed")]
    NotConstructed,

    #[error("Map style is not loaded yet")]
    StyleNotLoaded,

    #[error("Layer '{0}' already exists")]
    DuplicateLayer(String),
}

/// Options the map is constructed with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    /// Id of the element hosting the canvas
    pub container: String,
    pub style: String,
    pub zoom: f64,
    pub center: LngLat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Target of a camera flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub center: LngLat,
    pub zoom: f64,
}

/// Canvas cursor affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Renderer events the sync core listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    /// Style and sources are loaded
    Load,
    Click,
    MouseEnter,
    MouseLeave,
}

impl MapEventKind {
    /// Event name used by the renderer
    pub fn as_str(self) -> &'static str {
        match self {
            MapEventKind::Load => "load",
            MapEventKind::Click => "click",
            MapEventKind::MouseEnter => "mouseenter",
            MapEventKind::MouseLeave => "mouseleave",
        }
    }
}

impl fmt::Display for MapEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle of a registered renderer listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event delivered by the renderer to one of its listeners
#[derive(Debug, Clone)]
pub struct MapEvent {
    /// Listener the event is delivered to
    pub listener: ListenerId,
    pub kind: MapEventKind,
    /// Layer the listener is scoped to
    pub layer: Option<String>,
    /// Pointer position on the canvas
    pub point: ScreenPoint,
    /// Features under the pointer, topmost first
    pub features: Vec<Feature>,
}

/// Map renderer driven by the sync core.
///
/// Listener registration only tells the renderer which events to deliver;
/// the host hands delivered events to `MapListSync::handle_event`, never from
/// inside one of these calls.
pub trait MapRenderer: Send {
    /// Create the map surface
    fn construct(&mut self, options: &MapOptions) -> Result<(), MapError>;

    /// Lower bound of the interactive zoom range
    fn set_min_zoom(&mut self, zoom: f64);

    /// Upper bound of the interactive zoom range
    fn set_max_zoom(&mut self, zoom: f64);

    /// Register a layer. Only valid once the map has signalled `load`.
    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), MapError>;

    /// Start delivering `kind` events, optionally scoped to a layer
    fn on(&mut self, kind: MapEventKind, layer: Option<&str>) -> ListenerId;

    /// Stop delivering events to a listener
    fn off(&mut self, listener: ListenerId);

    /// Animate the camera to a new center and zoom
    fn fly_to(&mut self, camera: CameraTarget);

    /// Set the canvas cursor
    fn set_cursor(&mut self, cursor: Cursor);
}
