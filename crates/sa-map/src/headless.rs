//! Headless renderer that records every call, for tests and scripted sessions

use geojson::Feature;
use sa_core::ScreenPoint;
use tracing::trace;

use crate::layer::LayerSpec;
use crate::renderer::{CameraTarget, Cursor, ListenerId, MapError, MapEvent, MapEventKind, MapOptions, MapRenderer};
use crate::sync::MapListSync;

/// A renderer call, as recorded
#[derive(Debug, Clone, PartialEq)]
pub enum RendererCall {
    Construct(MapOptions),
    SetMinZoom(f64),
    SetMaxZoom(f64),
    AddLayer { id: String, feature_count: usize },
    On { listener: ListenerId, kind: MapEventKind, layer: Option<String> },
    Off(ListenerId),
    FlyTo(CameraTarget),
    SetCursor(Cursor),
}

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    kind: MapEventKind,
    layer: Option<String>,
}

/// Renderer without a canvas.
///
/// Behaves like a real map where it matters to the sync core: layers can
/// only be added once the style has loaded, and events are only delivered
/// to registered listeners.
#[derive(Debug)]
pub struct RecordingRenderer {
    options: Option<MapOptions>,
    loaded: bool,
    min_zoom: f64,
    max_zoom: f64,
    camera: Option<CameraTarget>,
    cursor: Cursor,
    layers: Vec<LayerSpec>,
    listeners: Vec<Listener>,
    calls: Vec<RendererCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            options: None,
            loaded: false,
            min_zoom: 0.0,
            max_zoom: 22.0,
            camera: None,
            cursor: Cursor::Default,
            layers: Vec::new(),
            listeners: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Events the renderer would deliver for a pointer or lifecycle event.
    ///
    /// A `Load` event also marks the style as loaded.
    pub fn events_for(
        &mut self,
        kind: MapEventKind,
        layer: Option<&str>,
        point: ScreenPoint,
        features: Vec<Feature>,
    ) -> Vec<MapEvent> {
        if kind == MapEventKind::Load {
            self.loaded = true;
        }

        self.listeners
            .iter()
            .filter(|l| l.kind == kind && l.layer.as_deref() == layer)
            .map(|l| MapEvent {
                listener: l.id,
                kind,
                layer: l.layer.clone(),
                point,
                features: features.clone(),
            })
            .collect()
    }

    pub fn options(&self) -> Option<&MapOptions> {
        self.options.as_ref()
    }

    pub fn zoom_range(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Camera of the last flight, if any
    pub fn camera(&self) -> Option<CameraTarget> {
        self.camera
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn calls(&self) -> &[RendererCall] {
        &self.calls
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapRenderer for RecordingRenderer {
    fn construct(&mut self, options: &MapOptions) -> Result<(), MapError> {
        self.calls.push(RendererCall::Construct(options.clone()));
        self.options = Some(options.clone());
        self.camera = Some(CameraTarget {
            center: options.center,
            zoom: options.zoom,
        });
        Ok(())
    }

    fn set_min_zoom(&mut self, zoom: f64) {
        self.calls.push(RendererCall::SetMinZoom(zoom));
        self.min_zoom = zoom;
    }

    fn set_max_zoom(&mut self, zoom: f64) {
        self.calls.push(RendererCall::SetMaxZoom(zoom));
        self.max_zoom = zoom;
    }

    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), MapError> {
        if self.options.is_none() {
            return Err(MapError::NotConstructed);
        }
        if !self.loaded {
            return Err(MapError::StyleNotLoaded);
        }
        if self.layers.iter().any(|l| l.id == layer.id) {
            return Err(MapError::DuplicateLayer(layer.id));
        }

        self.calls.push(RendererCall::AddLayer {
            id: layer.id.clone(),
            feature_count: layer.feature_count(),
        });
        self.layers.push(layer);
        Ok(())
    }

    fn on(&mut self, kind: MapEventKind, layer: Option<&str>) -> ListenerId {
        let id = ListenerId::new();
        trace!("Listener {} registered for {}", id, kind);
        self.calls.push(RendererCall::On {
            listener: id,
            kind,
            layer: layer.map(str::to_string),
        });
        self.listeners.push(Listener {
            id,
            kind,
            layer: layer.map(str::to_string),
        });
        id
    }

    fn off(&mut self, listener: ListenerId) {
        self.calls.push(RendererCall::Off(listener));
        self.listeners.retain(|l| l.id != listener);
    }

    fn fly_to(&mut self, camera: CameraTarget) {
        self.calls.push(RendererCall::FlyTo(camera));
        // Zoom stays inside the interactive range, like the real map
        let zoom = camera.zoom.max(self.min_zoom).min(self.max_zoom);
        self.camera = Some(CameraTarget {
            center: camera.center,
            zoom,
        });
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.calls.push(RendererCall::SetCursor(cursor));
        self.cursor = cursor;
    }
}

impl MapListSync<RecordingRenderer> {
    /// Deliver a simulated renderer event to every matching listener.
    ///
    /// Returns how many listeners received it.
    pub fn simulate(
        &self,
        kind: MapEventKind,
        layer: Option<&str>,
        point: ScreenPoint,
        features: Vec<Feature>,
    ) -> usize {
        let events = self.with_renderer(|renderer| renderer.events_for(kind, layer, point, features));
        for event in &events {
            self.handle_event(event);
        }
        events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_core::Catalog;
    use sa_core::MarkerSettings;

    fn options() -> MapOptions {
        MapOptions {
            container: "map".to_string(),
            style: "style".to_string(),
            zoom: 1.5,
            center: sa_core::LngLat::new(11.5, 38.05),
            access_token: None,
        }
    }

    #[test]
    fn test_layer_requires_loaded_style() {
        let mut renderer = RecordingRenderer::new();
        let layer = LayerSpec::markers(&Catalog::default(), &MarkerSettings::default());

        assert_eq!(renderer.add_layer(layer.clone()), Err(MapError::NotConstructed));
        renderer.construct(&options()).unwrap();
        assert_eq!(renderer.add_layer(layer.clone()), Err(MapError::StyleNotLoaded));

        renderer.events_for(MapEventKind::Load, None, ScreenPoint::default(), Vec::new());
        assert!(renderer.add_layer(layer.clone()).is_ok());
        assert_eq!(renderer.add_layer(layer), Err(MapError::DuplicateLayer("unis".to_string())));
    }

    #[test]
    fn test_events_only_reach_matching_listeners() {
        let mut renderer = RecordingRenderer::new();
        let click = renderer.on(MapEventKind::Click, Some("unis"));
        renderer.on(MapEventKind::Click, Some("other"));
        renderer.on(MapEventKind::MouseEnter, Some("unis"));

        let events = renderer.events_for(MapEventKind::Click, Some("unis"), ScreenPoint::default(), Vec::new());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].listener, click);

        renderer.off(click);
        assert!(renderer
            .events_for(MapEventKind::Click, Some("unis"), ScreenPoint::default(), Vec::new())
            .is_empty());
    }

    #[test]
    fn test_fly_to_clamps_zoom() {
        let mut renderer = RecordingRenderer::new();
        renderer.set_max_zoom(5.0);
        renderer.set_min_zoom(1.6);

        renderer.fly_to(CameraTarget {
            center: sa_core::LngLat::new(0.0, 0.0),
            zoom: 9.0,
        });
        assert_eq!(renderer.camera().unwrap().zoom, 5.0);
    }
}
