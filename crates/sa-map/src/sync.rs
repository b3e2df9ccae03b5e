//! Map/list synchronization core
//!
//! Projects the university catalog into a marker layer, reacts to renderer
//! pointer events and list interactions, and keeps the shared focus state
//! (focused university, popup, hover label, focus ring) consistent.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;
use sa_core::events::events::{ListenersReleased, MarkerLayerRegistered};
use sa_core::{AppState, UniversitySource};
use tracing::{debug, error, info, warn};

use crate::disclosure::Disclosure;
use crate::layer::{feature_university_id, LayerSpec};
use crate::list::{decode_row_class, ListRow, RowRef};
use crate::renderer::{CameraTarget, Cursor, ListenerId, MapError, MapEvent, MapEventKind, MapOptions, MapRenderer};

/// Readiness of the marker layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerReadiness {
    /// Nothing fetched yet
    #[default]
    Uninitialized,
    /// Fetching, or fetched and waiting for the map to load
    Loading,
    /// Layer registered and marker listeners attached
    Ready,
    /// Fetch or layer registration failed; the map stays empty
    Failed,
}

/// What a registered renderer listener is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Load,
    MarkerClick,
    MarkerEnter,
    MarkerLeave,
}

impl Binding {
    fn kind(self) -> MapEventKind {
        match self {
            Binding::Load => MapEventKind::Load,
            Binding::MarkerClick => MapEventKind::Click,
            Binding::MarkerEnter => MapEventKind::MouseEnter,
            Binding::MarkerLeave => MapEventKind::MouseLeave,
        }
    }
}

#[derive(Default)]
struct Lifecycle {
    readiness: LayerReadiness,
    map_constructed: bool,
    map_loaded: bool,
    /// Set by teardown; nothing is registered with the renderer afterwards
    torn_down: bool,
    /// Built layer waiting for the map to load
    pending_layer: Option<LayerSpec>,
    bindings: AHashMap<ListenerId, Binding>,
}

/// Keeps the map and the list focused on the same university.
///
/// Lock order is lifecycle, then renderer. Focus updates go through the
/// shared `FocusStore`, which notifies views after each change.
pub struct MapListSync<R: MapRenderer> {
    state: Arc<AppState>,
    renderer: Mutex<R>,
    lifecycle: Mutex<Lifecycle>,
    disclosure: Mutex<Disclosure>,
}

impl<R: MapRenderer> MapListSync<R> {
    pub fn new(state: Arc<AppState>, renderer: R) -> Self {
        Self {
            state,
            renderer: Mutex::new(renderer),
            lifecycle: Mutex::new(Lifecycle::default()),
            disclosure: Mutex::new(Disclosure::default()),
        }
    }

    /// Build the map, then fetch the universities and register the marker layer.
    ///
    /// Failures leave an empty map; they are logged and published on the
    /// event bus, not returned.
    pub async fn initialize(&self, source: &dyn UniversitySource) {
        self.state.focus.reset_visibility();

        if let Err(e) = self.build_map() {
            error!("Failed to build map: {}", e);
        }

        if let Err(e) = self.build_data(source).await {
            warn!("University data unavailable, map stays empty: {:#}", e);
        }
    }

    /// Construct the renderer, cap the zoom range and listen for the load signal
    pub fn build_map(&self) -> Result<(), MapError> {
        let settings = self.state.settings.read().clone();
        let options = MapOptions {
            container: settings.container.clone(),
            style: settings.style.clone(),
            zoom: settings.zoom,
            center: settings.center,
            access_token: settings.access_token.clone(),
        };

        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.map_constructed || lifecycle.torn_down {
            return Ok(());
        }

        let mut renderer = self.renderer.lock();
        renderer.construct(&options)?;
        renderer.set_max_zoom(settings.max_zoom);
        renderer.set_min_zoom(settings.min_zoom);

        // Marker listeners wait for the load signal and the layer
        let load = renderer.on(MapEventKind::Load, None);
        lifecycle.bindings.insert(load, Binding::Load);
        lifecycle.map_constructed = true;

        info!(
            "Map constructed in '{}' at {:?}, zoom {} in [{}, {}]",
            options.container, options.center, options.zoom, settings.min_zoom, settings.max_zoom
        );
        Ok(())
    }

    /// Fetch all universities and register one marker per university.
    ///
    /// Only one marker layer is ever built: calls while a fetch is in flight
    /// or after the layer is registered are ignored. A failed load may be
    /// retried.
    pub async fn build_data(&self, source: &dyn UniversitySource) -> anyhow::Result<()> {
        {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.torn_down {
                debug!("Torn down, not fetching universities");
                return Ok(());
            }
            if matches!(lifecycle.readiness, LayerReadiness::Loading | LayerReadiness::Ready) {
                debug!("Marker layer already {:?}, not fetching again", lifecycle.readiness);
                return Ok(());
            }
            lifecycle.readiness = LayerReadiness::Loading;
        }

        let loaded = self.state.load_catalog(source).await;

        let catalog = {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.torn_down {
                // Destroyed while the fetch was in flight
                lifecycle.readiness = LayerReadiness::Uninitialized;
                debug!("Torn down during fetch, dropping marker layer");
                return Ok(());
            }
            match loaded {
                Ok(catalog) => catalog,
                Err(e) => {
                    lifecycle.readiness = LayerReadiness::Failed;
                    return Err(e);
                }
            }
        };

        // The first university is focused until the user picks another one
        self.state.focus_position(0, false);

        let layer = {
            let settings = self.state.settings.read();
            LayerSpec::markers(&catalog, &settings.marker)
        };
        self.lifecycle.lock().pending_layer = Some(layer);

        self.try_register_layer()?;
        Ok(())
    }

    /// Register the pending layer and its listeners once the map has loaded
    fn try_register_layer(&self) -> Result<(), MapError> {
        let (layer_id, feature_count) = {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.torn_down {
                lifecycle.pending_layer = None;
                return Ok(());
            }
            if !lifecycle.map_loaded {
                return Ok(());
            }
            let Some(layer) = lifecycle.pending_layer.take() else {
                return Ok(());
            };

            let layer_id = layer.id.clone();
            let feature_count = layer.feature_count();

            let mut renderer = self.renderer.lock();
            if let Err(e) = renderer.add_layer(layer) {
                lifecycle.readiness = LayerReadiness::Failed;
                return Err(e);
            }

            for binding in [Binding::MarkerClick, Binding::MarkerEnter, Binding::MarkerLeave] {
                let listener = renderer.on(binding.kind(), Some(layer_id.as_str()));
                lifecycle.bindings.insert(listener, binding);
            }
            lifecycle.readiness = LayerReadiness::Ready;

            (layer_id, feature_count)
        };

        info!("Marker layer '{}' registered with {} universities", layer_id, feature_count);
        self.state.event_bus.publish(MarkerLayerRegistered {
            layer_id,
            feature_count,
        });
        Ok(())
    }

    /// Entry point for events delivered by the renderer
    pub fn handle_event(&self, event: &MapEvent) {
        let (binding, readiness) = {
            let lifecycle = self.lifecycle.lock();
            match lifecycle.bindings.get(&event.listener) {
                Some(binding) => (*binding, lifecycle.readiness),
                None => {
                    debug!("Ignoring {} for unregistered listener {}", event.kind, event.listener);
                    return;
                }
            }
        };

        if binding.kind() != event.kind {
            debug!("Ignoring {} delivered to a {} listener", event.kind, binding.kind());
            return;
        }

        match binding {
            Binding::Load => self.on_map_loaded(),
            Binding::MarkerLeave => self.on_marker_leave(),
            _ if readiness != LayerReadiness::Ready => {
                debug!("Marker layer not ready ({:?}), ignoring {}", readiness, event.kind);
            }
            Binding::MarkerClick => self.on_marker_click(event),
            Binding::MarkerEnter => self.on_marker_enter(event),
        }
    }

    fn on_map_loaded(&self) {
        {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.map_loaded {
                return;
            }
            lifecycle.map_loaded = true;
        }
        debug!("Map loaded");

        if let Err(e) = self.try_register_layer() {
            error!("Failed to register marker layer: {}", e);
        }
    }

    fn on_marker_click(&self, event: &MapEvent) {
        let Some(position) = self.resolve_marker(event) else {
            return;
        };
        if self.state.focus_position(position, true) {
            debug!("Marker {} clicked", position);
        }
    }

    fn on_marker_enter(&self, event: &MapEvent) {
        self.renderer.lock().set_cursor(Cursor::Pointer);

        let Some(position) = self.resolve_marker(event) else {
            return;
        };
        if !self.state.focus_position(position, false) {
            return;
        }

        let offset = self.state.settings.read().hover_offset_x;
        self.state.focus.show_hover(event.point.offset_x(offset));
    }

    fn on_marker_leave(&self) {
        self.renderer.lock().set_cursor(Cursor::Default);
        self.state.focus.hide_hover();
    }

    /// Catalog position of the topmost feature of a marker event
    fn resolve_marker(&self, event: &MapEvent) -> Option<usize> {
        let Some(feature) = event.features.first() else {
            debug!("{} without features", event.kind);
            return None;
        };
        let Some(id) = feature_university_id(feature) else {
            warn!("Marker feature without a university id");
            return None;
        };

        let position = self.state.catalog()?.position_of(id);
        if position.is_none() {
            warn!("No university with id {}", id);
        }
        position
    }

    /// Center the map on a hovered list row and show the focus ring
    pub fn on_hover_list(&self, row: &ListRow) {
        let zoom = self.state.settings.read().list_hover_zoom;
        self.renderer.lock().fly_to(CameraTarget {
            center: row.center,
            zoom,
        });
        self.show_circle();
    }

    /// Show the focus ring at the map center
    pub fn show_circle(&self) {
        self.state.focus.set_focus_ring(true);
    }

    /// Hide the focus ring
    pub fn hide_circle(&self) {
        self.state.focus.set_focus_ring(false);
    }

    /// Focus the university of a clicked list row and open its popup.
    ///
    /// References that resolve to no university are ignored.
    pub fn show_popup_from_list(&self, row: &RowRef) {
        let position = match row {
            RowRef::Id(id) => self.state.catalog().and_then(|catalog| catalog.position_of(*id)),
            RowRef::Class(class) => decode_row_class(class),
        };

        match position {
            Some(position) if self.state.focus_position(position, true) => {
                debug!("List row {} opened", position);
            }
            _ => debug!("Ignoring click on unresolvable list row {:?}", row),
        }
    }

    /// Hide the popup; the focused university stays focused
    pub fn close_window(&self) {
        self.state.focus.close_popup();
    }

    /// Flip the "show more" disclosure and return the new button text
    pub fn toggle(&self, expanded_text: &str) -> String {
        self.disclosure.lock().toggle(expanded_text)
    }

    pub fn disclosure(&self) -> Disclosure {
        *self.disclosure.lock()
    }

    pub fn readiness(&self) -> LayerReadiness {
        self.lifecycle.lock().readiness
    }

    /// Number of renderer listeners currently held
    pub fn listener_count(&self) -> usize {
        self.lifecycle.lock().bindings.len()
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Run `f` with exclusive access to the renderer
    pub fn with_renderer<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.renderer.lock())
    }

    /// Release every renderer listener. Also runs on drop.
    ///
    /// A fetch still in flight completes without registering anything.
    pub fn teardown(&self) {
        let count = {
            let mut lifecycle = self.lifecycle.lock();
            lifecycle.torn_down = true;
            lifecycle.pending_layer = None;
            if lifecycle.bindings.is_empty() {
                return;
            }

            let mut renderer = self.renderer.lock();
            let listeners: Vec<ListenerId> = lifecycle.bindings.drain().map(|(listener, _)| listener).collect();
            for listener in &listeners {
                renderer.off(*listener);
            }
            listeners.len()
        };

        info!("Released {} map listeners", count);
        self.state.event_bus.publish(ListenersReleased { count });
    }
}

impl<R: MapRenderer> Drop for MapListSync<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
