//! Scripted session driving the map/list core without a canvas

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use sa_core::{AppState, FocusState, FocusSubscriber, ScreenPoint, UniversitySource};
use sa_data::{ListQuery, SortOrder, LANGUAGES};
use sa_map::{university_feature, ListPanel, MapEventKind, MapListSync, RecordingRenderer};
use tracing::info;

/// Preview panel: logs whatever the core currently focuses
pub struct PreviewPanel {
    last_revision: RwLock<u64>,
}

impl PreviewPanel {
    pub fn new() -> Self {
        Self {
            last_revision: RwLock::new(0),
        }
    }
}

impl FocusSubscriber for PreviewPanel {
    fn on_focus_change(&self, state: &FocusState) {
        *self.last_revision.write() = state.revision;

        if state.popup_visible {
            info!(
                "Popup: {} - {}",
                state.focused_name().unwrap_or("?"),
                state.preview_text
            );
        }
        if state.hover_visible {
            if let (Some(name), Some(anchor)) = (state.focused_name(), state.hover_anchor) {
                info!("Hover label '{}' at ({}, {})", name, anchor.x, anchor.y);
            }
        }
    }
}

/// Run one scripted browsing session against `source`
pub async fn run(state: Arc<AppState>, source: &dyn UniversitySource) -> Result<()> {
    let preview = Arc::new(PreviewPanel::new());
    let list = Arc::new(ListPanel::new());
    state.focus.add_subscriber(preview.clone());
    state.focus.add_subscriber(list.clone());

    let sync = MapListSync::new(state.clone(), RecordingRenderer::new());
    sync.initialize(source).await;

    // The style finishes loading after the data arrived
    sync.simulate(MapEventKind::Load, None, ScreenPoint::default(), Vec::new());
    info!("Marker layer readiness: {:?}", sync.readiness());

    let catalog = state
        .catalog()
        .context("no universities were loaded")?;

    for language in LANGUAGES {
        let taught = ListQuery::new().with_language(language).apply(&catalog).len();
        if taught > 0 {
            info!("{} universities teach in {}", taught, language);
        }
    }

    // List sorted by rating; hover the best one, then open it
    list.refresh(&catalog, &ListQuery::new().with_sort(SortOrder::Rating));
    let rows = list.rows();
    if let Some(row) = rows.first() {
        sync.on_hover_list(row);
        sync.hide_circle();
        sync.show_popup_from_list(&row.row_ref());
        sync.close_window();
    }
    if let Some(row) = list.highlighted_row() {
        info!("List highlights {}", row.name);
    }

    // Pointer over the last marker, away again, then a click on it
    let layer_id = state.settings.read().marker.layer_id.clone();
    if let Some(record) = catalog.get(catalog.len().saturating_sub(1)) {
        let features = vec![university_feature(record)];
        sync.simulate(MapEventKind::MouseEnter, Some(layer_id.as_str()), ScreenPoint::new(320.0, 180.0), features.clone());
        sync.simulate(MapEventKind::MouseLeave, Some(layer_id.as_str()), ScreenPoint::new(320.0, 180.0), Vec::new());
        sync.simulate(MapEventKind::Click, Some(layer_id.as_str()), ScreenPoint::new(320.0, 180.0), features);
    }

    info!("Filter bar button: {}", sync.toggle("Less ..."));

    sync.teardown();
    let calls = sync.with_renderer(|renderer| renderer.calls().len());
    info!(
        "Session finished after {} renderer calls, focus revision {}",
        calls,
        *preview.last_revision.read()
    );
    Ok(())
}
