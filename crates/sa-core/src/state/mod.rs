use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::data::{UniversityId, UniversitySource};
use crate::events::EventBus;
use crate::focus::{FocusStore, FocusedUniversity};
use crate::settings::MapSettings;

/// State shared by the map adapter, the list adapter and the preview panel
pub struct AppState {
    /// The focus store
    pub focus: Arc<FocusStore>,

    /// The event bus
    pub event_bus: Arc<EventBus>,

    /// The fetched universities, once loaded
    pub catalog: Arc<RwLock<Option<Arc<Catalog>>>>,

    /// Map settings
    pub settings: Arc<RwLock<MapSettings>>,
}

impl AppState {
    /// Create a new application state
    pub fn new(settings: MapSettings) -> Self {
        Self {
            focus: Arc::new(FocusStore::with_preview_chars(settings.preview_chars)),
            event_bus: Arc::new(EventBus::new()),
            catalog: Arc::new(RwLock::new(None)),
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Fetch all universities from `source` and freeze them into the catalog
    pub async fn load_catalog(&self, source: &dyn UniversitySource) -> anyhow::Result<Arc<Catalog>> {
        let fetched = source
            .fetch_all()
            .await
            .and_then(|records| Catalog::new(records).map_err(anyhow::Error::from));
        let catalog = match fetched {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => {
                warn!("Failed to load universities from {}: {:#}", source.source_name(), e);
                self.event_bus.publish(crate::events::events::CatalogLoadFailed {
                    source_name: source.source_name().to_string(),
                    error: format!("{:#}", e),
                });
                return Err(e);
            }
        };

        *self.catalog.write() = Some(catalog.clone());

        info!("Loaded {} universities from {}", catalog.len(), source.source_name());

        // Publish event
        self.event_bus.publish(crate::events::events::CatalogLoaded {
            source_name: source.source_name().to_string(),
            university_count: catalog.len(),
        });

        Ok(catalog)
    }

    /// The loaded catalog, if any
    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.catalog.read().clone()
    }

    /// Focus the university at `position`. Returns false if there is no such university.
    pub fn focus_position(&self, position: usize, open_popup: bool) -> bool {
        let Some(catalog) = self.catalog() else {
            return false;
        };
        let Some(record) = catalog.get(position) else {
            return false;
        };

        self.focus.focus(
            FocusedUniversity {
                position,
                id: record.id,
                record: record.clone(),
            },
            open_popup,
        );
        true
    }

    /// Focus the university with identifier `id`. Returns false if it is unknown.
    pub fn focus_id(&self, id: UniversityId, open_popup: bool) -> bool {
        let position = self.catalog().and_then(|catalog| catalog.position_of(id));
        match position {
            Some(position) => self.focus_position(position, open_popup),
            None => false,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MapSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UniversityRecord;
    use crate::events::{events::CatalogLoadFailed, handler_from_fn};
    use parking_lot::Mutex;

    struct FixedSource(Vec<UniversityRecord>);

    #[async_trait::async_trait]
    impl UniversitySource for FixedSource {
        async fn fetch_all(&self) -> anyhow::Result<Vec<UniversityRecord>> {
            Ok(self.0.clone())
        }

        fn source_name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingSource;

    #[async_trait::async_trait]
    impl UniversitySource for FailingSource {
        async fn fetch_all(&self) -> anyhow::Result<Vec<UniversityRecord>> {
            anyhow::bail!("backend unreachable")
        }

        fn source_name(&self) -> &str {
            "failing"
        }
    }

    fn record(id: u32, description: &str) -> UniversityRecord {
        UniversityRecord {
            id: UniversityId(id),
            name: format!("Uni {}", id),
            city: String::new(),
            country: String::new(),
            lng: 0.0,
            lat: 0.0,
            description_text: description.to_string(),
            languages: Vec::new(),
            rating: None,
            movers: 0,
        }
    }

    #[tokio::test]
    async fn test_focus_by_id_and_position() {
        let state = AppState::default();
        state
            .load_catalog(&FixedSource(vec![record(5, "five"), record(9, "nine")]))
            .await
            .unwrap();

        assert!(state.focus_id(UniversityId(9), true));
        let snapshot = state.focus.snapshot();
        assert_eq!(snapshot.focused_position(), Some(1));
        assert_eq!(snapshot.preview_text, "nine...");
        assert!(snapshot.popup_visible);

        assert!(!state.focus_position(57, true));
        assert!(!state.focus_id(UniversityId(6), false));
        assert_eq!(state.focus.snapshot().focused_position(), Some(1));
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_catalog_empty() {
        let state = AppState::default();
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = failures.clone();
        state.event_bus.subscribe::<CatalogLoadFailed>(handler_from_fn(move |event| {
            if let Some(e) = event.as_any().downcast_ref::<CatalogLoadFailed>() {
                sink.lock().push(e.error.clone());
            }
        }));

        assert!(state.load_catalog(&FailingSource).await.is_err());
        assert!(state.catalog().is_none());
        assert!(!state.focus_position(0, true));
        assert_eq!(*failures.lock(), vec!["backend unreachable".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_fail_the_load() {
        let state = AppState::default();
        let failures = Arc::new(Mutex::new(0usize));
        let sink = failures.clone();
        state.event_bus.subscribe::<CatalogLoadFailed>(handler_from_fn(move |_| {
            *sink.lock() += 1;
        }));

        let err = state
            .load_catalog(&FixedSource(vec![record(1, "a"), record(1, "b")]))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<crate::catalog::CatalogError>().is_some());
        assert!(state.catalog().is_none());
        assert_eq!(*failures.lock(), 1);
    }
}
