use std::any::TypeId;

use ahash::AHashMap;
use parking_lot::Mutex;

/// Typed publish/subscribe bus for lifecycle events
pub struct EventBus {
    handlers: Mutex<AHashMap<TypeId, Vec<Box<dyn EventHandler>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Lifecycle events of the map/list view
pub mod events {
    use super::Event;

    /// University collection fetched and frozen
    #[derive(Debug, Clone)]
    pub struct CatalogLoaded {
        pub source_name: String,
        pub university_count: usize,
    }

    /// University fetch failed; the map stays empty
    #[derive(Debug, Clone)]
    pub struct CatalogLoadFailed {
        pub source_name: String,
        pub error: String,
    }

    /// Marker layer handed to the renderer
    #[derive(Debug, Clone)]
    pub struct MarkerLayerRegistered {
        pub layer_id: String,
        pub feature_count: usize,
    }

    /// Renderer listeners released on teardown
    #[derive(Debug, Clone)]
    pub struct ListenersReleased {
        pub count: usize,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        CatalogLoaded,
        CatalogLoadFailed,
        MarkerLayerRegistered,
        ListenersReleased
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(AHashMap::new()),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let mut handlers = self.handlers.lock();
        handlers.entry(TypeId::of::<E>()).or_default().push(handler);
    }

    /// Publish an event.
    ///
    /// Handlers run while the bus is locked and must not publish themselves.
    pub fn publish<E: Event>(&self, event: E) {
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&TypeId::of::<E>()) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
