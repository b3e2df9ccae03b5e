//! Core functionality for the study-abroad map
//!
//! This crate provides the university data model, the frozen catalog the
//! views index into, and the shared focus state both views render from.

pub mod catalog;
pub mod data;
pub mod events;
pub mod focus;
pub mod preview;
pub mod settings;
pub mod state;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError};
pub use data::{LngLat, UniversityId, UniversityRecord, UniversitySource};
pub use events::EventBus;
pub use focus::{FocusState, FocusStore, FocusSubscriber, FocusedUniversity, ScreenPoint};
pub use settings::{MapSettings, MarkerSettings, SettingsError};
pub use state::AppState;
