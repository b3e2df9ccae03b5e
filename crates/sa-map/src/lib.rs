//! Map and list views of the study-abroad browser

mod disclosure;
pub mod headless;
pub mod layer;
pub mod list;
pub mod renderer;
mod sync;

pub use disclosure::{Disclosure, COLLAPSED_TEXT};
pub use headless::{RecordingRenderer, RendererCall};
pub use layer::{feature_collection, feature_university_id, university_feature, LayerSpec};
pub use list::{decode_row_class, list_rows, ListPanel, ListRow, RowRef};
pub use renderer::{CameraTarget, Cursor, ListenerId, MapError, MapEvent, MapEventKind, MapOptions, MapRenderer};
pub use sync::{LayerReadiness, MapListSync};
