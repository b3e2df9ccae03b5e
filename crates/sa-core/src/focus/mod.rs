use std::sync::Arc;

use crate::data::{UniversityId, UniversityRecord};

mod position;
mod store;
mod subscriber;

pub use position::ScreenPoint;
pub use store::FocusStore;
pub use subscriber::FocusSubscriber;

/// The university currently driving popup and preview content
#[derive(Debug, Clone, PartialEq)]
pub struct FocusedUniversity {
    /// Position in the fetched collection
    pub position: usize,
    pub id: UniversityId,
    pub record: Arc<UniversityRecord>,
}

/// Shared focus and visibility state read by the map and the list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusState {
    /// Currently focused university, if any
    pub focused: Option<FocusedUniversity>,

    /// Whether the detail popup is shown
    pub popup_visible: bool,

    /// Whether the hover label is shown
    pub hover_visible: bool,

    /// Screen position of the hover label
    pub hover_anchor: Option<ScreenPoint>,

    /// Whether the focus ring at the map center is shown
    pub focus_ring_visible: bool,

    /// Truncated description of the focused university
    pub preview_text: String,

    /// Incremented on every change
    pub revision: u64,
}

impl FocusState {
    pub fn focused_id(&self) -> Option<UniversityId> {
        self.focused.as_ref().map(|f| f.id)
    }

    pub fn focused_position(&self) -> Option<usize> {
        self.focused.as_ref().map(|f| f.position)
    }

    pub fn focused_name(&self) -> Option<&str> {
        self.focused.as_ref().map(|f| f.record.name.as_str())
    }
}
