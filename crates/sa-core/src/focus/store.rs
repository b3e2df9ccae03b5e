//! Observable focus store shared by the map and list views

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

use super::{FocusState, FocusSubscriber, FocusedUniversity, ScreenPoint};
use crate::preview::{preview_text, PREVIEW_CHARS};

/// Single owner of `FocusState`.
///
/// Every mutation happens under one write lock, so the preview text is
/// always derived from the university that is focused in the same snapshot.
/// Subscribers are notified after the lock is released.
pub struct FocusStore {
    state: RwLock<FocusState>,
    subscribers: RwLock<Vec<Weak<dyn FocusSubscriber>>>,
    preview_chars: usize,
}

impl FocusStore {
    /// Create a store with the default preview length
    pub fn new() -> Self {
        Self::with_preview_chars(PREVIEW_CHARS)
    }

    /// Create a store that keeps `preview_chars` characters of each description
    pub fn with_preview_chars(preview_chars: usize) -> Self {
        Self {
            state: RwLock::new(FocusState::default()),
            subscribers: RwLock::new(Vec::new()),
            preview_chars,
        }
    }

    /// Current state
    pub fn snapshot(&self) -> FocusState {
        self.state.read().clone()
    }

    /// Hide popup and hover label
    pub fn reset_visibility(&self) {
        self.mutate(|state| {
            state.popup_visible = false;
            state.hover_visible = false;
            state.hover_anchor = None;
        });
    }

    /// Focus a university and recompute its preview. Opens the popup when `open_popup` is set.
    pub fn focus(&self, focused: FocusedUniversity, open_popup: bool) {
        let preview = preview_text(&focused.record.description_text, self.preview_chars);
        self.mutate(move |state| {
            state.focused = Some(focused);
            state.preview_text = preview;
            if open_popup {
                state.popup_visible = true;
            }
        });
    }

    /// Show the popup for the focused university. Returns false when nothing is focused.
    pub fn open_popup(&self) -> bool {
        let mut opened = false;
        self.mutate(|state| {
            if state.focused.is_some() {
                state.popup_visible = true;
                opened = true;
            }
        });
        opened
    }

    /// Hide the popup; focus and preview are kept
    pub fn close_popup(&self) {
        self.mutate(|state| state.popup_visible = false);
    }

    /// Show the hover label at `anchor`
    pub fn show_hover(&self, anchor: ScreenPoint) {
        self.mutate(|state| {
            state.hover_visible = true;
            state.hover_anchor = Some(anchor);
        });
    }

    /// Hide the hover label
    pub fn hide_hover(&self) {
        self.mutate(|state| {
            state.hover_visible = false;
            state.hover_anchor = None;
        });
    }

    /// Show or hide the focus ring
    pub fn set_focus_ring(&self, visible: bool) {
        self.mutate(|state| state.focus_ring_visible = visible);
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn FocusSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut FocusState),
    {
        let snapshot = {
            let mut state = self.state.write();
            f(&mut state);
            state.revision += 1;
            trace!(revision = state.revision, "Focus state changed");
            state.clone()
        };

        self.notify_subscribers(&snapshot);
    }

    /// Notify all subscribers of a focus change
    fn notify_subscribers(&self, state: &FocusState) {
        let live: Vec<Arc<dyn FocusSubscriber>> = {
            let mut subscribers = self.subscribers.write();

            // Remove any dead weak references
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for subscriber in live {
            subscriber.on_focus_change(state);
        }
    }
}

impl Default for FocusStore {
    fn default() -> Self {
        Self::new()
    }
}
