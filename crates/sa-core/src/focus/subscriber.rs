//! Focus subscriber trait

use super::FocusState;

/// Trait for views that render from the shared focus state
pub trait FocusSubscriber: Send + Sync {
    /// Called after every focus or visibility change
    fn on_focus_change(&self, state: &FocusState);
}
