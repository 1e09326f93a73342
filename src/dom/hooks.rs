//! Hook traits for the page elements the flows read from and write to

use crate::search::{SearchQuery, SuggestionResult};
use std::sync::Arc;

/// Stable id of a page element
pub type ElementId = String;

/// A pointer press, with the target element first followed by its ancestors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerEvent {
    pub path: Vec<ElementId>,
}

impl PointerEvent {
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ElementId>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the press landed on `id` or inside it
    pub fn hits(&self, id: &str) -> bool {
        self.path.iter().any(|el| el == id)
    }
}

/// The suggestion list under the search field.
///
/// `render`, and `hide` after a failed or empty lookup, are called while the
/// suggester holds its cycle lock. Implementations must not call back into
/// the `SearchSuggester` from these methods; queue such work instead.
pub trait ResultPanel: Send + Sync {
    /// Replace the panel's content with `result` and show it
    fn render(&self, query: &SearchQuery, result: &SuggestionResult);

    /// Hide and clear the panel
    fn hide(&self);

    fn is_open(&self) -> bool;
}

/// A cart item count readout
pub trait CounterDisplay: Send + Sync {
    fn set_count(&self, count: u64);
}

/// The button that submits a product form. Label changes for the add
/// confirmation happen under the adder's lock; do not submit from them.
pub trait SubmitControl: Send + Sync {
    fn label(&self) -> String;

    fn set_label(&self, label: &str);

    fn set_disabled(&self, disabled: bool);
}

/// Lookup of the elements currently on the page. Missing elements are normal.
pub trait Page: Send + Sync {
    /// Every counter display currently on the page, possibly none
    fn counters(&self) -> Vec<Arc<dyn CounterDisplay>>;

    /// Submit control belonging to the form with this id
    fn control(&self, form_id: &str) -> Option<Arc<dyn SubmitControl>>;
}
