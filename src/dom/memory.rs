//! In-memory page elements
//!
//! Back the console bootstrap and the tests. Every write is also traced at
//! debug level so a console session shows what the page would display.

use super::hooks::{CounterDisplay, Page, ResultPanel, SubmitControl};
use crate::search::{ProductSummary, SearchQuery, SuggestionResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct PanelState {
    open: bool,
    query: Option<String>,
    items: Vec<ProductSummary>,
    renders: usize,
}

/// Suggestion panel that remembers what it shows
#[derive(Debug, Default)]
pub struct MemoryPanel {
    state: Mutex<PanelState>,
}

impl MemoryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query the visible items were rendered for
    pub fn query(&self) -> Option<String> {
        self.state.lock().query.clone()
    }

    pub fn items(&self) -> Vec<ProductSummary> {
        self.state.lock().items.clone()
    }

    /// Number of times the panel has been rendered
    pub fn render_count(&self) -> usize {
        self.state.lock().renders
    }
}

impl ResultPanel for MemoryPanel {
    fn render(&self, query: &SearchQuery, result: &SuggestionResult) {
        debug!("panel: {} result(s) for '{}'", result.len(), query);
        let mut state = self.state.lock();
        state.open = true;
        state.query = Some(query.to_string());
        state.items = result.items().to_vec();
        state.renders += 1;
    }

    fn hide(&self) {
        let mut state = self.state.lock();
        if state.open {
            debug!("panel: hidden");
        }
        state.open = false;
        state.query = None;
        state.items.clear();
    }

    fn is_open(&self) -> bool {
        self.state.lock().open
    }
}

/// Counter readout holding the last written count
#[derive(Debug, Default)]
pub struct MemoryCounter {
    count: Mutex<Option<u64>>,
}

impl MemoryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written count, `None` if never written
    pub fn count(&self) -> Option<u64> {
        *self.count.lock()
    }
}

impl CounterDisplay for MemoryCounter {
    fn set_count(&self, count: u64) {
        debug!("counter: {}", count);
        *self.count.lock() = Some(count);
    }
}

#[derive(Debug)]
struct ControlState {
    label: String,
    disabled: bool,
    history: Vec<String>,
}

/// Submit button with a label history
#[derive(Debug)]
pub struct MemoryControl {
    state: Mutex<ControlState>,
}

impl MemoryControl {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(ControlState {
                label: label.into(),
                disabled: false,
                history: Vec::new(),
            }),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.state.lock().disabled
    }

    /// Every label set after construction, in order
    pub fn label_history(&self) -> Vec<String> {
        self.state.lock().history.clone()
    }
}

impl SubmitControl for MemoryControl {
    fn label(&self) -> String {
        self.state.lock().label.clone()
    }

    fn set_label(&self, label: &str) {
        debug!("control: '{}'", label);
        let mut state = self.state.lock();
        state.label = label.to_string();
        state.history.push(label.to_string());
    }

    fn set_disabled(&self, disabled: bool) {
        self.state.lock().disabled = disabled;
    }
}

/// Page holding in-memory counters and controls
#[derive(Debug, Default)]
pub struct MemoryPage {
    counters: Mutex<Vec<Arc<MemoryCounter>>>,
    controls: Mutex<HashMap<String, Arc<MemoryControl>>>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a new counter on the page
    pub fn add_counter(&self) -> Arc<MemoryCounter> {
        let counter = Arc::new(MemoryCounter::new());
        self.counters.lock().push(counter.clone());
        counter
    }

    /// Put a submit control for `form_id` on the page
    pub fn add_control(&self, form_id: &str, label: &str) -> Arc<MemoryControl> {
        let control = Arc::new(MemoryControl::new(label));
        self.controls
            .lock()
            .insert(form_id.to_string(), control.clone());
        control
    }
}

impl Page for MemoryPage {
    fn counters(&self) -> Vec<Arc<dyn CounterDisplay>> {
        self.counters
            .lock()
            .iter()
            .map(|c| c.clone() as Arc<dyn CounterDisplay>)
            .collect()
    }

    fn control(&self, form_id: &str) -> Option<Arc<dyn SubmitControl>> {
        self.controls
            .lock()
            .get(form_id)
            .map(|c| c.clone() as Arc<dyn SubmitControl>)
    }
}
