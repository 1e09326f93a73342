//! Page surface the flows are wired to
//!
//! The flows never query a document; they receive hook objects identified by
//! stable element ids.

mod hooks;
mod memory;

pub use hooks::{CounterDisplay, ElementId, Page, PointerEvent, ResultPanel, SubmitControl};
pub use memory::{MemoryControl, MemoryCounter, MemoryPage, MemoryPanel};
