//! Predictive search module
//!
//! Turns keystrokes into at most one suggestion request per quiet window and
//! renders only the newest answer.

mod backends;
mod models;
mod suggester;

pub use backends::{get_backend, HtmlBackend, JsonBackend, SuggestBackend};
pub use models::*;
pub use suggester::{SearchSuggester, SuggesterHooks};
