//! storefront-client: predictive search and AJAX cart flows for
//! Shopify-style storefronts
//!
//! The page is an injected set of hooks; the flows own the request
//! sequencing (debounce, supersession, busy guards) and nothing else.

pub mod cart;
pub mod config;
pub mod dom;
pub mod error;
pub mod flow;
pub mod metrics;
pub mod network;
pub mod search;
pub mod storefront;

pub use cart::{CartAdder, CartCounterSync, CartEvent, ProductForm, Submission};
pub use config::Settings;
pub use error::{ErrorReporter, FetchError, TracingReporter};
pub use flow::FlowState;
pub use network::{HttpClient, Transport};
pub use search::{SearchQuery, SearchSuggester, SuggestionResult};
pub use storefront::{PageHooks, Storefront};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for storefront requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 8;
