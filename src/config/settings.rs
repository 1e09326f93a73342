//! Settings structures for storefront-client configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Main settings structure, one section per component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storefront: StorefrontSettings,
    pub routes: RouteSettings,
    pub search: SearchSettings,
    pub cart: CartSettings,
    pub outgoing: OutgoingSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (STOREFRONT_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("STOREFRONT_BASE_URL") {
            self.storefront.base_url = val;
        }
        if let Ok(val) = std::env::var("STOREFRONT_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse() {
                self.search.debounce_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("STOREFRONT_REQUEST_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.outgoing.request_timeout = secs;
            }
        }
        if let Ok(val) = std::env::var("STOREFRONT_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Reject settings the components cannot run with
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = Url::parse(&self.storefront.base_url) {
            bail!("invalid storefront.base_url '{}': {}", self.storefront.base_url, e);
        }
        if self.search.result_limit == 0 {
            bail!("search.result_limit must be at least 1");
        }
        let timeout = self.outgoing.request_timeout;
        if timeout <= 0.0 || Duration::try_from_secs_f64(timeout).is_err() {
            bail!("outgoing.request_timeout must be a positive number of seconds, got {}", timeout);
        }
        Ok(())
    }
}

/// Where the storefront lives and which page elements the flows hook into
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontSettings {
    /// Origin every relative route is resolved against
    pub base_url: String,
    /// Id of the predictive search text field
    pub search_input_id: String,
    /// Id of the suggestion panel
    pub results_panel_id: String,
    /// Ids of the cart count readouts
    pub counter_ids: Vec<String>,
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9292".to_string(),
            search_input_id: "Search-In-Modal".to_string(),
            results_panel_id: "predictive-search-results".to_string(),
            counter_ids: vec!["cart-count".to_string()],
        }
    }
}

/// Storefront endpoint routes (relative or absolute)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    pub predictive_search_url: String,
    pub cart_add_url: String,
    pub cart_url: String,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            predictive_search_url: "/search/suggest.json".to_string(),
            cart_add_url: "/cart/add.js".to_string(),
            cart_url: "/cart.js".to_string(),
        }
    }
}

/// Shape of the suggestion endpoint's body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Resource list under `resources.results.products`
    #[default]
    Json,
    /// Rendered section fragment
    Html,
}

/// Predictive search behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet window before a request is issued
    pub debounce_ms: u64,
    /// Trimmed queries shorter than this never hit the network
    pub min_query_length: usize,
    /// Maximum number of products rendered
    pub result_limit: usize,
    /// Value of the `resources[type]` filter
    pub resource_type: String,
    pub response_format: ResponseFormat,
    /// Section rendered when `response_format` is html
    pub section_id: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_length: 3,
            result_limit: 4,
            resource_type: "product".to_string(),
            response_format: ResponseFormat::Json,
            section_id: "predictive-search".to_string(),
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Add-to-cart behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CartSettings {
    /// How long the confirmation label stays on the control
    pub confirmation_ms: u64,
    /// Confirmation label
    pub added_label: String,
    /// Buffer size of the cart-changed broadcast channel
    pub event_capacity: usize,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            confirmation_ms: 2000,
            added_label: "Added!".to_string(),
            event_capacity: 16,
        }
    }
}

impl CartSettings {
    pub fn confirmation(&self) -> Duration {
        Duration::from_millis(self.confirmation_ms)
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Upper bound on every request, in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            pool_maxsize: 8,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

impl OutgoingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout)
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
