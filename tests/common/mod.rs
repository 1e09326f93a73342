#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use storefront_client::cart::{CartAdder, CartCounterSync};
use storefront_client::dom::{MemoryControl, MemoryCounter, MemoryPage, MemoryPanel};
use storefront_client::error::{ErrorReporter, FetchError};
use storefront_client::metrics::Metrics;
use storefront_client::network::{StorefrontRequest, StorefrontResponse, Transport};
use storefront_client::search::{SearchSuggester, SuggesterHooks};
use storefront_client::Settings;

pub const INPUT_ID: &str = "Search-In-Modal";
pub const PANEL_ID: &str = "predictive-search-results";

/// Canned answer for one request
pub struct Reply {
    outcome: Result<(u16, String), String>,
    delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            outcome: Ok((status, body.to_string())),
            delay: Duration::ZERO,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            outcome: Ok((status, body.to_string())),
            delay: Duration::ZERO,
        }
    }

    pub fn network_error() -> Self {
        Self {
            outcome: Err("connection reset".to_string()),
            delay: Duration::ZERO,
        }
    }

    pub fn after_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

type Handler = Box<dyn Fn(&StorefrontRequest) -> Reply + Send + Sync>;

/// In-process storefront that records every request it receives
pub struct ScriptedTransport {
    handler: Handler,
    requests: Mutex<Vec<StorefrontRequest>>,
}

impl ScriptedTransport {
    pub fn new(handler: impl Fn(&StorefrontRequest) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<StorefrontRequest> {
        self.requests.lock().clone()
    }

    /// Requests whose URL ends with `suffix`
    pub fn count(&self, suffix: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.url.ends_with(suffix))
            .count()
    }

    /// `q` parameter of every suggestion request, in order
    pub fn queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .filter_map(|r| r.param_value("q").map(String::from))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: StorefrontRequest) -> Result<StorefrontResponse, FetchError> {
        let reply = (self.handler)(&request);
        self.requests.lock().push(request);
        tokio::time::sleep(reply.delay).await;
        match reply.outcome {
            Ok((status, body)) => Ok(StorefrontResponse::new(status, body)),
            Err(reason) => Err(FetchError::NetworkFailure(reason)),
        }
    }
}

/// Reporter that keeps every diagnostic
#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<(String, Option<String>)> {
        self.reports.lock().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, message: &str, error: Option<&FetchError>) {
        self.reports
            .lock()
            .push((message.to_string(), error.map(|e| e.to_string())));
    }
}

pub fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.storefront.base_url = "https://shop.test".to_string();
    settings
}

/// Body of a suggestion response listing one product per title
pub fn suggest_body(titles: &[&str]) -> Value {
    let products: Vec<Value> = titles
        .iter()
        .map(|t| {
            json!({
                "title": t,
                "url": format!("/products/{}", t.to_lowercase().replace(' ', "-")),
                "price": "25.00"
            })
        })
        .collect();
    json!({ "resources": { "results": { "products": products } } })
}

pub fn wait(ms: u64) -> tokio::time::Sleep {
    tokio::time::sleep(Duration::from_millis(ms))
}

pub struct SearchFixture {
    pub suggester: SearchSuggester,
    pub panel: Arc<MemoryPanel>,
    pub transport: Arc<ScriptedTransport>,
    pub reporter: Arc<RecordingReporter>,
    pub metrics: Arc<Metrics>,
}

pub fn search_fixture(settings: &Settings, transport: Arc<ScriptedTransport>) -> SearchFixture {
    let panel = Arc::new(MemoryPanel::new());
    let reporter = Arc::new(RecordingReporter::default());
    let metrics = Arc::new(Metrics::new());

    let suggester = SearchSuggester::new(
        settings,
        transport.clone(),
        SuggesterHooks {
            input_id: INPUT_ID.to_string(),
            panel_id: PANEL_ID.to_string(),
            panel: panel.clone(),
        },
        reporter.clone(),
        metrics.clone(),
    )
    .unwrap();

    SearchFixture {
        suggester,
        panel,
        transport,
        reporter,
        metrics,
    }
}

pub struct CartFixture {
    pub adder: CartAdder,
    pub page: Arc<MemoryPage>,
    pub counters: Vec<Arc<MemoryCounter>>,
    pub control_a: Arc<MemoryControl>,
    pub control_b: Arc<MemoryControl>,
    pub transport: Arc<ScriptedTransport>,
    pub reporter: Arc<RecordingReporter>,
    pub metrics: Arc<Metrics>,
}

pub fn cart_fixture(settings: &Settings, transport: Arc<ScriptedTransport>) -> CartFixture {
    let page = Arc::new(MemoryPage::new());
    let counters = vec![page.add_counter(), page.add_counter()];
    let control_a = page.add_control("form-a", "Add to cart");
    let control_b = page.add_control("form-b", "Add to cart");
    let reporter = Arc::new(RecordingReporter::default());
    let metrics = Arc::new(Metrics::new());

    let counter = CartCounterSync::new(
        settings,
        transport.clone(),
        page.clone(),
        reporter.clone(),
        metrics.clone(),
    )
    .unwrap();
    let adder = CartAdder::new(
        settings,
        transport.clone(),
        page.clone(),
        counter,
        reporter.clone(),
        metrics.clone(),
    )
    .unwrap();

    CartFixture {
        adder,
        page,
        counters,
        control_a,
        control_b,
        transport,
        reporter,
        metrics,
    }
}

/// Storefront answering cart calls: add.js echoes the variant, cart.js
/// reports `item_count`
pub fn cart_handler(item_count: u64, add_status: u16, add_delay_ms: u64) -> impl Fn(&StorefrontRequest) -> Reply + Send + Sync + 'static {
    move |req: &StorefrontRequest| {
        if req.url.ends_with("/cart/add.js") {
            if add_status == 200 {
                let variant = req
                    .form
                    .as_ref()
                    .and_then(|f| f.iter().find(|(k, _)| k == "id"))
                    .and_then(|(_, v)| v.parse::<u64>().ok())
                    .unwrap_or(0);
                Reply::json(200, json!({"variant_id": variant, "quantity": 1, "title": "Linen Shirt"}))
                    .after_ms(add_delay_ms)
            } else {
                Reply::json(add_status, json!({"status": add_status, "message": "Cart Error", "description": "Sold out"}))
                    .after_ms(add_delay_ms)
            }
        } else {
            Reply::json(200, json!({"item_count": item_count, "items": []}))
        }
    }
}
