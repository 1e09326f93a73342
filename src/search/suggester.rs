//! Debounced predictive search with last-request-wins rendering

use super::backends::{get_backend, SuggestBackend};
use super::models::{SearchQuery, SuggestionResult};
use crate::config::{SearchSettings, Settings};
use crate::dom::{ElementId, PointerEvent, ResultPanel};
use crate::error::{ErrorReporter, FetchError};
use crate::flow::FlowState;
use crate::metrics::Metrics;
use crate::network::{fetch, resolve_url, Transport};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Page hooks the suggester is attached to
#[derive(Clone)]
pub struct SuggesterHooks {
    pub input_id: ElementId,
    pub panel_id: ElementId,
    pub panel: Arc<dyn ResultPanel>,
}

/// One debounce cycle at a time. Every input, dismissal or shutdown bumps
/// `generation`; a cycle only touches the panel while its generation is
/// still current.
#[derive(Default)]
struct Cycle {
    generation: u64,
    state: FlowState,
    last_outcome: Option<FlowState>,
    task: Option<JoinHandle<()>>,
}

impl Cycle {
    fn supersede(&mut self) -> u64 {
        self.generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.state.reset();
        self.generation
    }
}

struct Inner {
    transport: Arc<dyn Transport>,
    backend: Box<dyn SuggestBackend>,
    endpoint: String,
    settings: SearchSettings,
    timeout: Duration,
    hooks: SuggesterHooks,
    reporter: Arc<dyn ErrorReporter>,
    metrics: Arc<Metrics>,
    cycle: Mutex<Cycle>,
}

/// Predictive search attached to one text field and one result panel.
///
/// Event handlers are synchronous and spawn onto the current Tokio runtime.
#[derive(Clone)]
pub struct SearchSuggester {
    inner: Arc<Inner>,
}

impl SearchSuggester {
    pub fn new(
        settings: &Settings,
        transport: Arc<dyn Transport>,
        hooks: SuggesterHooks,
        reporter: Arc<dyn ErrorReporter>,
        metrics: Arc<Metrics>,
    ) -> Result<Self, FetchError> {
        let endpoint = resolve_url(&settings.storefront.base_url, &settings.routes.predictive_search_url)?;

        Ok(Self {
            inner: Arc::new(Inner {
                transport,
                backend: get_backend(settings.search.response_format),
                endpoint,
                settings: settings.search.clone(),
                timeout: settings.outgoing.timeout(),
                hooks,
                reporter,
                metrics,
                cycle: Mutex::new(Cycle::default()),
            }),
        })
    }

    /// Keystroke in the search field; `value` is the field's full text
    pub fn on_input(&self, value: &str) {
        let query = SearchQuery::parse(value, self.inner.settings.min_query_length);

        {
            let mut cycle = self.inner.cycle.lock();
            let generation = cycle.supersede();
            if let Some(query) = query {
                let inner = self.inner.clone();
                cycle.task = Some(tokio::spawn(inner.run(generation, query)));
                return;
            }
        }

        debug!("query '{}' too short, hiding suggestions", value.trim());
        self.inner.hooks.panel.hide();
    }

    /// Pointer press anywhere on the page
    pub fn on_pointer_down(&self, event: &PointerEvent) {
        let hooks = &self.inner.hooks;
        if event.hits(&hooks.input_id) || event.hits(&hooks.panel_id) {
            return;
        }
        self.dismiss();
    }

    /// Key press while the search field has focus
    pub fn on_key(&self, key: &str) {
        if key == "Escape" {
            self.dismiss();
        }
    }

    /// Hide the panel and drop any pending cycle
    pub fn dismiss(&self) {
        self.inner.cycle.lock().supersede();
        self.inner.hooks.panel.hide();
    }

    /// Abort the pending cycle without touching the panel
    pub fn shutdown(&self) {
        self.inner.cycle.lock().supersede();
    }

    pub fn state(&self) -> FlowState {
        self.inner.cycle.lock().state
    }

    /// Terminal state of the last cycle that reached the network
    pub fn last_outcome(&self) -> Option<FlowState> {
        self.inner.cycle.lock().last_outcome
    }
}

impl Inner {
    async fn run(self: Arc<Self>, generation: u64, query: SearchQuery) {
        sleep(self.settings.debounce()).await;

        {
            let mut cycle = self.cycle.lock();
            if cycle.generation != generation {
                return;
            }
            cycle.state.begin();
        }

        debug!("requesting suggestions for '{}'", query);
        self.metrics.inc_suggest_request();

        let request = self.backend.request(&self.endpoint, &query, &self.settings);
        let outcome = match fetch(self.transport.as_ref(), request, self.timeout).await {
            Ok(response) => self.backend.parse(&response),
            Err(e) => Err(e),
        };

        // applied under the lock so a superseded cycle can never touch the panel
        let failure = {
            let mut cycle = self.cycle.lock();
            if cycle.generation != generation {
                self.metrics.inc_suggest_stale();
                debug!("discarding stale suggestions for '{}'", query);
                return;
            }

            let failure = match outcome {
                Ok(products) => {
                    cycle.state.succeed();
                    let result = SuggestionResult::new(products, self.settings.result_limit);
                    if result.is_empty() {
                        self.hooks.panel.hide();
                    } else {
                        self.hooks.panel.render(&query, &result);
                    }
                    None
                }
                Err(err) => {
                    cycle.state.fail();
                    self.hooks.panel.hide();
                    Some(err)
                }
            };

            cycle.last_outcome = Some(cycle.state);
            cycle.state.settle();
            cycle.task = None;
            failure
        };

        if let Some(err) = failure {
            warn!("predictive search for '{}' failed: {}", query, err);
            self.metrics.inc_suggest_failure();
            self.reporter
                .report(&format!("predictive search for '{}' failed", query), Some(&err));
        }
    }
}
