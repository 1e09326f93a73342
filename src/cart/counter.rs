//! Read-through refresh of the cart item count

use super::models::CartSummary;
use crate::config::Settings;
use crate::dom::Page;
use crate::error::{ErrorReporter, FetchError};
use crate::metrics::Metrics;
use crate::network::{accept_json, fetch, resolve_url, StorefrontRequest, Transport, REQUESTED_WITH};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Writes the server's `item_count` into every counter on the page.
/// Nothing is cached, so calling it redundantly is harmless.
#[derive(Clone)]
pub struct CartCounterSync {
    transport: Arc<dyn Transport>,
    endpoint: String,
    timeout: Duration,
    page: Arc<dyn Page>,
    reporter: Arc<dyn ErrorReporter>,
    metrics: Arc<Metrics>,
}

impl CartCounterSync {
    pub fn new(
        settings: &Settings,
        transport: Arc<dyn Transport>,
        page: Arc<dyn Page>,
        reporter: Arc<dyn ErrorReporter>,
        metrics: Arc<Metrics>,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            transport,
            endpoint: resolve_url(&settings.storefront.base_url, &settings.routes.cart_url)?,
            timeout: settings.outgoing.timeout(),
            page,
            reporter,
            metrics,
        })
    }

    /// Fetch the cart summary and update the counters. Returns the count
    /// written, or `None` after reporting a failure.
    pub async fn sync(&self) -> Option<u64> {
        self.metrics.inc_counter_sync();

        let request = StorefrontRequest::get(&self.endpoint)
            .header("Accept", accept_json())
            .header(REQUESTED_WITH.0, REQUESTED_WITH.1);

        let summary = fetch(self.transport.as_ref(), request, self.timeout)
            .await
            .and_then(|response| response.json::<CartSummary>());

        match summary {
            Ok(summary) => {
                let counters = self.page.counters();
                debug!(
                    "cart holds {} item(s), updating {} counter(s)",
                    summary.item_count,
                    counters.len()
                );
                for counter in counters {
                    counter.set_count(summary.item_count);
                }
                Some(summary.item_count)
            }
            Err(err) => {
                warn!("cart count refresh failed: {}", err);
                self.reporter.report("cart count refresh failed", Some(&err));
                None
            }
        }
    }
}
