//! Bootstrap wiring the flows to one page
//!
//! Each component is constructed on its own from the same settings and
//! transport; nothing is discovered or registered implicitly.

use crate::cart::{CartAdder, CartCounterSync};
use crate::config::Settings;
use crate::dom::{Page, ResultPanel};
use crate::error::ErrorReporter;
use crate::metrics::Metrics;
use crate::network::Transport;
use crate::search::{SearchSuggester, SuggesterHooks};
use std::sync::Arc;
use tracing::info;

/// Page elements the storefront flows are attached to
#[derive(Clone)]
pub struct PageHooks {
    pub panel: Arc<dyn ResultPanel>,
    pub page: Arc<dyn Page>,
}

/// The composed storefront flows
#[derive(Clone)]
pub struct Storefront {
    pub suggester: SearchSuggester,
    pub adder: CartAdder,
    pub counter: CartCounterSync,
    pub metrics: Arc<Metrics>,
}

impl Storefront {
    pub fn new(
        settings: &Settings,
        transport: Arc<dyn Transport>,
        hooks: PageHooks,
        reporter: Arc<dyn ErrorReporter>,
    ) -> anyhow::Result<Self> {
        settings.validate()?;
        let metrics = Arc::new(Metrics::new());

        let suggester = SearchSuggester::new(
            settings,
            transport.clone(),
            SuggesterHooks {
                input_id: settings.storefront.search_input_id.clone(),
                panel_id: settings.storefront.results_panel_id.clone(),
                panel: hooks.panel,
            },
            reporter.clone(),
            metrics.clone(),
        )?;

        let counter = CartCounterSync::new(
            settings,
            transport.clone(),
            hooks.page.clone(),
            reporter.clone(),
            metrics.clone(),
        )?;

        let adder = CartAdder::new(
            settings,
            transport,
            hooks.page,
            counter.clone(),
            reporter,
            metrics.clone(),
        )?;

        info!("Storefront flows wired to {}", settings.storefront.base_url);

        Ok(Self {
            suggester,
            adder,
            counter,
            metrics,
        })
    }

    /// Stop pending search work
    pub fn shutdown(&self) {
        self.suggester.shutdown();
    }
}
