mod common;

use common::*;
use std::sync::Arc;
use storefront_client::dom::{MemoryPanel, PointerEvent, ResultPanel};
use storefront_client::metrics::Metrics;
use storefront_client::search::{SearchQuery, SearchSuggester, SuggesterHooks, SuggestionResult};
use storefront_client::FlowState;

fn echo_handler(req: &storefront_client::network::StorefrontRequest) -> Reply {
    let q = req.param_value("q").unwrap_or_default().to_string();
    let shirt = format!("{q} Shirt");
    let scarf = format!("{q} Scarf");
    Reply::json(200, suggest_body(&[shirt.as_str(), scarf.as_str()]))
}

#[tokio::test(start_paused = true)]
async fn test_short_queries_never_hit_the_network() {
    let fx = search_fixture(&settings(), ScriptedTransport::new(echo_handler));

    for value in ["", " ", "a", "ab", "  ab  "] {
        fx.suggester.on_input(value);
        wait(1000).await;
        assert!(!fx.panel.is_open(), "{value:?}");
    }

    assert_eq!(fx.transport.requests().len(), 0);
    assert_eq!(fx.metrics.snapshot().suggest_requests, 0);
}

#[tokio::test(start_paused = true)]
async fn test_short_query_hides_open_panel() {
    let fx = search_fixture(&settings(), ScriptedTransport::new(echo_handler));

    fx.suggester.on_input("linen");
    wait(400).await;
    assert!(fx.panel.is_open());

    fx.suggester.on_input("li");
    assert!(!fx.panel.is_open());
    wait(1000).await;
    assert_eq!(fx.transport.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_issues_one_request() {
    let fx = search_fixture(&settings(), ScriptedTransport::new(echo_handler));

    fx.suggester.on_input("lin");
    wait(100).await;
    fx.suggester.on_input("line");
    wait(100).await;
    fx.suggester.on_input("linen");

    wait(299).await;
    assert!(fx.transport.requests().is_empty());

    wait(10).await;
    assert_eq!(fx.transport.queries(), vec!["linen".to_string()]);

    wait(1000).await;
    assert_eq!(fx.transport.requests().len(), 1);
    assert_eq!(fx.panel.query().as_deref(), Some("linen"));
    assert_eq!(fx.panel.items()[0].title, "linen Shirt");
    assert_eq!(fx.suggester.last_outcome(), Some(FlowState::Success));
    assert_eq!(fx.suggester.state(), FlowState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_late_response_for_older_query_is_not_rendered() {
    let transport = ScriptedTransport::new(|req| {
        let q = req.param_value("q").unwrap_or_default();
        let delay = if q == "shirt" { 1000 } else { 50 };
        let title = format!("{q} result");
        Reply::json(200, suggest_body(&[title.as_str()])).after_ms(delay)
    });
    let fx = search_fixture(&settings(), transport);

    fx.suggester.on_input("shirt");
    wait(400).await; // "shirt" request is in flight
    fx.suggester.on_input("scarf");
    wait(3000).await; // both would have resolved by now

    assert_eq!(fx.transport.queries(), vec!["shirt".to_string(), "scarf".to_string()]);
    assert_eq!(fx.panel.query().as_deref(), Some("scarf"));
    assert_eq!(fx.panel.items()[0].title, "scarf result");
    assert_eq!(fx.panel.render_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_request_carries_type_and_limit() {
    let mut settings = settings();
    settings.search.result_limit = 6;
    settings.search.resource_type = "product,collection".to_string();
    let fx = search_fixture(&settings, ScriptedTransport::new(echo_handler));

    fx.suggester.on_input("  linen ");
    wait(400).await;

    let requests = fx.transport.requests();
    assert_eq!(requests[0].url, "https://shop.test/search/suggest.json");
    assert_eq!(requests[0].param_value("q"), Some("linen"));
    assert_eq!(requests[0].param_value("resources[type]"), Some("product,collection"));
    assert_eq!(requests[0].param_value("resources[limit]"), Some("6"));
}

#[tokio::test(start_paused = true)]
async fn test_results_capped_at_limit() {
    let transport = ScriptedTransport::new(|_| {
        Reply::json(200, suggest_body(&["A1", "A2", "A3", "A4", "A5", "A6"]))
    });
    let fx = search_fixture(&settings(), transport);

    fx.suggester.on_input("aaa");
    wait(400).await;

    let items = fx.panel.items();
    assert_eq!(items.len(), 4);
    assert_eq!(items[3].title, "A4");
    assert_eq!(items[0].url, "/products/a1");
}

#[tokio::test(start_paused = true)]
async fn test_empty_result_hides_panel() {
    let transport = ScriptedTransport::new(|req| {
        if req.param_value("q") == Some("linen") {
            Reply::json(200, suggest_body(&["Linen Shirt"]))
        } else {
            Reply::json(200, suggest_body(&[]))
        }
    });
    let fx = search_fixture(&settings(), transport);

    fx.suggester.on_input("linen");
    wait(400).await;
    assert!(fx.panel.is_open());

    fx.suggester.on_input("zzzz");
    wait(400).await;
    assert!(!fx.panel.is_open());
    assert!(fx.reporter.reports().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failures_hide_panel_and_report_once() {
    let cases = [
        Reply::text(500, "Internal Server Error"),
        Reply::text(200, "<html>not json</html>"),
        Reply::network_error(),
    ];

    for (i, reply) in cases.into_iter().enumerate() {
        let reply = parking_lot::Mutex::new(Some(reply));
        let transport = ScriptedTransport::new(move |req| {
            if req.param_value("q") == Some("linen") {
                Reply::json(200, suggest_body(&["Linen Shirt"]))
            } else {
                reply.lock().take().unwrap_or_else(Reply::network_error)
            }
        });
        let fx = search_fixture(&settings(), transport);

        fx.suggester.on_input("linen");
        wait(400).await;
        assert!(fx.panel.is_open());

        fx.suggester.on_input("broken");
        wait(400).await;

        assert!(!fx.panel.is_open(), "case {i}");
        let reports = fx.reporter.reports();
        assert_eq!(reports.len(), 1, "case {i}");
        assert!(reports[0].0.contains("broken"));
        assert_eq!(fx.suggester.last_outcome(), Some(FlowState::Failed));
        assert_eq!(fx.metrics.snapshot().suggest_failures, 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_endpoint_times_out() {
    let mut settings = settings();
    settings.outgoing.request_timeout = 5.0;
    let transport = ScriptedTransport::new(|_| Reply::json(200, suggest_body(&["Late"])).after_ms(60_000));
    let fx = search_fixture(&settings, transport);

    fx.suggester.on_input("linen");
    wait(6000).await;

    let reports = fx.reporter.reports();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].1.as_deref().unwrap().contains("timed out"));
    assert!(!fx.panel.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_click_outside_hides_panel() {
    let fx = search_fixture(&settings(), ScriptedTransport::new(echo_handler));

    fx.suggester.on_input("linen");
    wait(400).await;
    assert!(fx.panel.is_open());

    fx.suggester.on_pointer_down(&PointerEvent::new([INPUT_ID, "header", "body"]));
    assert!(fx.panel.is_open());

    fx.suggester
        .on_pointer_down(&PointerEvent::new(["result-link-0", "result-0", PANEL_ID, "body"]));
    assert!(fx.panel.is_open());

    fx.suggester.on_pointer_down(&PointerEvent::new(["hero", "main", "body"]));
    assert!(!fx.panel.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_dismissal_drops_pending_cycle() {
    let fx = search_fixture(&settings(), ScriptedTransport::new(echo_handler));

    fx.suggester.on_input("linen");
    wait(100).await;
    fx.suggester.on_pointer_down(&PointerEvent::new(["footer"]));
    wait(1000).await;

    assert!(fx.transport.requests().is_empty());
    assert!(!fx.panel.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_escape_hides_panel() {
    let fx = search_fixture(&settings(), ScriptedTransport::new(echo_handler));

    fx.suggester.on_input("linen");
    wait(400).await;

    fx.suggester.on_key("ArrowDown");
    assert!(fx.panel.is_open());

    fx.suggester.on_key("Escape");
    assert!(!fx.panel.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_aborts_pending_request() {
    let transport = ScriptedTransport::new(|_| Reply::json(200, suggest_body(&["Late"])).after_ms(500));
    let fx = search_fixture(&settings(), transport);

    fx.suggester.on_input("linen");
    wait(400).await;
    assert_eq!(fx.suggester.state(), FlowState::Pending);

    fx.suggester.shutdown();
    assert_eq!(fx.suggester.state(), FlowState::Idle);
    wait(1000).await;

    assert!(!fx.panel.is_open());
    assert_eq!(fx.suggester.last_outcome(), None);
}

/// Panel that asks the suggester for its state whenever it is hidden
struct ObservingPanel {
    inner: MemoryPanel,
    suggester: parking_lot::Mutex<Option<SearchSuggester>>,
    seen: parking_lot::Mutex<Vec<FlowState>>,
}

impl ResultPanel for ObservingPanel {
    fn render(&self, query: &SearchQuery, result: &SuggestionResult) {
        self.inner.render(query, result);
    }

    fn hide(&self) {
        let suggester = self.suggester.lock().clone();
        if let Some(suggester) = suggester {
            self.seen.lock().push(suggester.state());
        }
        self.inner.hide();
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }
}

#[tokio::test(start_paused = true)]
async fn test_panel_may_query_suggester_when_hidden() {
    let panel = Arc::new(ObservingPanel {
        inner: MemoryPanel::new(),
        suggester: parking_lot::Mutex::new(None),
        seen: parking_lot::Mutex::new(Vec::new()),
    });
    let suggester = SearchSuggester::new(
        &settings(),
        ScriptedTransport::new(echo_handler),
        SuggesterHooks {
            input_id: INPUT_ID.to_string(),
            panel_id: PANEL_ID.to_string(),
            panel: panel.clone(),
        },
        Arc::new(RecordingReporter::default()),
        Arc::new(Metrics::new()),
    )
    .unwrap();
    *panel.suggester.lock() = Some(suggester.clone());

    suggester.on_input("linen");
    wait(400).await;
    assert!(panel.is_open());

    suggester.on_key("Escape");
    assert!(!panel.is_open());

    suggester.on_input("li");
    suggester.on_pointer_down(&PointerEvent::new(["footer"]));

    assert_eq!(*panel.seen.lock(), vec![FlowState::Idle; 3]);

    // break the suggester <-> panel cycle
    panel.suggester.lock().take();
}
