//! AJAX add-to-cart with a per-form busy guard

use super::counter::CartCounterSync;
use super::models::{AddedLine, CartEvent, CartLineRequest, ProductForm};
use crate::config::{CartSettings, Settings};
use crate::dom::{Page, SubmitControl};
use crate::error::{ErrorReporter, FetchError};
use crate::flow::FlowState;
use crate::metrics::Metrics;
use crate::network::{accept_json, fetch, resolve_url, StorefrontRequest, Transport, REQUESTED_WITH};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// What happened to a submission
#[derive(Debug)]
pub enum Submission {
    /// The add is in flight; the handle yields `Success` or `Failed`
    Started(JoinHandle<FlowState>),
    /// An add for the same form is still in flight
    Busy,
    /// The form does not describe a cart line
    Invalid,
}

impl Submission {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }

    /// Wait for a started add. `None` for ignored submissions or an aborted task.
    pub async fn outcome(self) -> Option<FlowState> {
        match self {
            Self::Started(handle) => handle.await.ok(),
            _ => None,
        }
    }
}

struct Inner {
    transport: Arc<dyn Transport>,
    endpoint: String,
    timeout: Duration,
    settings: CartSettings,
    page: Arc<dyn Page>,
    counter: CartCounterSync,
    reporter: Arc<dyn ErrorReporter>,
    metrics: Arc<Metrics>,
    busy: Mutex<HashSet<String>>,
    confirmations: Mutex<ConfirmationBoard>,
    events: broadcast::Sender<CartEvent>,
}

/// Confirmation labels currently showing, by form id. An entry lives from
/// the first confirmation until the label is restored; each further
/// confirmation takes a new ticket so only the newest timer restores.
#[derive(Default)]
struct ConfirmationBoard {
    next_ticket: u64,
    showing: HashMap<String, Confirmation>,
}

struct Confirmation {
    /// Label the control had before the confirmation replaced it
    original: String,
    ticket: u64,
}

/// Intercepts product-form submissions and posts them to the cart.
///
/// Different forms add concurrently; a form is ignored while its own add is
/// in flight.
#[derive(Clone)]
pub struct CartAdder {
    inner: Arc<Inner>,
}

impl CartAdder {
    pub fn new(
        settings: &Settings,
        transport: Arc<dyn Transport>,
        page: Arc<dyn Page>,
        counter: CartCounterSync,
        reporter: Arc<dyn ErrorReporter>,
        metrics: Arc<Metrics>,
    ) -> Result<Self, FetchError> {
        let (events, _) = broadcast::channel(settings.cart.event_capacity.max(1));

        Ok(Self {
            inner: Arc::new(Inner {
                transport,
                endpoint: resolve_url(&settings.storefront.base_url, &settings.routes.cart_add_url)?,
                timeout: settings.outgoing.timeout(),
                settings: settings.cart.clone(),
                page,
                counter,
                reporter,
                metrics,
                busy: Mutex::new(HashSet::new()),
                confirmations: Mutex::new(ConfirmationBoard::default()),
                events,
            }),
        })
    }

    /// Listen for cart changes without holding a reference to the adder
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.inner.events.subscribe()
    }

    /// Whether an add for `form_id` is in flight
    pub fn is_busy(&self, form_id: &str) -> bool {
        self.inner.busy.lock().contains(form_id)
    }

    /// Form submission. Spawns onto the current Tokio runtime.
    pub fn submit(&self, form: &ProductForm) -> Submission {
        let line = match CartLineRequest::from_fields(&form.fields) {
            Ok(line) => line,
            Err(err) => {
                self.inner
                    .reporter
                    .report(&format!("form '{}' cannot be added to the cart", form.id), Some(&err));
                return Submission::Invalid;
            }
        };

        if !self.inner.busy.lock().insert(form.id.clone()) {
            debug!("form '{}' is busy, ignoring submission", form.id);
            self.inner.metrics.inc_cart_busy_ignored();
            return Submission::Busy;
        }

        let inner = self.inner.clone();
        Submission::Started(tokio::spawn(inner.add(form.id.clone(), line)))
    }
}

impl Inner {
    async fn add(self: Arc<Self>, form_id: String, line: CartLineRequest) -> FlowState {
        let mut state = FlowState::Idle;
        state.begin();

        let control = self.page.control(&form_id);
        if let Some(ref control) = control {
            control.set_disabled(true);
        }

        debug!("adding {} x variant {} from form '{}'", line.quantity, line.variant_id, form_id);
        self.metrics.inc_cart_add();

        let request = StorefrontRequest::post(&self.endpoint)
            .header("Accept", accept_json())
            .header(REQUESTED_WITH.0, REQUESTED_WITH.1)
            .form(line.encode());

        let added = fetch(self.transport.as_ref(), request, self.timeout)
            .await
            .and_then(|response| AddedLine::from_response(&response));

        self.busy.lock().remove(&form_id);
        if let Some(ref control) = control {
            control.set_disabled(false);
        }

        let outcome = match added {
            Ok(added) => {
                state.succeed();
                info!("added {} x '{}' to cart", added.quantity, added.title);

                if let Some(control) = control {
                    self.confirm(&form_id, control);
                }

                let item_count = self.counter.sync().await;
                let event = CartEvent::Changed {
                    line: added,
                    item_count,
                };
                if self.events.send(event).is_err() {
                    debug!("no cart listeners");
                }
                state
            }
            Err(err) => {
                state.fail();
                warn!("add to cart from form '{}' failed: {}", form_id, err);
                self.metrics.inc_cart_failure();
                self.reporter
                    .report(&format!("add to cart from form '{}' failed", form_id), Some(&err));
                state
            }
        };

        state.settle();
        outcome
    }

    /// Show the confirmation label, then put the original back once no
    /// newer confirmation for the same form is showing.
    ///
    /// Control hooks run with the board locked so a restore and a new
    /// confirmation cannot interleave.
    fn confirm(self: &Arc<Self>, form_id: &str, control: Arc<dyn SubmitControl>) {
        let ticket = {
            let mut board = self.confirmations.lock();
            board.next_ticket += 1;
            let ticket = board.next_ticket;
            board
                .showing
                .entry(form_id.to_string())
                .and_modify(|c| c.ticket = ticket)
                .or_insert_with(|| Confirmation {
                    original: control.label(),
                    ticket,
                });
            control.set_label(&self.settings.added_label);
            ticket
        };

        let inner = self.clone();
        let form_id = form_id.to_string();
        let delay = self.settings.confirmation();
        tokio::spawn(async move {
            sleep(delay).await;
            let mut board = inner.confirmations.lock();
            let current = board
                .showing
                .get(&form_id)
                .map_or(false, |c| c.ticket == ticket);
            if !current {
                debug!("confirmation for form '{}' superseded", form_id);
                return;
            }
            if let Some(confirmation) = board.showing.remove(&form_id) {
                control.set_label(&confirmation.original);
            }
        });
    }
}
