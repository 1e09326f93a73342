//! storefront-client console
//!
//! Drives the storefront flows from stdin against a live storefront, with
//! in-memory page elements standing in for the theme's markup.

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use storefront_client::{
    cart::{CartEvent, ProductForm},
    config,
    dom::{MemoryCounter, MemoryPage, MemoryPanel, PointerEvent, ResultPanel, SubmitControl},
    network::HttpClient,
    PageHooks, Storefront, TracingReporter,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

const FORM_ID: &str = "product-form";

#[tokio::main]
async fn main() -> Result<()> {
    let Some(config_path) = parse_args()? else {
        return Ok(());
    };

    // Load configuration
    let settings = config::load(config_path.as_deref())?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting storefront-client v{}", storefront_client::VERSION);

    // Initialize HTTP client
    let client = Arc::new(HttpClient::with_settings(&settings.outgoing)?);

    // In-memory page
    let panel = Arc::new(MemoryPanel::new());
    let page = Arc::new(MemoryPage::new());
    let counters: Vec<(String, Arc<MemoryCounter>)> = settings
        .storefront
        .counter_ids
        .iter()
        .map(|id| (id.clone(), page.add_counter()))
        .collect();
    let control = page.add_control(FORM_ID, "Add to cart");

    let storefront = Storefront::new(
        &settings,
        client,
        PageHooks {
            panel: panel.clone(),
            page: page.clone(),
        },
        Arc::new(TracingReporter),
    )?;

    let mut events = storefront.adder.subscribe();
    tokio::spawn(async move {
        while let Ok(CartEvent::Changed { line, item_count }) = events.recv().await {
            info!(
                "cart changed: +{} x variant {} (cart count: {})",
                line.quantity,
                line.variant_id,
                item_count.map_or_else(|| "unknown".to_string(), |c| c.to_string())
            );
        }
    });

    println!("storefront-client ready for {} (type 'help')", settings.storefront.base_url);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "type" => storefront.suggester.on_input(rest),
            "click" => storefront
                .suggester
                .on_pointer_down(&PointerEvent::new(rest.split_whitespace())),
            "esc" => storefront.suggester.on_key("Escape"),
            "add" => {
                let mut args = rest.split_whitespace();
                let Some(variant) = args.next() else {
                    println!("usage: add <variant-id> [quantity]");
                    continue;
                };
                let form = ProductForm::new(FORM_ID)
                    .field("id", variant)
                    .field("quantity", args.next().unwrap_or("1"));
                if !storefront.adder.submit(&form).is_started() {
                    println!("submission ignored");
                }
            }
            "sync" => {
                storefront.counter.sync().await;
            }
            "show" => {
                if panel.is_open() {
                    println!("suggestions for '{}':", panel.query().unwrap_or_default());
                    for item in panel.items() {
                        println!(
                            "  {} -> {}{}",
                            item.title,
                            item.url,
                            item.price.map(|p| format!(" ({})", p)).unwrap_or_default()
                        );
                    }
                } else {
                    println!("suggestions hidden");
                }
                for (id, counter) in &counters {
                    match counter.count() {
                        Some(count) => println!("#{}: {}", id, count),
                        None => println!("#{}: -", id),
                    }
                }
                println!("button: '{}'", control.label());
            }
            "stats" => println!("{}", serde_json::to_string_pretty(&storefront.metrics.snapshot())?),
            "help" => print_commands(),
            "quit" | "exit" => break,
            other => println!("unknown command '{}' (type 'help')", other),
        }
    }

    storefront.shutdown();
    Ok(())
}

/// Returns the optional config path, or `None` when the process should exit
fn parse_args() -> Result<Option<Option<PathBuf>>> {
    let mut config_path = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => bail!("{} requires a file argument", arg),
            },
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("storefront-client {}", storefront_client::VERSION);
                return Ok(None);
            }
            other => bail!("unexpected argument '{}'", other),
        }
    }

    Ok(Some(config_path))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
storefront-client v{}
Predictive search and AJAX cart flows for Shopify-style storefronts

USAGE:
    storefront-client [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    STOREFRONT_SETTINGS_PATH    Path to storefront.yml
    STOREFRONT_BASE_URL         Storefront origin
    STOREFRONT_DEBOUNCE_MS      Search debounce interval
    STOREFRONT_REQUEST_TIMEOUT  Request timeout in seconds
    STOREFRONT_LOG_LEVEL        Log filter when RUST_LOG is unset
"#,
        storefront_client::VERSION
    );
}

fn print_commands() {
    println!(
        r#"  type <text>          keystroke in the search field (full field value)
  click <id> [<id>..]  pointer press; target id first, then ancestors
  esc                  Escape in the search field
  add <variant> [qty]  submit the product form
  sync                 refresh the cart counters
  show                 print panel, counters and button
  stats                print flow counters
  quit                 exit"#
    );
}
