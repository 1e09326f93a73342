//! Suggestion endpoint contracts
//!
//! Storefronts expose predictive search either as a JSON resource list or as
//! a rendered section fragment. Each backend knows how to ask for its format
//! and how to read it back.

use super::models::{ProductSummary, SearchQuery};
use crate::config::{ResponseFormat, SearchSettings};
use crate::error::FetchError;
use crate::network::{accept_html, accept_json, StorefrontRequest, StorefrontResponse};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

/// Builds the suggestion request and parses its response
pub trait SuggestBackend: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Build the GET for `query` against the resolved endpoint `url`
    fn request(&self, url: &str, query: &SearchQuery, settings: &SearchSettings) -> StorefrontRequest;

    /// Extract products, in endpoint order
    fn parse(&self, response: &StorefrontResponse) -> Result<Vec<ProductSummary>, FetchError>;
}

/// Get the backend for a configured response format
pub fn get_backend(format: ResponseFormat) -> Box<dyn SuggestBackend> {
    match format {
        ResponseFormat::Json => Box::new(JsonBackend),
        ResponseFormat::Html => Box::new(HtmlBackend),
    }
}

fn base_request(url: &str, query: &SearchQuery, settings: &SearchSettings) -> StorefrontRequest {
    StorefrontRequest::get(url)
        .param("q", query.as_str())
        .param("resources[type]", &settings.resource_type)
        .param("resources[limit]", settings.result_limit.to_string())
}

/// `/search/suggest.json` resource list
pub struct JsonBackend;

#[derive(Deserialize)]
struct SuggestPayload {
    resources: Resources,
}

#[derive(Deserialize)]
struct Resources {
    results: ResourceResults,
}

#[derive(Deserialize)]
struct ResourceResults {
    #[serde(default)]
    products: Vec<RawProduct>,
}

#[derive(Deserialize)]
struct RawProduct {
    title: String,
    url: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    featured_image: Option<FeaturedImage>,
    #[serde(default)]
    price: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct FeaturedImage {
    #[serde(default)]
    url: Option<String>,
}

impl RawProduct {
    fn into_summary(self) -> ProductSummary {
        // price comes back as "19.00" from some themes and 19.0 from others
        let price = match self.price {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let image = self
            .image
            .filter(|s| !s.is_empty())
            .or_else(|| self.featured_image.and_then(|f| f.url));

        ProductSummary {
            title: self.title,
            url: self.url,
            image,
            price,
        }
    }
}

impl SuggestBackend for JsonBackend {
    fn name(&self) -> &str {
        "json"
    }

    fn request(&self, url: &str, query: &SearchQuery, settings: &SearchSettings) -> StorefrontRequest {
        base_request(url, query, settings).header("Accept", accept_json())
    }

    fn parse(&self, response: &StorefrontResponse) -> Result<Vec<ProductSummary>, FetchError> {
        let payload: SuggestPayload = response.json()?;
        Ok(payload
            .resources
            .results
            .products
            .into_iter()
            .map(RawProduct::into_summary)
            .collect())
    }
}

/// Section-rendered HTML fragment
pub struct HtmlBackend;

static ITEM: Lazy<Selector> = Lazy::new(|| selector("[data-predictive-search-item]"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("[data-title], .predictive-search__item-heading"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector("img[src]"));
static PRICE: Lazy<Selector> = Lazy::new(|| selector(".price"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

impl HtmlBackend {
    fn parse_item(item: ElementRef<'_>) -> Option<ProductSummary> {
        let link = if LINK.matches(&item) {
            item
        } else {
            item.select(&LINK).next()?
        };
        let url = link.value().attr("href")?.to_string();

        let title = item
            .select(&TITLE)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| text_of(link));
        if title.is_empty() {
            return None;
        }

        let image = item
            .select(&IMAGE)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(String::from);
        let price = item.select(&PRICE).next().map(text_of).filter(|p| !p.is_empty());

        Some(ProductSummary {
            title,
            url,
            image,
            price,
        })
    }
}

impl SuggestBackend for HtmlBackend {
    fn name(&self) -> &str {
        "html"
    }

    fn request(&self, url: &str, query: &SearchQuery, settings: &SearchSettings) -> StorefrontRequest {
        base_request(url, query, settings)
            .param("section_id", &settings.section_id)
            .header("Accept", accept_html())
    }

    fn parse(&self, response: &StorefrontResponse) -> Result<Vec<ProductSummary>, FetchError> {
        let document = Html::parse_fragment(&response.text);
        let items: Vec<_> = document.select(&ITEM).collect();

        // a fragment with no list at all is not a predictive search section
        if items.is_empty() && !response.text.contains("predictive-search") {
            return Err(FetchError::MalformedPayload(
                "no predictive search section in fragment".to_string(),
            ));
        }

        Ok(items.into_iter().filter_map(Self::parse_item).collect())
    }
}
