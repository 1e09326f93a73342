//! Predictive search data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trimmed, non-empty query text long enough to search for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Trim `raw` and accept it only if it has at least `min_len` characters.
    /// An empty query is never accepted, whatever `min_len` is.
    pub fn parse(raw: &str, min_len: usize) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().count() < min_len {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One product in the suggestion list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub title: String,
    /// Product page the item links to
    pub url: String,
    pub image: Option<String>,
    /// Price as the storefront formats it
    pub price: Option<String>,
}

impl ProductSummary {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            image: None,
            price: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }
}

/// Ordered product suggestions, capped at the configured limit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuggestionResult {
    items: Vec<ProductSummary>,
}

impl SuggestionResult {
    /// Keep at most `limit` items, in endpoint order
    pub fn new(mut items: Vec<ProductSummary>, limit: usize) -> Self {
        items.truncate(limit);
        Self { items }
    }

    pub fn items(&self) -> &[ProductSummary] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
