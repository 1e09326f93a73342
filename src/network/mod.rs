//! HTTP networking module
//!
//! Provides the [`Transport`] seam every flow talks through, the reqwest-backed
//! [`HttpClient`], and [`fetch`], the shared "request with timeout, classify
//! the failure" helper.

mod client;
mod headers;
mod request;

pub use client::HttpClient;
pub use headers::{accept_html, accept_json, user_agent, REQUESTED_WITH};
pub use request::{HttpMethod, StorefrontRequest, StorefrontResponse};

use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

/// Anything that can carry a storefront request to the storefront
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: StorefrontRequest) -> Result<StorefrontResponse, FetchError>;
}

/// Send a request bounded by `limit` and turn non-2xx answers into errors
pub async fn fetch(
    transport: &dyn Transport,
    request: StorefrontRequest,
    limit: Duration,
) -> Result<StorefrontResponse, FetchError> {
    let response = match timeout(limit, transport.send(request)).await {
        Ok(result) => result?,
        Err(_) => return Err(FetchError::Timeout(limit)),
    };

    if !response.is_success() {
        return Err(FetchError::BadResponse {
            status: response.status,
            message: response.error_message(),
        });
    }

    Ok(response)
}

/// Resolve a configured route against the storefront origin
pub fn resolve_url(base: &str, route: &str) -> Result<String, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: route.to_string(),
        reason,
    };
    let base = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    let url = base.join(route).map_err(|e| invalid(e.to_string()))?;
    Ok(url.to_string())
}
