//! HTTP client for making requests to the storefront

use super::headers::{accept_json, user_agent};
use super::request::{HttpMethod, StorefrontRequest, StorefrontResponse};
use super::Transport;
use crate::config::OutgoingSettings;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client wrapper with storefront-specific configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> anyhow::Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .timeout(settings.timeout())
            .pool_max_idle_per_host(settings.pool_maxsize)
            // the cart lives in a session cookie shared by add and summary calls
            .cookie_store(true)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: settings.timeout(),
            user_agent: user_agent(),
            extra_headers: settings.extra_headers.clone(),
        })
    }

    /// Execute a storefront request with custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: StorefrontRequest,
        timeout: Duration,
    ) -> Result<StorefrontResponse, FetchError> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .timeout(timeout)
            .headers(self.header_map(&request.headers));

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(ref fields) = request.form {
            req_builder = req_builder.form(fields);
        }

        debug!("{:?} {}", request.method, request.url);

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(timeout)
            } else {
                FetchError::from(e)
            }
        })?;

        Self::parse_response(response).await
    }

    /// Defaults, then configured extra headers, then the request's own.
    /// Later layers replace earlier values for the same name.
    fn header_map(&self, request_headers: &HashMap<String, String>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(agent) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, agent);
        }
        headers.insert(ACCEPT, HeaderValue::from_static(accept_json()));

        for (key, value) in self.extra_headers.iter().chain(request_headers.iter()) {
            match (HeaderName::from_bytes(key.as_bytes()), HeaderValue::from_str(value)) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("skipping invalid header '{}'", key),
            }
        }

        headers
    }

    /// Parse response into StorefrontResponse
    async fn parse_response(response: Response) -> Result<StorefrontResponse, FetchError> {
        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let text = response.text().await?;

        Ok(StorefrontResponse {
            status,
            headers,
            text,
        })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: StorefrontRequest) -> Result<StorefrontResponse, FetchError> {
        self.execute_with_timeout(request, self.default_timeout).await
    }
}
