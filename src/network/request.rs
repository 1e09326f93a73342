//! Request and response types exchanged with the storefront

use crate::error::FetchError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP request to be made against a storefront endpoint
#[derive(Debug, Clone)]
pub struct StorefrontRequest {
    /// Absolute URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters, in order
    pub params: Vec<(String, String)>,
    /// Form-encoded body fields, in order
    pub form: Option<Vec<(String, String)>>,
}

impl StorefrontRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: Vec::new(),
            form: None,
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            headers: HashMap::new(),
            params: Vec::new(),
            form: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add form data (sets content-type to form-urlencoded)
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.form = Some(fields);
        self
    }

    /// Look up a query parameter
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response from a storefront endpoint
#[derive(Debug, Clone)]
pub struct StorefrontResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
}

impl StorefrontResponse {
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            text: text.into(),
        }
    }

    /// Parse response as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Human-readable message from a Shopify error body, if there is one
    pub fn error_message(&self) -> Option<String> {
        let json: serde_json::Value = serde_json::from_str(&self.text).ok()?;
        ["description", "message"]
            .iter()
            .filter_map(|key| json.get(*key).and_then(|v| v.as_str()))
            .find(|s| !s.is_empty())
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_param_order() {
        let req = StorefrontRequest::get("https://shop.example.com/search/suggest.json")
            .param("q", "linen")
            .param("resources[type]", "product")
            .param("resources[limit]", "4");

        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.params[0].0, "q");
        assert_eq!(req.params[2].0, "resources[limit]");
        assert_eq!(req.param_value("resources[type]"), Some("product"));
        assert_eq!(req.param_value("missing"), None);
    }

    #[test]
    fn test_error_message() {
        let resp = StorefrontResponse::new(
            422,
            r#"{"status":422,"message":"Cart Error","description":"All 2 shirts are in your cart."}"#,
        );
        assert!(!resp.is_success());
        assert_eq!(
            resp.error_message().as_deref(),
            Some("All 2 shirts are in your cart.")
        );

        let resp = StorefrontResponse::new(500, "<html>oops</html>");
        assert_eq!(resp.error_message(), None);
    }
}
