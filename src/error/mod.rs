//! Error taxonomy and the error-reporting collaborator
//!
//! Every flow catches its own failures at the boundary and hands them to an
//! [`ErrorReporter`]. Nothing here is ever propagated to an event handler.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single storefront request or of the data feeding it
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The request was abandoned after the configured bound
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-2xx status
    #[error("bad response: HTTP {status}{}", .message.as_deref().map(|m| format!(" ({})", m)).unwrap_or_default())]
    BadResponse { status: u16, message: Option<String> },

    /// The body did not have the expected shape
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A product form could not be turned into a cart line
    #[error("invalid form: {0}")]
    InvalidForm(String),

    /// A configured route could not be resolved against the base URL
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// Network failures and timeouts both mean "no response arrived"
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFailure(_) | Self::Timeout(_))
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

/// Sink for diagnostics produced by the flows
pub trait ErrorReporter: Send + Sync {
    fn report(&self, message: &str, error: Option<&FetchError>);
}

impl<F> ErrorReporter for F
where
    F: Fn(&str, Option<&FetchError>) + Send + Sync,
{
    fn report(&self, message: &str, error: Option<&FetchError>) {
        self(message, error)
    }
}

/// Reporter that writes diagnostics to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, message: &str, error: Option<&FetchError>) {
        match error {
            Some(err) => tracing::error!("{}: {}", message, err),
            None => tracing::error!("{}", message),
        }
    }
}
