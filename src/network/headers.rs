//! Header values the storefront endpoints key their response format on

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("storefront-client/{}", crate::VERSION)
}

/// Accept header for JSON endpoints
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

/// Accept header for section-rendering endpoints
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,*/*;q=0.8"
}

/// Marks the request as AJAX so cart endpoints answer with a line item
/// instead of redirecting to the cart page
pub const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");
