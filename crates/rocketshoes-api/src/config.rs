//! # API Configuration

use std::time::Duration;

/// Default storefront API, matching the development JSON server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`HttpStorefrontApi`](crate::HttpStorefrontApi).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL; `/stock/{id}` and `/products/{id}` are appended.
    pub base_url: String,

    /// Timeout applied to every request.
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Creates a config for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig::new(DEFAULT_BASE_URL)
    }
}
