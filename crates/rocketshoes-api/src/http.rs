//! # HTTP Storefront Client
//!
//! reqwest implementation of both lookup ports against the storefront API.
//!
//! ## Endpoints
//! ```text
//! GET {base}/stock/{id}      → {"id": 1, "amount": 3}
//! GET {base}/products/{id}   → {"id": 1, "title": "Tênis", "price": 179.9, "image": "…"}
//!
//! 404, an empty body or a literal `null` all mean "no record".
//! ```
//!
//! Prices arrive as JSON decimals and are converted to centavos here, so no
//! floating point value ever reaches the cart.

use async_trait::async_trait;
use reqwest::StatusCode;
use rocketshoes_core::{Money, Product, ProductId, StockInfo, ValidationError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::service::{ProductCatalog, StockService};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StockPayload {
    id: u64,
    amount: i64,
}

impl TryFrom<StockPayload> for StockInfo {
    type Error = ApiError;

    fn try_from(payload: StockPayload) -> ApiResult<Self> {
        let amount = u32::try_from(payload.amount).map_err(|_| ValidationError::OutOfRange {
            field: "stock amount".to_string(),
            min: 0,
            max: i64::from(u32::MAX),
        })?;

        Ok(StockInfo {
            id: ProductId::new(payload.id),
            amount,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProductPayload {
    id: u64,
    #[serde(alias = "title")]
    name: String,
    price: serde_json::Number,
    #[serde(default)]
    image: String,
}

impl TryFrom<ProductPayload> for Product {
    type Error = ApiError;

    fn try_from(payload: ProductPayload) -> ApiResult<Self> {
        Ok(Product {
            id: ProductId::new(payload.id),
            name: payload.name,
            price: Money::round_decimal(&price_text(&payload.price))?,
            image: payload.image,
        })
    }
}

/// Decimal text of a JSON number, never in exponent form.
fn price_text(price: &serde_json::Number) -> String {
    match price.as_f64() {
        Some(value) if price.is_f64() => value.to_string(),
        _ => price.to_string(),
    }
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the Stock Service and the Product Catalog.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HttpStorefrontApi {
    inner: Arc<HttpStorefrontApiInner>,
}

struct HttpStorefrontApiInner {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStorefrontApi {
    /// Creates a client for the configured storefront.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] for a base URL that isn't absolute
    /// http(s), or [`ApiError::Http`] if the client fails to build.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|_| ApiError::InvalidUrl(config.base_url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpStorefrontApiInner { client, base_url }),
        })
    }

    /// The normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// GETs `path` and decodes the body, mapping "no record" answers to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Option<T>> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "No record");
            return Ok(None);
        }
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Unexpected status");
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let body = body.trim();
        if body.is_empty() || body == "null" {
            debug!(url = %url, "Empty answer");
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(body)?))
    }
}

impl std::fmt::Debug for HttpStorefrontApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStorefrontApi")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StockService for HttpStorefrontApi {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> ApiResult<Option<StockInfo>> {
        self.get_optional::<StockPayload>(&format!("/stock/{id}"))
            .await?
            .map(StockInfo::try_from)
            .transpose()
    }
}

#[async_trait]
impl ProductCatalog for HttpStorefrontApi {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> ApiResult<Option<Product>> {
        self.get_optional::<ProductPayload>(&format!("/products/{id}"))
            .await?
            .map(Product::try_from)
            .transpose()
    }
}
