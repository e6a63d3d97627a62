//! `reqwest`-based backend client.

use std::sync::Arc;

use souq_levant_core::{OrderRequest, Product};
use tracing::instrument;
use url::Url;

use super::{BackendError, error_detail};
use crate::config::BackendConfig;

/// Client for the products/orders API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    products_url: Url,
    orders_url: Url,
}

impl BackendClient {
    /// Create a client for the API rooted at `config.base_url`.
    ///
    /// Paths are appended to the base URL, so a base with a path prefix
    /// (`https://host/shop`) yields `https://host/shop/api/products`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Url` if the endpoint URLs cannot be formed.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base = config.base_url.as_str().trim_end_matches('/');

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                products_url: Url::parse(&format!("{base}/api/products"))?,
                orders_url: Url::parse(&format!("{base}/api/orders"))?,
            }),
        })
    }

    /// Fetch the product list, optionally filtered by a search query.
    ///
    /// The `q` parameter is only sent for a non-empty query.
    ///
    /// # Errors
    ///
    /// Returns `Http` if the request fails in transit, `Rejected` on a
    /// non-success status and `Parse` if the body is not a product array.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: Option<&str>) -> Result<Vec<Product>, BackendError> {
        let mut url = self.inner.products_url.clone();
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().append_pair("q", q);
        }

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Product listing returned non-success status"
            );
            return Err(BackendError::Rejected {
                status,
                detail: error_detail(&body),
            });
        }

        let products: Vec<Product> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse product listing"
            );
            BackendError::Parse(e)
        })?;

        tracing::debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Submit an order.
    ///
    /// A success status is all that matters; the response body is not read
    /// into anything.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` (with the backend's `detail`, when it sent a string
    /// one) on a non-success status and `Http` if the request could not be
    /// completed.
    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.inner.orders_url.clone())
            .json(order)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(status = %status, "Order accepted");
            return Ok(());
        }

        let body = response.text().await?;
        let detail = error_detail(&body);
        tracing::warn!(
            status = %status,
            detail = detail.as_deref().unwrap_or(""),
            "Order rejected by backend"
        );

        Err(BackendError::Rejected { status, detail })
    }
}
