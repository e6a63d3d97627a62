//! Product listing route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;
use souq_levant_core::{Product, StorefrontState};
use tracing::instrument;

use crate::coordinator::Coordinator;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
        }
    }
}

/// Product grid display data for templates.
#[derive(Clone)]
pub struct CatalogView {
    pub products: Vec<ProductCardView>,
    pub query: String,
    /// The last fetch failed; `products` still holds the previous listing.
    pub load_failed: bool,
}

impl From<&StorefrontState> for CatalogView {
    fn from(state: &StorefrontState) -> Self {
        Self {
            products: state.products().iter().map(ProductCardView::from).collect(),
            query: state.query().to_string(),
            load_failed: state.product_fetch().error().is_some(),
        }
    }
}

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub catalog: CatalogView,
}

/// Search products and return the grid (HTMX).
#[instrument(skip(coordinator), fields(visitor = %coordinator.visitor()))]
pub async fn index(coordinator: Coordinator, Query(params): Query<SearchParams>) -> impl IntoResponse {
    coordinator
        .fetch_products(params.q.as_deref().unwrap_or_default())
        .await;

    ProductGridTemplate {
        catalog: coordinator.view(|state| CatalogView::from(state)).await,
    }
}
