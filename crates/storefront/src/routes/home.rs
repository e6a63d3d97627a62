//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use souq_levant_core::CURRENCY_LABEL;
use tracing::instrument;

use crate::coordinator::Coordinator;
use crate::routes::cart::CartView;
use crate::routes::checkout::CheckoutModalView;
use crate::routes::products::{CatalogView, SearchParams};

/// Full storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub catalog: CatalogView,
    pub cart: CartView,
    pub message: Option<String>,
    pub modal: CheckoutModalView,
    pub oob: bool,
    pub currency: &'static str,
}

/// Display the storefront.
///
/// A `q` parameter runs a search (the no-JS path of the search form);
/// otherwise the product list is fetched once, on the visitor's first view.
#[instrument(skip(coordinator), fields(visitor = %coordinator.visitor()))]
pub async fn home(coordinator: Coordinator, Query(params): Query<SearchParams>) -> impl IntoResponse {
    match params.q.as_deref() {
        Some(q) => {
            coordinator.fetch_products(q).await;
        }
        None => coordinator.ensure_products().await,
    }

    coordinator
        .view(|state| IndexTemplate {
            catalog: CatalogView::from(state),
            cart: CartView::from(state.cart()),
            message: state.message().map(str::to_owned),
            modal: CheckoutModalView::from(state),
            oob: false,
            currency: CURRENCY_LABEL,
        })
        .await
}
