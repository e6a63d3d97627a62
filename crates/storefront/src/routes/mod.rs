//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Storefront page (first view fetches products)
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products?q=            - Search; returns the product grid fragment
//!
//! # Cart (HTMX fragments)
//! POST /cart/add               - Add one unit (returns cart_panel fragment)
//! POST /cart/quantity          - Set quantity, clamped to 1 (returns cart_panel fragment)
//! POST /message/dismiss        - Hide the status message (returns cart_panel fragment)
//!
//! # Checkout (HTMX fragments)
//! POST /checkout/open          - Open the delivery modal
//! POST /checkout/cancel        - Close the modal, discarding the draft
//! POST /checkout               - Place a cash-on-delivery order
//!                                (returns modal + out-of-band cart_panel)
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/quantity", post(cart::quantity))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::submit))
        .route("/open", post(checkout::open))
        .route("/cancel", post(checkout::cancel))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        .route("/health", get(health))
        // Product search
        .route("/products", get(products::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
        .route("/message/dismiss", post(cart::dismiss_message))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
