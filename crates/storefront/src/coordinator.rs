//! Root coordinator: wires page intents to state transitions and backend calls.
//!
//! A [`Coordinator`] is extracted per request. It binds the visitor's
//! [`SharedState`] to the backend client and runs every network call in two
//! halves: `begin_*` under the state lock, the await with the lock released,
//! then `finish_*` under the lock again. Concurrent requests from the same
//! visitor therefore interleave safely, and a slow product response that lost
//! the race to a newer search is dropped by the ticket check.

use axum::{extract::FromRequestParts, http::request::Parts};
use souq_levant_core::{
    CheckoutError, DeliveryInfo, OrderOutcome, ProductId, StorefrontState,
};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::backend::BackendClient;
use crate::error::{AppError, add_breadcrumb};
use crate::middleware::visitor_id;
use crate::state::AppState;
use crate::visitors::SharedState;

/// Per-request handle on one visitor's storefront.
pub struct Coordinator {
    visitor: Uuid,
    backend: BackendClient,
    state: SharedState,
}

impl Coordinator {
    /// Bind a visitor's state to the backend client.
    #[must_use]
    pub const fn new(visitor: Uuid, backend: BackendClient, state: SharedState) -> Self {
        Self {
            visitor,
            backend,
            state,
        }
    }

    #[must_use]
    pub const fn visitor(&self) -> Uuid {
        self.visitor
    }

    /// Read the current state, e.g. to build a view.
    pub async fn view<T>(&self, f: impl FnOnce(&StorefrontState) -> T) -> T {
        f(&*self.state.lock().await)
    }

    /// Fetch products for `query` and replace the listing.
    ///
    /// Returns whether the result was applied; `false` means a newer fetch
    /// was dispatched meanwhile. Failures are recorded in the state and
    /// logged, never returned.
    #[instrument(skip(self), fields(visitor = %self.visitor))]
    pub async fn fetch_products(&self, query: &str) -> bool {
        let (ticket, search) = {
            let mut state = self.state.lock().await;
            let ticket = state.begin_product_fetch(query);
            (ticket, state.search_query().map(str::to_owned))
        };

        let result = self
            .backend
            .list_products(search.as_deref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Product fetch failed");
                e.to_string()
            });

        let applied = self.state.lock().await.finish_product_fetch(ticket, result);
        if !applied {
            tracing::debug!(
                sequence = ticket.sequence(),
                "Discarded out-of-order product response"
            );
        }
        applied
    }

    /// Fetch products on a page view unless a listing is already loaded.
    ///
    /// A visitor whose last fetch failed gets a fresh attempt here; there is
    /// no retry beyond that.
    pub async fn ensure_products(&self) {
        let needed = {
            let state = self.state.lock().await;
            let fetch = state.product_fetch();
            fetch.is_idle() || fetch.error().is_some()
        };
        if needed {
            let query = self.state.lock().await.query().to_owned();
            self.fetch_products(&query).await;
        }
    }

    /// Add one unit of a listed product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is not in the visitor's
    /// current listing.
    pub async fn add_to_cart(&self, product_id: ProductId) -> Result<u32, AppError> {
        let quantity = self
            .state
            .lock()
            .await
            .add_listed_product(product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

        tracing::debug!(visitor = %self.visitor, %product_id, quantity, "Added to cart");
        Ok(quantity)
    }

    /// Set a cart line's quantity (floor-clamped to 1). Absent products are
    /// ignored.
    pub async fn change_quantity(&self, product_id: ProductId, quantity: i64) -> Option<u32> {
        self.state
            .lock()
            .await
            .change_quantity(product_id, quantity)
    }

    /// Open the checkout modal; returns `false` while the cart is empty.
    pub async fn open_checkout(&self) -> bool {
        self.state.lock().await.open_checkout()
    }

    /// Close the checkout modal.
    pub async fn cancel_checkout(&self) {
        self.state.lock().await.cancel_checkout();
    }

    /// Hide the status message.
    pub async fn dismiss_message(&self) {
        self.state.lock().await.clear_message();
    }

    /// Submit the cart as a cash-on-delivery order.
    ///
    /// The outcome is applied to the state (status message, cart, modal) and
    /// also returned. No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` without contacting the backend if
    /// there is nothing to order.
    #[instrument(skip(self, customer), fields(visitor = %self.visitor))]
    pub async fn checkout(&self, customer: DeliveryInfo) -> Result<OrderOutcome, CheckoutError> {
        let order = self.state.lock().await.begin_checkout(customer)?;
        let lines = order.items.len().to_string();

        let outcome = match self.backend.place_order(&order).await {
            Ok(()) => OrderOutcome::Placed,
            Err(e) if e.is_network() => {
                tracing::error!(error = %e, "Order submission failed");
                OrderOutcome::Unreachable
            }
            Err(e) => OrderOutcome::Rejected {
                detail: e.detail().map(str::to_owned),
            },
        };

        let label = match &outcome {
            OrderOutcome::Placed => "Order placed",
            OrderOutcome::Rejected { .. } => "Order rejected",
            OrderOutcome::Unreachable => "Order not sent",
        };
        add_breadcrumb("checkout", label, Some(&[("lines", lines.as_str())]));

        self.state.lock().await.finish_checkout(outcome.clone());
        Ok(outcome)
    }
}

impl FromRequestParts<AppState> for Coordinator {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let visitor = visitor_id(&session).await?;
        let shared = state.visitors().get_or_create(visitor).await;

        Ok(Self::new(visitor, state.backend().clone(), shared))
    }
}
