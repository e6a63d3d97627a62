//! Per-visitor storefront state.
//!
//! [`StorefrontState`] owns everything the page renders: the product list,
//! the search query, the cart, the checkout modal flag and the status
//! message. Fields are private; the page changes only through the
//! transitions below.
//!
//! Network calls are split into `begin_*` and `finish_*` halves so the caller
//! can release its lock on the state while the request is in flight:
//!
//! ```rust
//! use souq_levant_core::{OrderOutcome, Price, Product, ProductId, StorefrontState};
//!
//! let mut state = StorefrontState::new();
//! let ticket = state.begin_product_fetch("zaatar");
//! // ... GET /api/products?q=zaatar ...
//! let listing = vec![Product {
//!     id: ProductId::new(1),
//!     title: "Zaatar".into(),
//!     description: String::new(),
//!     price: Price::new(1000),
//!     image_url: None,
//! }];
//! assert!(state.finish_product_fetch(ticket, Ok(listing)));
//!
//! state.add_listed_product(ProductId::new(1));
//! assert!(state.open_checkout());
//! let order = state.begin_checkout(Default::default())?;
//! // ... POST /api/orders with `order` ...
//! state.finish_checkout(OrderOutcome::Placed);
//! assert!(state.cart().is_empty());
//! # Ok::<(), souq_levant_core::CheckoutError>(())
//! ```

use thiserror::Error;

use crate::cart::Cart;
use crate::request::{FetchTicket, RequestState, RequestTracker};
use crate::types::{DeliveryInfo, OrderRequest, PaymentMethod, Product, ProductId};

/// Fixed status messages shown after a checkout attempt.
pub mod messages {
    /// The backend accepted the order.
    pub const ORDER_PLACED: &str = "تم تأكيد طلبك! Your order is placed.";

    /// The backend rejected the order without a usable `detail`.
    pub const ORDER_FAILED: &str = "صار في مشكلة!";

    /// The order request never completed.
    pub const NETWORK_ERROR: &str = "Network error";
}

/// How an order submission resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// The backend answered with a success status.
    Placed,
    /// The backend answered with an error status, optionally explaining why.
    Rejected { detail: Option<String> },
    /// The request could not be completed.
    Unreachable,
}

/// Checkout could not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// Everything one visitor's page shows.
#[derive(Debug, Clone, Default)]
pub struct StorefrontState {
    products: Vec<Product>,
    product_fetch: RequestState,
    product_requests: RequestTracker,
    query: String,
    cart: Cart,
    checkout_open: bool,
    order: RequestState,
    message: Option<String>,
}

impl StorefrontState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Products from the last successful fetch.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn product_fetch(&self) -> &RequestState {
        &self.product_fetch
    }

    /// The search text as last submitted (may be empty).
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn is_checkout_open(&self) -> bool {
        self.checkout_open
    }

    #[must_use]
    pub const fn order(&self) -> &RequestState {
        &self.order
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Find a product in the current listing.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    // =========================================================================
    // Product listing
    // =========================================================================

    /// Start a product fetch for `query`.
    ///
    /// The query is trimmed and stored; an empty query means "no filter".
    pub fn begin_product_fetch(&mut self, query: &str) -> FetchTicket {
        query.trim().clone_into(&mut self.query);
        self.product_fetch = RequestState::Loading;
        self.product_requests.dispatch()
    }

    /// The query to send to the backend, `None` when the search box is empty.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        Some(self.query.as_str()).filter(|q| !q.is_empty())
    }

    /// Apply a product fetch result.
    ///
    /// Results for any ticket other than the latest dispatched are dropped and
    /// `false` is returned. A successful result replaces the list wholesale;
    /// a failure keeps the previous list.
    pub fn finish_product_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Product>, String>,
    ) -> bool {
        if !self.product_requests.is_current(ticket) {
            return false;
        }

        match result {
            Ok(products) => {
                self.products = products;
                self.product_fetch = RequestState::Succeeded(());
            }
            Err(error) => self.product_fetch = RequestState::Failed(error),
        }
        true
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of `product`. Returns the line's new quantity.
    pub fn add_to_cart(&mut self, product: &Product) -> u32 {
        self.cart.add(product)
    }

    /// Add one unit of a product from the current listing.
    ///
    /// Returns `None` if the product is not listed.
    pub fn add_listed_product(&mut self, id: ProductId) -> Option<u32> {
        let product = self.products.iter().find(|p| p.id == id)?;
        Some(self.cart.add(product))
    }

    /// Set a line's quantity to `max(1, quantity)`; no-op for absent products.
    pub fn change_quantity(&mut self, id: ProductId, quantity: i64) -> Option<u32> {
        self.cart.set_quantity(id, quantity)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Open the checkout modal. Refused while the cart is empty.
    ///
    /// Opening starts a fresh order attempt, so an earlier failure is not
    /// shown in the new modal.
    pub fn open_checkout(&mut self) -> bool {
        if self.cart.is_empty() {
            return false;
        }
        self.checkout_open = true;
        self.order = RequestState::Idle;
        true
    }

    /// Close the checkout modal, discarding nothing else.
    pub const fn cancel_checkout(&mut self) {
        self.checkout_open = false;
    }

    /// Snapshot the cart into an order for `customer`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to order.
    pub fn begin_checkout(&mut self, customer: DeliveryInfo) -> Result<OrderRequest, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.order = RequestState::Loading;
        Ok(OrderRequest {
            items: self.cart.lines().to_vec(),
            customer,
            payment_method: PaymentMethod::CashOnDelivery,
        })
    }

    /// Apply the result of an order submission.
    ///
    /// Success clears the cart and closes the modal. Failures only set the
    /// status message so the visitor can retry.
    pub fn finish_checkout(&mut self, outcome: OrderOutcome) {
        match outcome {
            OrderOutcome::Placed => {
                self.message = Some(messages::ORDER_PLACED.to_string());
                self.cart.clear();
                self.checkout_open = false;
                self.order = RequestState::Succeeded(());
            }
            OrderOutcome::Rejected { detail } => {
                let message = detail
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| messages::ORDER_FAILED.to_string());
                self.order = RequestState::Failed(message.clone());
                self.message = Some(message);
            }
            OrderOutcome::Unreachable => {
                self.message = Some(messages::NETWORK_ERROR.to_string());
                self.order = RequestState::Failed(messages::NETWORK_ERROR.to_string());
            }
        }
    }

    /// Hide the status message.
    pub fn clear_message(&mut self) {
        self.message = None;
    }
}
