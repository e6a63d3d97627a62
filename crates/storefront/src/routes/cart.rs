//! Cart route handlers.
//!
//! Cart operations use HTMX: every action swaps the whole cart panel,
//! which also carries the status message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, response::IntoResponse};
use serde::Deserialize;
use souq_levant_core::{Cart, CartLine, ProductId, StorefrontState};
use tracing::instrument;

use crate::coordinator::Coordinator;
use crate::error::Result;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: i64,
    pub title: String,
    pub price: String,
    pub subtotal: String,
    pub quantity: u32,
    /// Quantity sent by the minus button; never below 1.
    pub decrement_to: u32,
    pub increment_to: u32,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.as_i64(),
            title: line.title.clone(),
            price: line.price.to_string(),
            subtotal: line.subtotal().to_string(),
            quantity: line.quantity,
            decrement_to: line.quantity.saturating_sub(1).max(1),
            increment_to: line.quantity.saturating_add(1),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
    pub is_empty: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
            is_empty: cart.is_empty(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
}

/// Change quantity form data.
///
/// Signed so that a zero or negative value reaches the clamp instead of
/// failing to parse.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub product_id: i64,
    pub quantity: i64,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
    pub message: Option<String>,
    /// Render with `hx-swap-oob` so it can ride along another fragment.
    pub oob: bool,
}

impl CartPanelTemplate {
    #[must_use]
    pub fn from_state(state: &StorefrontState) -> Self {
        Self {
            cart: CartView::from(state.cart()),
            message: state.message().map(str::to_owned),
            oob: false,
        }
    }
}

/// Add one unit of a product to the cart (HTMX).
#[instrument(skip(coordinator), fields(visitor = %coordinator.visitor()))]
pub async fn add(
    coordinator: Coordinator,
    Form(form): Form<AddToCartForm>,
) -> Result<impl IntoResponse> {
    coordinator.add_to_cart(ProductId::new(form.product_id)).await?;
    Ok(coordinator.view(CartPanelTemplate::from_state).await)
}

/// Set a cart line's quantity (HTMX).
#[instrument(skip(coordinator), fields(visitor = %coordinator.visitor()))]
pub async fn quantity(coordinator: Coordinator, Form(form): Form<QuantityForm>) -> impl IntoResponse {
    if coordinator
        .change_quantity(ProductId::new(form.product_id), form.quantity)
        .await
        .is_none()
    {
        tracing::debug!(product_id = form.product_id, "Quantity change for product not in cart");
    }
    coordinator.view(CartPanelTemplate::from_state).await
}

/// Dismiss the status message (HTMX).
pub async fn dismiss_message(coordinator: Coordinator) -> impl IntoResponse {
    coordinator.dismiss_message().await;
    coordinator.view(CartPanelTemplate::from_state).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use souq_levant_core::{Price, Product};

    use super::*;

    fn product(id: i64, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            price: Price::new(price),
            image_url: None,
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        cart.add(&product(1, 1000));
        cart.add(&product(2, 500));

        let view = CartView::from(&cart);
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, Price::new(2500).to_string());
        assert!(!view.is_empty);
    }

    #[test]
    fn test_decrement_never_below_one() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));

        let view = CartView::from(&cart);
        let line = view.lines.first().unwrap();
        assert_eq!(line.decrement_to, 1);
        assert_eq!(line.increment_to, 2);
    }

    #[test]
    fn test_empty_panel_renders_placeholder() {
        let html = CartPanelTemplate::from_state(&StorefrontState::new())
            .render()
            .unwrap();
        assert!(html.contains("id=\"cart-panel\""));
        assert!(html.contains("فاضية حالياً"));
        assert!(html.contains("disabled"));
        assert!(!html.contains("hx-swap-oob"));
    }
}
