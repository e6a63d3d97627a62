//! Checkout route handlers.
//!
//! The checkout modal holds the delivery draft in its form inputs. Only a
//! confirmed submission reaches the coordinator; cancelling re-renders the
//! modal closed and blank.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, response::IntoResponse};
use souq_levant_core::{DeliveryField, DeliveryInfo, StorefrontState};
use tracing::instrument;

use crate::coordinator::Coordinator;
use crate::error::{AppError, Result};
use crate::routes::cart::CartView;

/// One delivery form input.
#[derive(Clone)]
pub struct DeliveryFieldView {
    pub name: &'static str,
    pub placeholder: &'static str,
    pub multiline: bool,
    pub value: String,
}

impl DeliveryFieldView {
    fn new(field: DeliveryField, draft: &DeliveryInfo) -> Self {
        Self {
            name: field.key(),
            placeholder: field.placeholder(),
            multiline: field.is_multiline(),
            value: draft.value(field).to_string(),
        }
    }
}

/// Checkout modal display data for templates.
#[derive(Clone)]
pub struct CheckoutModalView {
    pub open: bool,
    pub fields: Vec<DeliveryFieldView>,
    /// Why the last order attempt from this modal failed.
    pub error: Option<String>,
}

impl CheckoutModalView {
    /// A modal with empty inputs and no error.
    #[must_use]
    pub fn new(open: bool) -> Self {
        Self::with_draft(open, None, &DeliveryInfo::default())
    }

    /// A modal whose inputs are pre-filled from `draft`.
    #[must_use]
    pub fn with_draft(open: bool, error: Option<String>, draft: &DeliveryInfo) -> Self {
        Self {
            open,
            fields: DeliveryField::ALL
                .into_iter()
                .map(|field| DeliveryFieldView::new(field, draft))
                .collect(),
            error,
        }
    }

    /// The modal as the state has it, keeping `draft` in the inputs.
    #[must_use]
    pub fn from_state(state: &StorefrontState, draft: &DeliveryInfo) -> Self {
        let open = state.is_checkout_open();
        let error = state
            .order()
            .error()
            .filter(|_| open)
            .map(str::to_owned);
        Self::with_draft(open, error, draft)
    }
}

impl From<&StorefrontState> for CheckoutModalView {
    fn from(state: &StorefrontState) -> Self {
        Self::from_state(state, &DeliveryInfo::default())
    }
}

/// Checkout modal fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_modal.html")]
pub struct CheckoutModalTemplate {
    pub modal: CheckoutModalView,
}

/// Checkout result: the modal plus an out-of-band cart panel carrying the
/// status message.
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_result.html")]
pub struct CheckoutResultTemplate {
    pub modal: CheckoutModalView,
    pub cart: CartView,
    pub message: Option<String>,
    pub oob: bool,
}

impl CheckoutResultTemplate {
    /// A failed attempt leaves the modal open with `draft` still filled in.
    fn from_state(state: &StorefrontState, draft: &DeliveryInfo) -> Self {
        Self {
            modal: CheckoutModalView::from_state(state, draft),
            cart: CartView::from(state.cart()),
            message: state.message().map(str::to_owned),
            oob: true,
        }
    }
}

/// Open the checkout modal (HTMX). Stays closed while the cart is empty.
#[instrument(skip(coordinator), fields(visitor = %coordinator.visitor()))]
pub async fn open(coordinator: Coordinator) -> impl IntoResponse {
    if !coordinator.open_checkout().await {
        tracing::debug!("Checkout refused for empty cart");
    }
    CheckoutModalTemplate {
        modal: coordinator.view(|state| CheckoutModalView::from(state)).await,
    }
}

/// Close the checkout modal, discarding the draft (HTMX).
pub async fn cancel(coordinator: Coordinator) -> impl IntoResponse {
    coordinator.cancel_checkout().await;
    CheckoutModalTemplate {
        modal: CheckoutModalView::new(false),
    }
}

/// Submit the order for cash on delivery (HTMX).
#[instrument(skip(coordinator, info), fields(visitor = %coordinator.visitor()))]
pub async fn submit(
    coordinator: Coordinator,
    Form(info): Form<DeliveryInfo>,
) -> Result<impl IntoResponse> {
    let draft = info.clone();
    let outcome = coordinator.checkout(info).await.map_err(AppError::from)?;
    tracing::info!(?outcome, "Checkout finished");

    Ok(coordinator
        .view(|state| CheckoutResultTemplate::from_state(state, &draft))
        .await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use souq_levant_core::{OrderOutcome, Price, Product, ProductId, messages};

    use super::*;

    fn state_with_cart() -> StorefrontState {
        let mut state = StorefrontState::new();
        state.add_to_cart(&Product {
            id: ProductId::new(1),
            title: "Zaatar".to_string(),
            description: String::new(),
            price: Price::new(1000),
            image_url: None,
        });
        assert!(state.open_checkout());
        state
    }

    #[test]
    fn test_open_modal_lists_delivery_fields() {
        let html = CheckoutModalTemplate {
            modal: CheckoutModalView::new(true),
        }
        .render()
        .unwrap();

        assert!(html.contains("id=\"checkout-modal\""));
        for field in DeliveryField::ALL {
            assert!(html.contains(&format!("name=\"{}\"", field.key())));
        }
        assert!(html.contains("<textarea"));
    }

    #[test]
    fn test_closed_modal_has_no_form() {
        let html = CheckoutModalTemplate {
            modal: CheckoutModalView::new(false),
        }
        .render()
        .unwrap();

        assert!(html.contains("id=\"checkout-modal\""));
        assert!(!html.contains("<form"));
    }

    fn draft() -> DeliveryInfo {
        DeliveryInfo {
            name: "Rami".to_string(),
            city: "Damascus".to_string(),
            notes: "Ring twice".to_string(),
            ..DeliveryInfo::default()
        }
    }

    #[test]
    fn test_placed_result_closes_modal_and_swaps_cart() {
        let mut state = state_with_cart();
        state.begin_checkout(draft()).unwrap();
        state.finish_checkout(OrderOutcome::Placed);

        let html = CheckoutResultTemplate::from_state(&state, &draft())
            .render()
            .unwrap();
        assert!(!html.contains("<form"));
        assert!(!html.contains("Damascus"));
        assert!(html.contains("hx-swap-oob"));
        assert!(html.contains(messages::ORDER_PLACED));
    }

    #[test]
    fn test_rejected_result_keeps_modal_open_with_draft() {
        let mut state = state_with_cart();
        state.begin_checkout(draft()).unwrap();
        state.finish_checkout(OrderOutcome::Rejected {
            detail: Some("out of stock".to_string()),
        });

        let html = CheckoutResultTemplate::from_state(&state, &draft())
            .render()
            .unwrap();
        assert!(html.contains("<form"));
        assert!(html.contains("name=\"name\" value=\"Rami\""));
        assert!(html.contains("name=\"city\" value=\"Damascus\""));
        assert!(html.contains(">Ring twice</textarea>"));
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("out of stock"));
        assert!(html.contains("Zaatar"));
    }

    #[test]
    fn test_unreachable_result_keeps_draft() {
        let mut state = state_with_cart();
        state.begin_checkout(draft()).unwrap();
        state.finish_checkout(OrderOutcome::Unreachable);

        let modal = CheckoutModalView::from_state(&state, &draft());
        assert!(modal.open);
        assert_eq!(modal.error.as_deref(), Some(messages::NETWORK_ERROR));
        let values: Vec<_> = modal.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, ["Rami", "", "Damascus", "", "Ring twice"]);
    }

    #[test]
    fn test_reopened_modal_is_blank() {
        let mut state = state_with_cart();
        state.begin_checkout(draft()).unwrap();
        state.finish_checkout(OrderOutcome::Unreachable);
        state.cancel_checkout();
        assert!(state.open_checkout());

        let modal = CheckoutModalView::from(&state);
        assert!(modal.open);
        assert!(modal.error.is_none());
        assert!(modal.fields.iter().all(|f| f.value.is_empty()));
    }

    #[test]
    fn test_draft_values_are_escaped() {
        let info = DeliveryInfo {
            name: "\"><script>".to_string(),
            ..DeliveryInfo::default()
        };
        let html = CheckoutModalTemplate {
            modal: CheckoutModalView::with_draft(true, None, &info),
        }
        .render()
        .unwrap();
        assert!(!html.contains("<script>"));
    }
}
