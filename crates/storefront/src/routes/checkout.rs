//! Checkout route handlers.
//!
//! There is no payment step. A valid form confirms the order, clears the
//! cart cookie, and shows the confirmation page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Response},
};
use pocket_shop_core::{CheckoutError, CheckoutField, CheckoutForm, OrderConfirmation};
use tracing::instrument;

use super::cart::{CartLineView, CartView};
use crate::cart_store::{self, StoredCart};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    /// Values as entered, echoed back when the form is rejected.
    pub form: CheckoutForm,
    pub name_error: Option<String>,
    pub email_error: Option<String>,
    pub address_error: Option<String>,
}

impl CheckoutTemplate {
    /// A blank form over `cart`.
    #[must_use]
    pub fn new(cart: CartView) -> Self {
        Self {
            cart,
            form: CheckoutForm::default(),
            name_error: None,
            email_error: None,
            address_error: None,
        }
    }

    /// The form re-rendered with the entered values and per-field messages.
    #[must_use]
    pub fn rejected(cart: CartView, form: CheckoutForm, error: &CheckoutError) -> Self {
        let message = |field| error.message_for(field).map(ToString::to_string);

        Self {
            cart,
            form,
            name_error: message(CheckoutField::Name),
            email_error: message(CheckoutField::Email),
            address_error: message(CheckoutField::Address),
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmed.html")]
pub struct ConfirmationTemplate {
    pub reference: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub confirmed_at: String,
}

impl From<&OrderConfirmation> for ConfirmationTemplate {
    fn from(order: &OrderConfirmation) -> Self {
        Self {
            reference: order.reference.to_string(),
            name: order.name.clone(),
            email: order.email.to_string(),
            address: order.address.clone(),
            lines: order.lines.iter().map(CartLineView::from).collect(),
            total: order.total.to_string(),
            confirmed_at: order.confirmed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// Display the checkout page.
#[instrument(skip(cart))]
pub async fn show(StoredCart(cart): StoredCart) -> CheckoutTemplate {
    CheckoutTemplate::new(CartView::from(&cart))
}

/// Submit the checkout form.
#[instrument(skip(state, cart, form))]
pub async fn submit(
    State(state): State<AppState>,
    StoredCart(cart): StoredCart,
    Form(form): Form<CheckoutForm>,
) -> Response {
    match form.confirm(&cart) {
        Ok(order) => {
            tracing::info!(
                reference = %order.reference,
                lines = order.lines.len(),
                total = %order.total,
                "Order confirmed"
            );
            add_breadcrumb("checkout", "Order confirmed", None);

            (
                AppendHeaders([(SET_COOKIE, cart_store::clear_cookie(state.secure_cookies()))]),
                ConfirmationTemplate::from(&order),
            )
                .into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Checkout form rejected");
            (
                StatusCode::BAD_REQUEST,
                CheckoutTemplate::rejected(CartView::from(&cart), form, &e),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocket_shop_core::{Cart, Product, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&Product {
            id: ProductId::new(3),
            title: "Powder Canister".to_string(),
            price: Decimal::new(1499, 2),
            category: "beauty".to_string(),
            thumbnail: String::new(),
        });
        cart
    }

    #[test]
    fn test_rejected_form_keeps_values_and_messages() {
        let form = CheckoutForm {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            address: "   ".to_string(),
        };
        let error = form.confirm(&cart()).unwrap_err();
        let page = CheckoutTemplate::rejected(CartView::from(&cart()), form, &error);

        assert!(page.name_error.is_none());
        assert!(page.email_error.is_some());
        assert_eq!(page.address_error.as_deref(), Some("address is required"));
        assert_eq!(page.form.name, "Ada");

        let html = page.render().unwrap();
        assert!(html.contains("not-an-email"));
        assert!(html.contains("address is required"));
    }

    #[test]
    fn test_confirmation_echoes_fields() {
        let form = CheckoutForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 St James's Square".to_string(),
        };
        let order = form.confirm(&cart()).unwrap();
        let page = ConfirmationTemplate::from(&order);

        assert_eq!(page.total, "$14.99");
        assert_eq!(page.lines.len(), 1);

        let html = page.render().unwrap();
        assert!(html.contains("Order Confirmed!"));
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("ada@example.com"));
        assert!(html.contains(&order.reference.to_string()));
    }

    #[test]
    fn test_checkout_page_lists_cart() {
        let html = CheckoutTemplate::new(CartView::from(&cart())).render().unwrap();
        assert!(html.contains("Powder Canister"));
        assert!(html.contains("$14.99"));
    }
}
