//! Cart route handlers.
//!
//! Every mutation reads the cart from its cookie, applies one change,
//! rewrites the cookie, and redirects back to the page the form came from.

use axum::{
    Form,
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use pocket_shop_core::{Cart, CartLine, ProductId, QuantityChange};
use serde::Deserialize;
use tracing::instrument;

use crate::cart_store::{self, StoredCart};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
    /// The decrease button is disabled at quantity 1.
    pub can_decrease: bool,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    /// Number of distinct lines.
    pub line_count: usize,
    /// Sum of quantities.
    pub item_count: u32,
}

impl CartView {
    /// Whether there is nothing in the cart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            title: line.title.clone(),
            price: line.unit_price().to_string(),
            quantity: line.quantity(),
            line_total: line.line_total().to_string(),
            can_decrease: line.quantity() > 1,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total().to_string(),
            line_count: cart.len(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add or remove form data.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub product_id: ProductId,
    pub return_to: Option<String>,
}

/// Quantity change form data.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub product_id: ProductId,
    pub direction: QuantityChange,
    pub return_to: Option<String>,
}

/// Restrict redirects to local paths.
///
/// Anything that could leave the site (absolute URLs, scheme-relative `//`
/// paths, backslash tricks) falls back to the catalog page.
#[must_use]
pub fn safe_return_path(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/",
    }
}

/// Write the cart cookie and redirect back.
fn persist(state: &AppState, cart: &Cart, return_to: Option<&str>) -> Result<Response> {
    let cookie = cart_store::save_cookie(cart, state.secure_cookies())?;
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Redirect::to(safe_return_path(return_to)),
    )
        .into_response())
}

// =============================================================================
// Handlers
// =============================================================================

/// Add one unit of a product to the cart.
///
/// Product details are copied from the catalog, so unknown IDs are rejected.
#[instrument(skip(state, cart), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    StoredCart(mut cart): StoredCart,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .find_product(form.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let quantity = cart.add(&product);
    tracing::info!(quantity, "Added product to cart");
    add_breadcrumb(
        "cart",
        "Added product",
        Some(&[("product_id", &product.id.to_string())]),
    );

    persist(&state, &cart, form.return_to.as_deref())
}

/// Remove a product's line from the cart.
///
/// Removing a product that is not in the cart leaves the cart as it was.
#[instrument(skip(state, cart), fields(product_id = %form.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    StoredCart(mut cart): StoredCart,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    match cart.remove(form.product_id) {
        Ok(line) => tracing::info!(quantity = line.quantity(), "Removed line from cart"),
        Err(e) => tracing::debug!(error = %e, "Nothing to remove"),
    }

    persist(&state, &cart, form.return_to.as_deref())
}

/// Increase or decrease a line's quantity (never below 1).
#[instrument(skip(state, cart), fields(product_id = %form.product_id, direction = ?form.direction))]
pub async fn change_quantity(
    State(state): State<AppState>,
    StoredCart(mut cart): StoredCart,
    Form(form): Form<QuantityForm>,
) -> Result<Response> {
    let quantity = cart.change_quantity(form.product_id, form.direction)?;
    tracing::info!(quantity, "Changed cart quantity");

    persist(&state, &cart, form.return_to.as_deref())
}
