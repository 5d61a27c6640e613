//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page (?category=&q=&per_page=&page=)
//! GET  /health                 - Health check
//!
//! # Cart (form posts, 303 back to return_to)
//! POST /cart/add               - Add one unit of a product
//! POST /cart/remove            - Remove a product's line
//! POST /cart/quantity          - Increase or decrease a line's quantity
//!
//! # Checkout
//! GET  /checkout               - Checkout page
//! POST /checkout               - Confirm order
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/quantity", post(cart::change_quantity))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog page
        .route("/", get(catalog::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::submit))
}
