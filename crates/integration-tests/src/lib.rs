//! Integration tests for Pocket Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-shop-integration-tests
//! ```
//!
//! Each [`TestContext`] starts two servers on ephemeral ports: a stub catalog
//! serving [`fixture_products`], and the real storefront pointed at it. The
//! HTTP client keeps cookies, so the cart cookie round-trips like it would in
//! a browser.

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;

use axum::{Json, Router, http::StatusCode, routing::get};
use pocket_shop_storefront::{
    app,
    config::{CatalogConfig, StorefrontConfig},
    state::AppState,
};
use reqwest::Client;
use serde_json::{Value, json};
use url::Url;

/// Stub catalog path answering with the fixture products.
pub const PRODUCTS_PATH: &str = "/products";

/// Stub catalog path that always fails.
pub const BROKEN_PATH: &str = "/broken";

/// A running storefront plus a cookie-keeping client.
pub struct TestContext {
    pub client: Client,
    pub base_url: Url,
}

impl TestContext {
    /// Storefront backed by a working catalog.
    pub async fn new() -> Self {
        Self::with_catalog_path(PRODUCTS_PATH).await
    }

    /// Storefront whose catalog endpoint always answers 500.
    pub async fn with_broken_catalog() -> Self {
        Self::with_catalog_path(BROKEN_PATH).await
    }

    async fn with_catalog_path(path: &str) -> Self {
        let catalog_addr = spawn(catalog_stub()).await;
        let catalog_url = Url::parse(&format!("http://{catalog_addr}{path}"))
            .expect("stub catalog URL is valid");

        // Bind first so the base URL carries the real port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront");
        let addr = listener.local_addr().expect("listener has an address");
        let base_url =
            Url::parse(&format!("http://{addr}")).expect("storefront URL is valid");

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: base_url.clone(),
            catalog: CatalogConfig {
                url: catalog_url,
                ..CatalogConfig::default()
            },
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config).expect("Failed to build storefront state");

        tokio::spawn(async move {
            axum::serve(listener, app(state))
                .await
                .expect("storefront server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base_url.join(path).expect("valid storefront path")
    }

    /// GET a page, returning status and body.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed");
        read(response).await
    }

    /// POST a form, following the redirect, returning the final status and body.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed");
        read(response).await
    }

    /// Add one unit of a product from the catalog page.
    pub async fn add_to_cart(&self, product_id: &str) -> (StatusCode, String) {
        self.post_form(
            "/cart/add",
            &[("product_id", product_id), ("return_to", "/")],
        )
        .await
    }
}

async fn read(response: reqwest::Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.expect("Failed to read body");
    (status, body)
}

/// Serve `router` on an ephemeral port.
async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("stub server error");
    });

    addr
}

fn catalog_stub() -> Router {
    Router::new()
        .route(PRODUCTS_PATH, get(|| async { Json(fixture_products()) }))
        .route(
            BROKEN_PATH,
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
}

/// Twelve products: seven `beauty` (ids 1-7) then five `groceries` (ids 8-12).
#[must_use]
pub fn fixture_products() -> Value {
    let products: Vec<Value> = [
        (1, "Essence Mascara Lash Princess", 9.99, "beauty"),
        (2, "Eyeshadow Palette with Mirror", 19.99, "beauty"),
        (3, "Powder Canister", 14.99, "beauty"),
        (4, "Red Lipstick", 12.99, "beauty"),
        (5, "Red Nail Polish", 8.99, "beauty"),
        (6, "Calvin Klein CK One", 49.99, "beauty"),
        (7, "Chanel Coco Noir Eau De", 129.99, "beauty"),
        (8, "Apple", 1.99, "groceries"),
        (9, "Beef Steak", 12.99, "groceries"),
        (10, "Cat Food", 8.99, "groceries"),
        (11, "Chicken Meat", 9.99, "groceries"),
        (12, "Cooking Oil", 4.99, "groceries"),
    ]
    .into_iter()
    .map(|(id, title, price, category)| {
        json!({
            "id": id,
            "title": title,
            "price": price,
            "category": category,
            "thumbnail": format!("https://cdn.example.com/{id}/thumbnail.png"),
        })
    })
    .collect();

    json!({ "products": products, "total": 12, "skip": 0, "limit": 12 })
}
