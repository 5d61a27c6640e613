//! Remote product catalog client.
//!
//! # Architecture
//!
//! - One `GET` against the configured product-list endpoint returns the whole
//!   catalog as `{ "products": [...] }`
//! - The remote API is the source of truth - nothing is synced locally
//! - Optional in-memory caching via `moka`; by default every page load
//!   fetches a fresh catalog
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_shop_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let catalog = client.fetch_catalog().await?;
//! let categories = catalog.categories();
//! ```

mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("catalog endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body, for diagnostics.
        body: String,
    },

    /// The response body is not a product list.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
