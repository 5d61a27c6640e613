//! Catalog API client implementation.
//!
//! Uses `reqwest` for HTTP and, when a TTL is configured, caches the parsed
//! catalog with `moka`.

use std::sync::Arc;

use moka::future::Cache;
use pocket_shop_core::{Catalog, Product, ProductId};
use tracing::{debug, instrument};
use url::Url;

use super::CatalogError;
use crate::config::CatalogConfig;

/// Maximum number of body characters kept for error diagnostics.
const ERROR_BODY_PREVIEW: usize = 200;

/// Client for the remote catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Option<Cache<String, Arc<Catalog>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pocket-shop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.url.clone(),
                cache,
            }),
        })
    }

    /// The product-list endpoint this client fetches from.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Fetch the full catalog.
    ///
    /// Served from cache when caching is enabled and the entry is fresh.
    /// Failures are never cached.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a body
    /// that is not a product list.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        let cache_key = self.inner.endpoint.to_string();

        if let Some(cache) = &self.inner.cache
            && let Some(catalog) = cache.get(&cache_key).await
        {
            debug!("Cache hit for catalog");
            return Ok(catalog);
        }

        let catalog = Arc::new(self.request().await?);
        debug!(products = catalog.len(), "Fetched catalog");

        if let Some(cache) = &self.inner.cache {
            cache.insert(cache_key, Arc::clone(&catalog)).await;
        }

        Ok(catalog)
    }

    /// Look up a single product in the catalog.
    ///
    /// Returns `Ok(None)` if the catalog has no product with that ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn find_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let catalog = self.fetch_catalog().await?;
        Ok(catalog.find(id).cloned())
    }

    async fn request(&self) -> Result<Catalog, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&body),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        Catalog::from_json(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(&body),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let body = "é".repeat(ERROR_BODY_PREVIEW + 10);
        assert_eq!(preview(&body).chars().count(), ERROR_BODY_PREVIEW);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_cache_only_with_ttl() {
        let uncached = CatalogClient::new(&CatalogConfig::default()).unwrap();
        assert!(uncached.inner.cache.is_none());

        let cached = CatalogClient::new(&CatalogConfig {
            cache_ttl: Duration::from_secs(60),
            ..CatalogConfig::default()
        })
        .unwrap();
        assert!(cached.inner.cache.is_some());
        assert_eq!(cached.endpoint().as_str(), "https://dummyjson.com/products");
    }
}
