//! Subcommand implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;

use pocket_shop_storefront::catalog::CatalogClient;
use pocket_shop_storefront::config::CatalogConfig;
use url::Url;

/// Build a catalog client from the environment, with an optional URL override.
///
/// # Errors
///
/// Returns an error if a catalog variable is malformed or the HTTP client
/// cannot be built.
pub fn catalog_client(url: Option<Url>) -> Result<CatalogClient, Box<dyn std::error::Error>> {
    let mut config = CatalogConfig::from_env()?;
    if let Some(url) = url {
        config.url = url;
    }

    tracing::debug!(url = %config.url, "Using catalog endpoint");
    Ok(CatalogClient::new(&config)?)
}
