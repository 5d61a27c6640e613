//! Browse the remote catalog.

use std::fmt::Write as _;

use pocket_shop_core::{Catalog, ListingPage, ListingQuery};
use pocket_shop_storefront::catalog::CatalogClient;

/// Print one page of the filtered catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn list(
    client: &CatalogClient,
    query: &ListingQuery,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = client.fetch_catalog().await?;
    let listing = query.apply(&catalog.products);

    tracing::info!(
        category = %query.category,
        search = %query.search,
        matches = listing.total_matches,
        "Filtered catalog"
    );

    print!("{}", render_listing(&listing));
    Ok(())
}

/// Print the catalog's categories.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn categories(client: &CatalogClient) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = client.fetch_catalog().await?;
    print!("{}", render_categories(&catalog));
    Ok(())
}

/// Render a listing page, one product per line, followed by the page position.
#[must_use]
pub fn render_listing(listing: &ListingPage<'_>) -> String {
    let mut out = String::new();

    if listing.items.is_empty() {
        out.push_str("No products match your filters.\n");
    }
    for product in &listing.items {
        let _ = writeln!(
            out,
            "{:>4}  {} - {} ({})",
            product.id,
            product.title,
            product.unit_price(),
            product.category
        );
    }
    let _ = writeln!(
        out,
        "Page {} of {} ({} matches)",
        listing.page, listing.page_count, listing.total_matches
    );

    out
}

/// Render the category list, `all` first.
#[must_use]
pub fn render_categories(catalog: &Catalog) -> String {
    std::iter::once(pocket_shop_core::listing::ALL_CATEGORIES)
        .chain(catalog.categories())
        .fold(String::new(), |mut out, category| {
            out.push_str(category);
            out.push('\n');
            out
        })
}
