//! Manage the cart file.

use std::fmt::Write as _;

use pocket_shop_core::{Cart, ProductId, QuantityChange};
use pocket_shop_storefront::catalog::CatalogClient;

use crate::cart_file::CartFile;

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the cart file exists but cannot be read.
pub async fn show(file: &CartFile) -> Result<(), Box<dyn std::error::Error>> {
    let cart = file.load().await?;
    print!("{}", render_cart(&cart));
    Ok(())
}

/// Add one unit of a catalog product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched, the product does not
/// exist, or the cart file cannot be written.
pub async fn add(
    file: &CartFile,
    client: &CatalogClient,
    id: ProductId,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = client
        .find_product(id)
        .await?
        .ok_or_else(|| format!("product {id} is not in the catalog"))?;

    let mut cart = file.load().await?;
    let quantity = cart.add(&product);
    file.save(&cart).await?;

    tracing::info!(product_id = %id, quantity, "Added product to cart");
    print!("{}", render_cart(&cart));
    Ok(())
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the product is not in the cart or the cart file cannot
/// be written.
pub async fn remove(file: &CartFile, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = file.load().await?;
    let line = cart.remove(id)?;
    file.save(&cart).await?;

    tracing::info!(product_id = %id, quantity = line.quantity(), "Removed line from cart");
    print!("{}", render_cart(&cart));
    Ok(())
}

/// Increase or decrease a line's quantity (never below 1).
///
/// # Errors
///
/// Returns an error if the product is not in the cart or the cart file cannot
/// be written.
pub async fn change_quantity(
    file: &CartFile,
    id: ProductId,
    change: QuantityChange,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = file.load().await?;
    let quantity = cart.change_quantity(id, change)?;
    file.save(&cart).await?;

    tracing::info!(product_id = %id, quantity, "Changed cart quantity");
    print!("{}", render_cart(&cart));
    Ok(())
}

/// Render the cart the way the storefront's sidebar shows it.
#[must_use]
pub fn render_cart(cart: &Cart) -> String {
    let mut out = format!("Cart: {} items\n", cart.len());
    for line in cart.lines() {
        let _ = writeln!(
            out,
            "  [{}] {} - {} x {}",
            line.id,
            line.title,
            line.unit_price(),
            line.quantity()
        );
    }
    let _ = writeln!(out, "Total: {}", cart.total());
    out
}
