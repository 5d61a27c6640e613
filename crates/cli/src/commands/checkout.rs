//! Confirm an order for the cart file.

use std::fmt::Write as _;

use pocket_shop_core::{CheckoutForm, OrderConfirmation};

use crate::cart_file::CartFile;

/// Confirm the order and clear the cart file.
///
/// # Errors
///
/// Returns an error if the form is invalid or the cart file cannot be read
/// or removed. A rejected form leaves the cart file untouched.
pub async fn run(file: &CartFile, form: &CheckoutForm) -> Result<(), Box<dyn std::error::Error>> {
    let cart = file.load().await?;
    let order = form.confirm(&cart)?;
    file.clear().await?;

    tracing::info!(reference = %order.reference, total = %order.total, "Order confirmed");
    print!("{}", render_confirmation(&order));
    Ok(())
}

/// Render the confirmation: the echoed form, then the ordered lines.
#[must_use]
pub fn render_confirmation(order: &OrderConfirmation) -> String {
    let mut out = order.summary();
    out.push('\n');
    let _ = writeln!(out, "Reference: {}", order.reference);
    for line in &order.lines {
        let _ = writeln!(
            out,
            "  {} - {} x {}",
            line.title,
            line.unit_price(),
            line.quantity()
        );
    }
    let _ = writeln!(out, "Total: {}", order.total);
    out
}
