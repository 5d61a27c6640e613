//! Shopping cart and its persisted snapshot.
//!
//! The cart is an ordered list of lines keyed by product ID. It is persisted
//! as a JSON array under [`CART_STORAGE_KEY`] and rewritten after every
//! mutation, so front ends treat [`Cart::to_snapshot`] and
//! [`Cart::from_snapshot`] as the storage boundary.
//!
//! Invariants:
//! - a line's quantity is never below 1 (removal deletes the line)
//! - no two lines share a product ID
//! - a line's unit price lies within `0..=MAX_UNIT_PRICE`
//!
//! Snapshots come from the client, so they are validated on load; one that
//! breaks any invariant is rejected as a whole.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// Storage key under which the cart snapshot is persisted.
pub const CART_STORAGE_KEY: &str = "cart";

/// Highest unit price accepted from a persisted snapshot (one million dollars).
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Errors from cart mutations and snapshot loading.
#[derive(Debug, Error)]
pub enum CartError {
    /// No line exists for the product.
    #[error("product {0} is not in the cart")]
    LineNotFound(ProductId),

    /// A snapshot line has quantity 0.
    #[error("cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),

    /// A snapshot line has a negative or implausibly large unit price.
    #[error("cart line for product {id} has out-of-range price {price}")]
    InvalidPrice { id: ProductId, price: Decimal },

    /// A snapshot has two lines for the same product.
    #[error("cart has more than one line for product {0}")]
    DuplicateLine(ProductId),

    /// A snapshot is not valid JSON of the expected shape.
    #[error("malformed cart snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Direction of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityChange {
    Increase,
    Decrease,
}

/// One product's entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    /// Unit price in US dollars.
    pub price: Decimal,
    quantity: u32,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            quantity: 1,
        }
    }

    /// Units of the product in the cart (always at least 1).
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price with currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price().times(self.quantity)
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Restore a cart from its persisted JSON snapshot.
    ///
    /// Lines may carry extra product fields (older snapshots stored the whole
    /// product); those are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is not a JSON array of lines, or if any
    /// line breaks the cart invariants.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, CartError> {
        Ok(serde_json::from_str(snapshot)?)
    }

    /// Serialize the cart to its persisted JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_snapshot(&self) -> Result<String, CartError> {
        Ok(serde_json::to_string(&self.lines)?)
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Find the line for a product.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of all line totals, saturating instead of overflowing.
    #[must_use]
    pub fn total(&self) -> Price {
        Price::usd(
            self.lines
                .iter()
                .fold(Decimal::ZERO, |sum, line| {
                    sum.saturating_add(line.line_total().amount)
                }),
        )
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line, or appends a new line with quantity 1.
    /// Returns the line's new quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }
        self.lines.push(CartLine::from_product(product));
        1
    }

    /// Delete the line for a product, whatever its quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the product is not in the cart.
    pub fn remove(&mut self, id: ProductId) -> Result<CartLine, CartError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(CartError::LineNotFound(id))?;
        Ok(self.lines.remove(index))
    }

    /// Increase or decrease a line's quantity.
    ///
    /// Decreasing stops at 1. Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the product is not in the cart.
    pub fn change_quantity(
        &mut self,
        id: ProductId,
        change: QuantityChange,
    ) -> Result<u32, CartError> {
        let line = self.line_mut(id).ok_or(CartError::LineNotFound(id))?;
        match change {
            QuantityChange::Increase => line.quantity = line.quantity.saturating_add(1),
            QuantityChange::Decrease if line.quantity > 1 => line.quantity -= 1,
            QuantityChange::Decrease => {}
        }
        Ok(line.quantity)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.id));
            }
            if line.price.is_sign_negative() || line.price > MAX_UNIT_PRICE {
                return Err(CartError::InvalidPrice {
                    id: line.id,
                    price: line.price,
                });
            }
            if !seen.insert(line.id) {
                return Err(CartError::DuplicateLine(line.id));
            }
        }
        Ok(Self { lines })
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
