//! Checkout form validation and order confirmation.
//!
//! Checkout has no payment step: a submitted form with a name, a usable
//! email, and an address confirms the order for whatever the cart holds.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::{Cart, CartLine};
use crate::types::{Email, Price};

/// Fields of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutField {
    Name,
    Email,
    Address,
}

impl CheckoutField {
    /// Form field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem with one checkout field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: CheckoutField,
    pub message: String,
}

/// The checkout form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid checkout form: {}", summarize(.fields))]
pub struct CheckoutError {
    /// One entry per rejected field, in form order.
    pub fields: Vec<FieldError>,
}

impl CheckoutError {
    /// Message for a field, if it was rejected.
    #[must_use]
    pub fn message_for(&self, field: CheckoutField) -> Option<&str> {
        self.fields
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checkout form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

impl CheckoutForm {
    /// Confirm an order for `cart`.
    ///
    /// Every field must be present after trimming; the email must also parse.
    /// The cart itself is not modified - clearing the persisted cart is the
    /// caller's job once the confirmation has been produced.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] listing every rejected field.
    pub fn confirm(&self, cart: &Cart) -> Result<OrderConfirmation, CheckoutError> {
        let mut fields = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            fields.push(missing(CheckoutField::Name));
        }

        let email = if self.email.trim().is_empty() {
            fields.push(missing(CheckoutField::Email));
            None
        } else {
            match Email::parse(&self.email) {
                Ok(email) => Some(email),
                Err(e) => {
                    fields.push(FieldError {
                        field: CheckoutField::Email,
                        message: e.to_string(),
                    });
                    None
                }
            }
        };

        let address = self.address.trim();
        if address.is_empty() {
            fields.push(missing(CheckoutField::Address));
        }

        match email {
            Some(email) if fields.is_empty() => Ok(OrderConfirmation {
                reference: Uuid::new_v4(),
                name: name.to_string(),
                email,
                address: address.to_string(),
                lines: cart.lines().to_vec(),
                total: cart.total(),
                confirmed_at: Utc::now(),
            }),
            _ => Err(CheckoutError { fields }),
        }
    }
}

fn missing(field: CheckoutField) -> FieldError {
    FieldError {
        field,
        message: format!("{field} is required"),
    }
}

/// A confirmed order, echoed back to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Reference shown to the customer.
    pub reference: Uuid,
    pub name: String,
    pub email: Email,
    pub address: String,
    /// Cart contents at the moment of confirmation.
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub confirmed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// Multi-line summary echoing the submitted fields.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Order Confirmed!\nName: {}\nEmail: {}\nAddress: {}",
            self.name, self.email, self.address
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::Product;
    use crate::types::ProductId;

    fn form(name: &str, email: &str, address: &str) -> CheckoutForm {
        CheckoutForm {
            name: name.to_string(),
            email: email.to_string(),
            address: address.to_string(),
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        let product = Product {
            id: ProductId::new(1),
            title: "Mascara".to_string(),
            price: Decimal::new(999, 2),
            category: "beauty".to_string(),
            thumbnail: String::new(),
        };
        cart.add(&product);
        cart.add(&product);
        cart
    }

    #[test]
    fn test_confirm_echoes_trimmed_fields() {
        let order = form(" Ada Lovelace ", "ada@example.com", "12 Analytical Way\n")
            .confirm(&cart())
            .unwrap();

        assert_eq!(order.name, "Ada Lovelace");
        assert_eq!(order.email.as_str(), "ada@example.com");
        assert_eq!(order.address, "12 Analytical Way");
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.total.to_string(), "$19.98");
        assert_eq!(
            order.summary(),
            "Order Confirmed!\nName: Ada Lovelace\nEmail: ada@example.com\nAddress: 12 Analytical Way"
        );
    }

    #[test]
    fn test_confirm_reports_every_missing_field() {
        let err = form("  ", "", "").confirm(&cart()).unwrap_err();
        let fields: Vec<CheckoutField> = err.fields.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                CheckoutField::Name,
                CheckoutField::Email,
                CheckoutField::Address
            ]
        );
        assert_eq!(err.message_for(CheckoutField::Name), Some("name is required"));
    }

    #[test]
    fn test_confirm_rejects_malformed_email() {
        let err = form("Ada", "ada-at-example", "12 Way")
            .confirm(&cart())
            .unwrap_err();
        assert_eq!(err.fields.len(), 1);
        assert_eq!(
            err.message_for(CheckoutField::Email),
            Some("email must contain an @ symbol")
        );
        assert!(err.message_for(CheckoutField::Address).is_none());
    }

    #[test]
    fn test_confirm_with_empty_cart() {
        let order = form("Ada", "ada@example.com", "12 Way")
            .confirm(&Cart::new())
            .unwrap();
        assert!(order.lines.is_empty());
        assert_eq!(order.total.to_string(), "$0.00");
    }

    #[test]
    fn test_confirm_does_not_touch_cart() {
        let cart = cart();
        let before = cart.clone();
        let _ = form("Ada", "ada@example.com", "12 Way").confirm(&cart);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_error_display() {
        let err = form("Ada", "", "12 Way").confirm(&cart()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid checkout form: email: email is required"
        );
    }
}
