//! Products as served by the remote catalog API.
//!
//! The catalog endpoint answers `{ "products": [...] }` with a much richer
//! record per product than the shop needs. Only the fields below are kept;
//! everything else in the payload is ignored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product offered by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price in US dollars.
    pub price: Decimal,
    pub category: String,
    /// Thumbnail image URL.
    #[serde(default)]
    pub thumbnail: String,
}

impl Product {
    /// Unit price with currency, for display.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }
}

/// The full product list fetched from the catalog API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from a product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse the catalog API response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON or lacks a `products` array
    /// of well-formed products.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Distinct categories in the order they first appear.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "products": [
            {
                "id": 1,
                "title": "Essence Mascara Lash Princess",
                "description": "Popular mascara",
                "category": "beauty",
                "price": 9.99,
                "rating": 4.94,
                "thumbnail": "https://cdn.dummyjson.com/1/thumbnail.png"
            },
            {
                "id": 6,
                "title": "Calvin Klein CK One",
                "category": "fragrances",
                "price": 49.99,
                "thumbnail": "https://cdn.dummyjson.com/6/thumbnail.png"
            },
            {
                "id": 2,
                "title": "Eyeshadow Palette with Mirror",
                "category": "beauty",
                "price": 19
            }
        ],
        "total": 194,
        "skip": 0,
        "limit": 30
    }"#;

    #[test]
    fn test_from_json_ignores_extra_fields() {
        let catalog = Catalog::from_json(BODY).unwrap();
        assert_eq!(catalog.len(), 3);

        let mascara = catalog.find(ProductId::new(1)).unwrap();
        assert_eq!(mascara.title, "Essence Mascara Lash Princess");
        assert_eq!(mascara.price, Decimal::new(999, 2));
        assert_eq!(mascara.unit_price().to_string(), "$9.99");
    }

    #[test]
    fn test_missing_thumbnail_defaults_to_empty() {
        let catalog = Catalog::from_json(BODY).unwrap();
        let palette = catalog.find(ProductId::new(2)).unwrap();
        assert!(palette.thumbnail.is_empty());
        assert_eq!(palette.price, Decimal::new(19, 0));
    }

    #[test]
    fn test_from_json_requires_products() {
        assert!(Catalog::from_json(r#"{"message": "not found"}"#).is_err());
        assert!(Catalog::from_json("<html>").is_err());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = Catalog::from_json(BODY).unwrap();
        assert_eq!(catalog.categories(), vec!["beauty", "fragrances"]);
    }

    #[test]
    fn test_find_unknown() {
        let catalog = Catalog::from_json(BODY).unwrap();
        assert!(catalog.find(ProductId::new(404)).is_none());
    }
}
