//! Cart persistence for the terminal client.
//!
//! The cart file holds the same JSON snapshot the storefront keeps in its
//! cookie. A missing file is an empty cart; an unreadable one is discarded
//! with a warning, and the next write replaces it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pocket_shop_core::{Cart, CartError};
use thiserror::Error;

/// Default cart file name, relative to the working directory.
pub const DEFAULT_CART_FILE: &str = "pocket-shop-cart.json";

/// Errors reading or writing the cart file.
#[derive(Debug, Error)]
pub enum CartFileError {
    #[error("cart file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A cart snapshot on disk.
#[derive(Debug, Clone)]
pub struct CartFile {
    path: PathBuf,
}

impl CartFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cart, treating a missing or malformed file as empty.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but cannot be read.
    pub async fn load(&self) -> Result<Cart, CartFileError> {
        let snapshot = match tokio::fs::read_to_string(&self.path).await {
            Ok(snapshot) => snapshot,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Cart::new()),
            Err(source) => {
                return Err(CartFileError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match Cart::from_snapshot(&snapshot) {
            Ok(cart) => Ok(cart),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable cart file");
                Ok(Cart::new())
            }
        }
    }

    /// Write the cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized or the file written.
    pub async fn save(&self, cart: &Cart) -> Result<(), CartFileError> {
        let snapshot = cart.to_snapshot()?;
        tokio::fs::write(&self.path, snapshot)
            .await
            .map_err(|source| CartFileError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Delete the cart file. Deleting a file that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<(), CartFileError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CartFileError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocket_shop_core::{Product, ProductId};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(5),
            title: "Red Nail Polish".to_string(),
            price: Decimal::new(899, 2),
            category: "beauty".to_string(),
            thumbnail: String::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_cart() {
        let dir = TempDir::new().unwrap();
        let file = CartFile::new(dir.path().join("cart.json"));

        assert!(file.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let file = CartFile::new(dir.path().join("cart.json"));

        let mut cart = Cart::new();
        cart.add(&product());
        cart.add(&product());
        file.save(&cart).await.unwrap();

        let loaded = file.load().await.unwrap();
        assert_eq!(loaded, cart);
        assert_eq!(loaded.line(ProductId::new(5)).unwrap().quantity(), 2);
    }

    #[tokio::test]
    async fn test_malformed_file_is_empty_cart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, r#"[{"id":1,"title":"x","price":"1.00","quantity":0}]"#).unwrap();

        let cart = CartFile::new(path).load().await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_price_is_empty_cart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(
            &path,
            r#"[{"id":1,"title":"x","price":"79228162514264337593543950335","quantity":2}]"#,
        )
        .unwrap();

        let cart = CartFile::new(path).load().await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total().to_string(), "$0.00");
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = TempDir::new().unwrap();
        let file = CartFile::new(dir.path().join("cart.json"));

        file.save(&Cart::new()).await.unwrap();
        file.clear().await.unwrap();
        assert!(!file.path().exists());

        // Clearing again is fine
        file.clear().await.unwrap();
    }
}
