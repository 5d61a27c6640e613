//! Browser-side cart persistence.
//!
//! The cart never touches server storage. Its JSON snapshot lives in a single
//! cookie named after [`CART_STORAGE_KEY`], base64url-encoded so the JSON
//! survives as a cookie value. Every cart mutation answers with a fresh
//! `Set-Cookie`, and checkout answers with a removal cookie.
//!
//! A cookie that fails to decode or validate is treated as an empty cart; the
//! next mutation overwrites it.
//!
//! Browsers drop cookies over about 4 KB without telling anyone, so a cart
//! whose encoded value exceeds [`MAX_CART_COOKIE_BYTES`] is refused rather
//! than silently lost.

use std::convert::Infallible;
use std::string::FromUtf8Error;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::COOKIE, request::Parts},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use pocket_shop_core::{CART_STORAGE_KEY, Cart, CartError};
use thiserror::Error;
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

/// Name of the cookie holding the cart snapshot.
pub const CART_COOKIE_NAME: &str = CART_STORAGE_KEY;

/// Cart cookie lifetime in days.
const CART_COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Largest encoded cart value written to the cookie, leaving room for the
/// name and attributes under the browser's 4096-byte limit.
pub const MAX_CART_COOKIE_BYTES: usize = 3800;

/// Errors decoding a cart cookie value.
#[derive(Debug, Error)]
pub enum CartCookieError {
    #[error("cart cookie is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cart cookie is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("cart is too large to save ({len} bytes encoded)")]
    TooLarge { len: usize },
}

/// Extractor for the cart persisted in the request's cookies.
///
/// Never rejects: a missing or unreadable cookie yields an empty cart.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(StoredCart(cart): StoredCart) -> String {
///     format!("Cart: {} items", cart.len())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoredCart(pub Cart);

impl<S> FromRequestParts<S> for StoredCart
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(read_cart(&parts.headers)))
    }
}

/// Read the cart from request headers, falling back to an empty cart.
#[must_use]
pub fn read_cart(headers: &HeaderMap) -> Cart {
    let Some(value) = find_cookie(headers, CART_COOKIE_NAME) else {
        return Cart::new();
    };

    match decode(&value) {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable cart cookie");
            Cart::new()
        }
    }
}

/// Decode a cart cookie value.
///
/// # Errors
///
/// Returns an error if the value is not base64url-encoded UTF-8 JSON, or if the
/// snapshot breaks the cart invariants.
pub fn decode(value: &str) -> Result<Cart, CartCookieError> {
    let bytes = URL_SAFE_NO_PAD.decode(value.trim())?;
    let json = String::from_utf8(bytes)?;
    Ok(Cart::from_snapshot(&json)?)
}

/// Encode a cart as a cookie value.
///
/// # Errors
///
/// Returns an error if the cart cannot be serialized.
pub fn encode(cart: &Cart) -> Result<String, CartError> {
    Ok(URL_SAFE_NO_PAD.encode(cart.to_snapshot()?))
}

/// Build the `Set-Cookie` value that persists `cart`.
///
/// # Errors
///
/// Returns an error if the cart cannot be serialized, or if the encoded value
/// is longer than [`MAX_CART_COOKIE_BYTES`].
pub fn save_cookie(cart: &Cart, secure: bool) -> Result<String, CartCookieError> {
    let value = encode(cart)?;
    if value.len() > MAX_CART_COOKIE_BYTES {
        tracing::warn!(
            len = value.len(),
            lines = cart.len(),
            "Cart exceeds cookie size limit"
        );
        return Err(CartCookieError::TooLarge { len: value.len() });
    }

    let cookie = Cookie::build((CART_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(CART_COOKIE_MAX_AGE_DAYS))
        .build();
    Ok(cookie.to_string())
}

/// Build the `Set-Cookie` value that deletes the persisted cart.
#[must_use]
pub fn clear_cookie(secure: bool) -> String {
    let mut cookie = Cookie::build((CART_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie.to_string()
}

/// Find a cookie value across all `Cookie` headers.
fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;
    use pocket_shop_core::{Product, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn cart_with_mascara() -> Cart {
        let mut cart = Cart::new();
        cart.add(&Product {
            id: ProductId::new(1),
            title: "Essence Mascara; \"Lash\" Princess".to_string(),
            price: Decimal::new(999, 2),
            category: "beauty".to_string(),
            thumbnail: String::new(),
        });
        cart
    }

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_encoded_value_is_cookie_safe() {
        let value = encode(&cart_with_mascara()).unwrap();
        assert!(
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(decode(&value).unwrap(), cart_with_mascara());
    }

    #[test]
    fn test_read_cart_from_cookie_header() {
        let value = encode(&cart_with_mascara()).unwrap();
        let headers = headers(&format!("theme=dark; cart={value}; other=1"));
        assert_eq!(read_cart(&headers), cart_with_mascara());
    }

    #[test]
    fn test_missing_cookie_is_empty_cart() {
        assert!(read_cart(&HeaderMap::new()).is_empty());
        assert!(read_cart(&headers("theme=dark")).is_empty());
    }

    #[test]
    fn test_malformed_cookie_is_empty_cart() {
        assert!(read_cart(&headers("cart=%%%not-base64")).is_empty());

        let not_json = URL_SAFE_NO_PAD.encode("{broken");
        assert!(read_cart(&headers(&format!("cart={not_json}"))).is_empty());

        let zero_qty = URL_SAFE_NO_PAD.encode(r#"[{"id":1,"title":"A","price":1,"quantity":0}]"#);
        assert!(matches!(
            decode(&zero_qty),
            Err(CartCookieError::Cart(CartError::Snapshot(_)))
        ));
    }

    #[test]
    fn test_out_of_range_price_is_empty_cart() {
        let snapshot =
            r#"[{"id":1,"title":"A","price":"79228162514264337593543950335","quantity":2}]"#;
        let value = URL_SAFE_NO_PAD.encode(snapshot);

        assert!(matches!(
            decode(&value),
            Err(CartCookieError::Cart(CartError::Snapshot(_)))
        ));
        let cart = read_cart(&headers(&format!("cart={value}")));
        assert!(cart.is_empty());
        assert_eq!(cart.total().to_string(), "$0.00");
    }

    #[test]
    fn test_save_cookie_refuses_oversized_cart() {
        let mut cart = Cart::new();
        for id in 1..=60 {
            cart.add(&Product {
                id: ProductId::new(id),
                title: format!("Hand-poured soy candle, lavender and cedar, gift boxed #{id}"),
                price: Decimal::new(2499, 2),
                category: "home-decoration".to_string(),
                thumbnail: String::new(),
            });
        }

        assert!(matches!(
            save_cookie(&cart, false),
            Err(CartCookieError::TooLarge { len }) if len > MAX_CART_COOKIE_BYTES
        ));
        assert!(save_cookie(&cart_with_mascara(), false).is_ok());
    }

    #[test]
    fn test_save_cookie_attributes() {
        let cookie = save_cookie(&cart_with_mascara(), true).unwrap();
        assert!(cookie.starts_with("cart="));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=31536000"));

        let insecure = save_cookie(&Cart::new(), false).unwrap();
        assert!(!insecure.contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_cookie(false);
        assert!(cookie.starts_with("cart=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
    }
}
