//! Pocket Shop Core - Domain types and storefront logic.
//!
//! This crate is shared by every Pocket Shop component:
//! - `storefront` - Server-rendered shop front
//! - `cli` - Command-line catalog browser and cart manager
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Both front ends feed it a catalog and a persisted cart
//! snapshot and render whatever comes back.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, and emails
//! - [`catalog`] - Products as served by the remote catalog API
//! - [`listing`] - Category filter, title search, and pagination
//! - [`cart`] - Cart lines, quantity bookkeeping, and the persisted snapshot
//! - [`checkout`] - Checkout form validation and order confirmation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod listing;
pub mod types;

pub use cart::{CART_STORAGE_KEY, Cart, MAX_UNIT_PRICE, CartError, CartLine, QuantityChange};
pub use catalog::{Catalog, Product};
pub use checkout::{CheckoutError, CheckoutField, CheckoutForm, FieldError, OrderConfirmation};
pub use listing::{ListingPage, ListingQuery};
pub use types::*;
