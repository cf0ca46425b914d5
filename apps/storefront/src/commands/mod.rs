//! # Commands Module
//!
//! Everything the storefront pages can ask for.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Catalog load, lookup, filtered search
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── auth.rs      ◄─── Login, logout, profile
//! ├── checkout.rs  ◄─── Shipping → payment → review → order
//! └── tryon.rs     ◄─── Camera session: open, capture, download, close
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the catalog
//! fn get_product(catalog: &CatalogStore, id: &str)
//!
//! // Needs catalog and cart
//! fn add_to_cart(catalog: &CatalogStore, cart: &CartStore, ...)
//!
//! // Camera commands
//! async fn start_camera(tryon: &TryOnState)
//! ```
//!
//! Failures come back as [`ApiError`](crate::error::ApiError).

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod product;
pub mod tryon;
