//! # jewelar-store: Storefront State
//!
//! The mutable state the storefront pages read and mutate. Each store is an
//! explicit object: a narrow set of methods plus a `broadcast` subscription
//! the page listens on to re-render.
//!
//! ## Store Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   StorefrontConfig ──► pricing_rules() ──┐                              │
//! │        │                                 │                              │
//! │        └──► auth.users ──► AuthStore     │                              │
//! │                               │ user     ▼                              │
//! │   ProductSource ──► CatalogStore    CheckoutFlow ──► OrderConfirmation  │
//! │                        │ Product         ▲                              │
//! │                        ▼                 │                              │
//! │                     CartStore ───────────┘                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use jewelar_store::{CartStore, CatalogStore, SeedCatalog};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let catalog = CatalogStore::new(Arc::new(SeedCatalog));
//! catalog.fetch_products().await.unwrap();
//!
//! let cart = CartStore::new();
//! let studs = catalog.get_product_by_id("1").unwrap();
//! cart.add_to_cart(&studs, 2).unwrap();
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total_price().paise(), 30000);
//! # });
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod seed;

pub use auth::{AuthEvent, AuthStore};
pub use cart::{Cart, CartEvent, CartLine, CartStore, CartTotals};
pub use catalog::{CatalogEvent, CatalogStore, ProductSource};
pub use checkout::{CheckoutFlow, OrderConfirmation};
pub use config::{DemoUserConfig, StorefrontConfig};
pub use error::{StoreError, StoreResult};
pub use seed::{demo_products, SeedCatalog};
