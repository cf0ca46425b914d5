//! # State Module
//!
//! The stores the commands operate on.
//!
//! Each concern keeps its own state type, and commands take only what they
//! need:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Storefront                                 │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────┐ ┌──────────────┐                 │
//! │  │ StorefrontConfig │ │ CatalogStore │ │ CartStore    │                 │
//! │  │ (read-only)      │ │ (Arc)        │ │ (Arc)        │                 │
//! │  └──────────────────┘ └──────────────┘ └──────────────┘                 │
//! │  ┌──────────────┐ ┌──────────────────────┐ ┌──────────────────────────┐ │
//! │  │ AuthStore    │ │ CheckoutState        │ │ TryOnState               │ │
//! │  │ (Arc)        │ │ Mutex<Option<Flow>>  │ │ camera host + open view  │ │
//! │  └──────────────┘ └──────────────────────┘ └──────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod checkout;
mod tryon;

use std::sync::Arc;

use jewelar_store::{AuthStore, CartStore, CatalogStore, ProductSource, SeedCatalog, StorefrontConfig};
use jewelar_tryon::{MediaHost, SyntheticCamera};
use tracing::info;

use crate::error::ApiResult;

pub use checkout::CheckoutState;
pub use tryon::TryOnState;

/// Everything the storefront commands need, wired from one config.
pub struct Storefront {
    pub config: StorefrontConfig,
    pub catalog: Arc<CatalogStore>,
    pub cart: Arc<CartStore>,
    pub auth: Arc<AuthStore>,
    pub checkout: CheckoutState,
    pub tryon: TryOnState,
}

impl Storefront {
    /// Wires the stores against the built-in catalog and synthetic camera.
    pub fn new(config: StorefrontConfig) -> ApiResult<Self> {
        let camera = SyntheticCamera::new(config.camera.synthetic_width, config.camera.synthetic_height);
        Self::with_sources(config, Arc::new(SeedCatalog), Arc::new(camera))
    }

    /// Wires the stores against the given product source and camera host.
    pub fn with_sources(
        config: StorefrontConfig,
        products: Arc<dyn ProductSource>,
        camera: Arc<dyn MediaHost>,
    ) -> ApiResult<Self> {
        let auth = AuthStore::from_config(&config.auth.users)?;
        let tryon = TryOnState::new(camera, &config.camera)?;

        info!(store = %config.store.name, "Storefront state initialized");

        Ok(Storefront {
            catalog: Arc::new(CatalogStore::new(products)),
            cart: Arc::new(CartStore::new()),
            auth: Arc::new(auth),
            checkout: CheckoutState::new(),
            tryon,
            config,
        })
    }
}
