//! # Catalog Store
//!
//! Holds the product list the pages read from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch_products()                                                       │
//! │     │  is_loading = true                 ──► CatalogEvent::Loading      │
//! │     ▼                                                                   │
//! │  ProductSource::fetch_products().await                                  │
//! │     ├── Ok(list)  products = list        ──► CatalogEvent::Loaded       │
//! │     └── Err(e)    error = "Failed to fetch products"                    │
//! │                                          ──► CatalogEvent::Failed       │
//! │     is_loading = false                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups read whatever was last loaded; nothing is fetched lazily.

use async_trait::async_trait;
use jewelar_core::query::ProductQuery;
use jewelar_core::types::{Product, ProductCategory};
use jewelar_core::CoreError;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::error::{StoreError, StoreResult};

const EVENT_CAPACITY: usize = 16;

/// Where products come from.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self) -> StoreResult<Vec<Product>>;
}

/// Catalog change notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CatalogEvent {
    Loading,
    Loaded { count: usize },
    Failed { message: String },
}

#[derive(Debug)]
struct CatalogState {
    products: Vec<Product>,
    is_loading: bool,
    error: Option<String>,
}

/// Shared product catalog.
pub struct CatalogStore {
    source: Arc<dyn ProductSource>,
    state: Arc<Mutex<CatalogState>>,
    events: broadcast::Sender<CatalogEvent>,
}

impl CatalogStore {
    /// Creates an empty store. It reports `is_loading` until the first
    /// fetch completes.
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        CatalogStore {
            source,
            state: Arc::new(Mutex::new(CatalogState {
                products: Vec::new(),
                is_loading: true,
                error: None,
            })),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    /// Loads the catalog from the source, replacing what was there.
    /// Returns the number of products loaded.
    pub async fn fetch_products(&self) -> StoreResult<usize> {
        self.with_state(|s| s.is_loading = true);
        self.emit(CatalogEvent::Loading);

        match self.source.fetch_products().await {
            Ok(products) => {
                let count = products.len();
                self.with_state(|s| {
                    s.products = products;
                    s.error = None;
                    s.is_loading = false;
                });
                info!(count, "Catalog loaded");
                self.emit(CatalogEvent::Loaded { count });
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "Error fetching products");
                let message = "Failed to fetch products".to_string();
                self.with_state(|s| {
                    s.error = Some(message.clone());
                    s.is_loading = false;
                });
                self.emit(CatalogEvent::Failed { message });
                Err(StoreError::CatalogUnavailable(e.to_string()))
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.with_state(|s| s.is_loading)
    }

    /// Message from the last failed fetch.
    pub fn error(&self) -> Option<String> {
        self.with_state(|s| s.error.clone())
    }

    pub fn products(&self) -> Vec<Product> {
        self.with_state(|s| s.products.clone())
    }

    pub fn get_product_by_id(&self, id: &str) -> Option<Product> {
        self.with_state(|s| s.products.iter().find(|p| p.id == id).cloned())
    }

    /// Like [`get_product_by_id`](Self::get_product_by_id) but fails with
    /// `ProductNotFound`.
    pub fn require_product(&self, id: &str) -> StoreResult<Product> {
        self.get_product_by_id(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
    }

    pub fn get_products_by_category(&self, category: ProductCategory) -> Vec<Product> {
        self.with_state(|s| {
            s.products
                .iter()
                .filter(|p| p.category == category)
                .cloned()
                .collect()
        })
    }

    /// Products that open the try-on page.
    pub fn get_ar_compatible_products(&self) -> Vec<Product> {
        self.with_state(|s| {
            s.products
                .iter()
                .filter(|p| p.supports_try_on())
                .cloned()
                .collect()
        })
    }

    /// Products matching the products-page filter.
    pub fn search(&self, query: &ProductQuery) -> Vec<Product> {
        let results = self.with_state(|s| query.apply(&s.products));
        debug!(results = results.len(), unfiltered = query.is_unfiltered(), "Catalog searched");
        results
    }

    fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CatalogState) -> R,
    {
        let mut state = self.lock();
        f(&mut state)
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: CatalogEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
