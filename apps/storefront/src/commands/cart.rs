//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! Product page ──add_to_cart──► CartStore ──► CartEvent::ItemAdded
//!                                   │
//! Cart page ◄──── get_cart ─────────┤  lines + totals + order summary
//!      │                            │
//!      ├── update_cart_item(0) ─────┤  removes the line
//!      └── remove_from_cart ────────┘
//! ```

use jewelar_core::OrderSummary;
use jewelar_store::{CartLine, CartStore, CartTotals, CatalogStore, StorefrontConfig};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiResult;

/// Cart response including lines, header totals and the order summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    pub summary: OrderSummary,
    /// Summary total with currency symbol.
    pub display_total: String,
}

impl CartResponse {
    fn from_store(cart: &CartStore, config: &StorefrontConfig) -> Self {
        let rules = config.pricing_rules();
        let (lines, totals, summary) = cart.with_cart(|c| {
            (c.lines.clone(), CartTotals::from(c), c.summary(&rules))
        });

        CartResponse {
            display_total: config.format_price(summary.total),
            lines,
            totals,
            summary,
        }
    }
}

pub fn get_cart(cart: &CartStore, config: &StorefrontConfig) -> CartResponse {
    debug!("get_cart command");
    CartResponse::from_store(cart, config)
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - If product already in cart: quantity increases
/// - Price and image are frozen at time of adding
/// - More than the stock on hand is refused
pub fn add_to_cart(
    catalog: &CatalogStore,
    cart: &CartStore,
    config: &StorefrontConfig,
    product_id: &str,
    quantity: Option<i64>,
) -> ApiResult<CartResponse> {
    let quantity = quantity.unwrap_or(1);
    debug!(%product_id, quantity, "add_to_cart command");

    let product = catalog.require_product(product_id)?;
    cart.add_to_cart(&product, quantity)?;

    Ok(CartResponse::from_store(cart, config))
}

/// Sets a line's quantity. Zero removes it.
pub fn update_cart_item(
    cart: &CartStore,
    config: &StorefrontConfig,
    product_id: &str,
    quantity: i64,
) -> ApiResult<CartResponse> {
    debug!(%product_id, quantity, "update_cart_item command");
    cart.update_quantity(product_id, quantity)?;
    Ok(CartResponse::from_store(cart, config))
}

pub fn remove_from_cart(
    cart: &CartStore,
    config: &StorefrontConfig,
    product_id: &str,
) -> ApiResult<CartResponse> {
    debug!(%product_id, "remove_from_cart command");
    cart.remove_from_cart(product_id)?;
    Ok(CartResponse::from_store(cart, config))
}

pub fn clear_cart(cart: &CartStore, config: &StorefrontConfig) -> CartResponse {
    debug!("clear_cart command");
    cart.clear_cart();
    CartResponse::from_store(cart, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use jewelar_store::SeedCatalog;
    use std::sync::Arc;

    async fn setup() -> (CatalogStore, CartStore, StorefrontConfig) {
        let catalog = CatalogStore::new(Arc::new(SeedCatalog));
        catalog.fetch_products().await.unwrap();
        (catalog, CartStore::new(), StorefrontConfig::default())
    }

    #[tokio::test]
    async fn test_add_and_summarize() {
        let (catalog, cart, config) = setup().await;

        add_to_cart(&catalog, &cart, &config, "1", None).unwrap();
        let response = add_to_cart(&catalog, &cart, &config, "1", Some(2)).unwrap();

        assert_eq!(response.lines.len(), 1);
        assert_eq!(response.totals.item_count, 3);
        assert_eq!(response.summary.subtotal.paise(), 45000);
        assert_eq!(response.summary.shipping.paise(), 2000);
        assert_eq!(response.summary.tax.paise(), 8100);
        assert_eq!(response.display_total, "₹551");
    }

    #[tokio::test]
    async fn test_update_to_zero_removes_line() {
        let (catalog, cart, config) = setup().await;
        add_to_cart(&catalog, &cart, &config, "4", Some(2)).unwrap();

        let response = update_cart_item(&cart, &config, "4", 0).unwrap();
        assert!(response.lines.is_empty());
        assert!(response.summary.total.is_zero());
    }

    #[tokio::test]
    async fn test_errors_carry_codes() {
        let (catalog, cart, config) = setup().await;

        let err = add_to_cart(&catalog, &cart, &config, "missing", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        // Ruby Statement Necklace has two in stock.
        let err = add_to_cart(&catalog, &cart, &config, "6", Some(3)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err = remove_from_cart(&cart, &config, "6").unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        let err = add_to_cart(&catalog, &cart, &config, "1", Some(0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let (catalog, cart, config) = setup().await;
        add_to_cart(&catalog, &cart, &config, "8", None).unwrap();
        assert!(clear_cart(&cart, &config).lines.is_empty());
    }
}
