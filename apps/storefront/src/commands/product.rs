//! # Product Commands
//!
//! Catalog loading and the products-page filter.

use jewelar_core::{Product, ProductCategory, ProductQuery};
use jewelar_store::{CatalogStore, StorefrontConfig};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiResult;

/// A product card as the listing renders it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    #[serde(flatten)]
    pub product: Product,
    /// Price with currency symbol, e.g. `₹150`.
    pub display_price: String,
    pub in_stock: bool,
}

impl ProductCard {
    fn new(product: Product, config: &StorefrontConfig) -> Self {
        ProductCard {
            display_price: config.format_price(product.price()),
            in_stock: product.stock_quantity > 0,
            product,
        }
    }
}

/// Loads (or reloads) the catalog. Returns the number of products.
pub async fn fetch_products(catalog: &CatalogStore) -> ApiResult<usize> {
    debug!("fetch_products command");
    Ok(catalog.fetch_products().await?)
}

/// Filters the catalog with products-page query parameters.
///
/// A missing `maxPrice` uses the configured default cap.
pub fn search_products(
    catalog: &CatalogStore,
    config: &StorefrontConfig,
    params: &[(&str, &str)],
) -> ApiResult<Vec<ProductCard>> {
    debug!(?params, "search_products command");

    let mut query = ProductQuery::from_query_pairs(params.iter().copied())?;
    let has_max_price = params
        .iter()
        .any(|(k, v)| *k == "maxPrice" && !v.trim().is_empty());
    if !has_max_price {
        query.max_price = config.pricing.default_max_price_paise;
    }

    Ok(catalog
        .search(&query)
        .into_iter()
        .map(|p| ProductCard::new(p, config))
        .collect())
}

pub fn get_product(
    catalog: &CatalogStore,
    config: &StorefrontConfig,
    product_id: &str,
) -> ApiResult<ProductCard> {
    debug!(%product_id, "get_product command");
    let product = catalog.require_product(product_id)?;
    Ok(ProductCard::new(product, config))
}

/// Products for a category page. `slug` is e.g. `nose-rings`.
pub fn get_products_by_category(
    catalog: &CatalogStore,
    config: &StorefrontConfig,
    slug: &str,
) -> ApiResult<Vec<ProductCard>> {
    debug!(%slug, "get_products_by_category command");
    let category: ProductCategory = slug.parse()?;

    Ok(catalog
        .get_products_by_category(category)
        .into_iter()
        .map(|p| ProductCard::new(p, config))
        .collect())
}

/// Products for the "Try On" landing grid.
pub fn get_try_on_products(
    catalog: &CatalogStore,
    config: &StorefrontConfig,
) -> Vec<ProductCard> {
    catalog
        .get_ar_compatible_products()
        .into_iter()
        .map(|p| ProductCard::new(p, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use jewelar_store::SeedCatalog;
    use std::sync::Arc;

    async fn loaded() -> CatalogStore {
        let catalog = CatalogStore::new(Arc::new(SeedCatalog));
        assert_eq!(fetch_products(&catalog).await.unwrap(), 8);
        catalog
    }

    #[tokio::test]
    async fn test_search_uses_configured_price_cap() {
        let catalog = loaded().await;
        let mut config = StorefrontConfig::default();
        config.pricing.default_max_price_paise = 20000;

        let ids: Vec<String> = search_products(&catalog, &config, &[])
            .unwrap()
            .into_iter()
            .map(|c| c.product.id)
            .collect();
        assert_eq!(ids, vec!["1", "4", "5", "8"]);

        // An explicit maxPrice wins over the configured cap.
        let all = search_products(&catalog, &config, &[("maxPrice", "100000")]).unwrap();
        assert_eq!(all.len(), 8);
    }

    #[tokio::test]
    async fn test_search_rejects_unknown_category() {
        let catalog = loaded().await;
        let err = search_products(
            &catalog,
            &StorefrontConfig::default(),
            &[("category", "anklets")],
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_product_card_formats_price() {
        let catalog = loaded().await;
        let card = get_product(&catalog, &StorefrontConfig::default(), "6").unwrap();
        assert_eq!(card.display_price, "₹450");
        assert!(card.in_stock);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["name"], "Ruby Statement Necklace");
        assert_eq!(json["displayPrice"], "₹450");

        let err = get_product(&catalog, &StorefrontConfig::default(), "404").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_category_and_try_on_listings() {
        let catalog = loaded().await;
        let config = StorefrontConfig::default();

        let nose = get_products_by_category(&catalog, &config, "nose-rings").unwrap();
        assert_eq!(nose.len(), 1);
        assert_eq!(nose[0].product.name, "Diamond Nose Stud");

        assert_eq!(get_try_on_products(&catalog, &config).len(), 5);
    }
}
