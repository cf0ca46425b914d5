//! # Catalog Query
//!
//! The products page filter: category, material, price range, try-on only,
//! and free-text search. Filters are applied in that order and all must match.
//!
//! ## URL Parameters
//! ```text
//! /products?category=earrings&material=gold&minPrice=0&maxPrice=20000
//!          &filter=tryOnEnabled&search=pearl
//! ```
//! Empty values are treated as absent, which is what clearing a filter
//! control produces.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{Product, ProductCategory, ProductMaterial};
use crate::validation::validate_search_query;
use crate::DEFAULT_MAX_PRICE_PAISE;

/// Value of the `filter` parameter that restricts results to try-on products.
pub const TRY_ON_FILTER: &str = "tryOnEnabled";

/// A catalog filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category: Option<ProductCategory>,
    pub material: Option<ProductMaterial>,
    /// Inclusive lower bound in paise.
    pub min_price: i64,
    /// Inclusive upper bound in paise.
    pub max_price: i64,
    pub try_on_only: bool,
    pub search: Option<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        ProductQuery {
            category: None,
            material: None,
            min_price: 0,
            max_price: DEFAULT_MAX_PRICE_PAISE,
            try_on_only: false,
            search: None,
        }
    }
}

impl ProductQuery {
    /// Builds a query from URL search parameters.
    ///
    /// Unknown parameters are ignored. Unknown category/material slugs and
    /// non-numeric prices are rejected rather than silently matching nothing.
    ///
    /// ## Example
    /// ```rust
    /// use jewelar_core::query::ProductQuery;
    /// use jewelar_core::types::ProductCategory;
    ///
    /// let query = ProductQuery::from_query_pairs([
    ///     ("category", "earrings"),
    ///     ("maxPrice", "14000"),
    ///     ("search", ""),
    /// ])
    /// .unwrap();
    /// assert_eq!(query.category, Some(ProductCategory::Earrings));
    /// assert_eq!(query.max_price, 14000);
    /// assert_eq!(query.search, None);
    /// ```
    pub fn from_query_pairs<'a, I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = ProductQuery::default();

        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key {
                "category" => query.category = Some(value.parse()?),
                "material" => query.material = Some(value.parse()?),
                "minPrice" => query.min_price = parse_price("minPrice", value)?,
                "maxPrice" => query.max_price = parse_price("maxPrice", value)?,
                "filter" => query.try_on_only = value == TRY_ON_FILTER,
                "search" => {
                    let search = validate_search_query(value)?;
                    query.search = Some(search);
                }
                _ => {}
            }
        }

        Ok(query)
    }

    /// Returns true if the product passes every active filter.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }

        if let Some(material) = self.material {
            if product.material != material {
                return false;
            }
        }

        if product.price_paise < self.min_price || product.price_paise > self.max_price {
            return false;
        }

        if self.try_on_only && !product.try_on_enabled {
            return false;
        }

        match &self.search {
            Some(search) => {
                let needle = search.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Filters `products`, preserving catalog order.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products.iter().filter(|p| self.matches(p)).cloned().collect()
    }

    /// True when no filter narrows the catalog.
    pub fn is_unfiltered(&self) -> bool {
        *self == ProductQuery::default()
    }
}

fn parse_price(field: &str, value: &str) -> Result<i64, ValidationError> {
    let price: i64 = value.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(price)
}
