//! # jewelar-core: Pure Business Logic for the JewelAR Storefront
//!
//! Everything in here is deterministic and free of I/O. The stores in
//! `jewelar-store` and the try-on view in `jewelar-tryon` build on these types.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      JewelAR Storefront Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend                                 │   │
//! │  │  Products ──► Product Detail ──► Try-On ──► Cart ──► Checkout  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        jewelar-store  (cart, catalog, auth, checkout)           │   │
//! │  │        jewelar-tryon  (camera session, snapshots)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ jewelar-core (THIS CRATE) ★                     │   │
//! │  │   types • money • pricing • query • validation • error         │   │
//! │  │   NO I/O • NO DEVICES • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User, checkout forms)
//! - [`money`] - Integer money in paise with Indian digit grouping
//! - [`pricing`] - Order summary (shipping + GST) arithmetic
//! - [`query`] - Catalog filter used by the products page
//! - [`validation`] - Form and business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use jewelar_core::money::Money;
//! use jewelar_core::pricing::{OrderSummary, PricingRules};
//!
//! let subtotal = Money::from_paise(15000);
//! let summary = OrderSummary::calculate(subtotal, 1, &PricingRules::default());
//!
//! // 18% GST on ₹150 = ₹27, plus ₹20 flat shipping
//! assert_eq!(summary.tax.paise(), 2700);
//! assert_eq!(summary.total.paise(), 15000 + 2000 + 2700);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{OrderSummary, PricingRules};
pub use query::ProductQuery;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single product in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Upper bound of the price filter when the shopper has not set one (paise).
pub const DEFAULT_MAX_PRICE_PAISE: i64 = 100_000;

/// GST applied at checkout, in basis points (1800 = 18%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1800;

/// Flat shipping charge for a non-empty cart (paise).
pub const FLAT_SHIPPING_PAISE: i64 = 2000;

/// Countries the shipping form accepts.
pub const SUPPORTED_COUNTRIES: [&str; 5] = [
    "India",
    "United States",
    "United Kingdom",
    "Canada",
    "Australia",
];
