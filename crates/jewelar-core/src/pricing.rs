//! # Pricing
//!
//! Order summary arithmetic shared by the cart page and checkout.
//!
//! ```text
//! subtotal  = Σ unit_price × quantity
//! shipping  = flat fee if the cart has any lines, else 0
//! tax       = round(subtotal × 18%)
//! total     = subtotal + shipping + tax
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

/// Tunable pricing inputs, normally taken from the storefront config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRules {
    pub tax_rate: TaxRate,
    pub flat_shipping: Money,
}

impl Default for PricingRules {
    fn default() -> Self {
        PricingRules {
            tax_rate: TaxRate::default(),
            flat_shipping: Money::from_paise(crate::FLAT_SHIPPING_PAISE),
        }
    }
}

/// Totals shown in the cart summary and on the checkout review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderSummary {
    /// Computes the summary for a cart with `line_count` lines.
    ///
    /// ## Example
    /// ```rust
    /// use jewelar_core::money::Money;
    /// use jewelar_core::pricing::{OrderSummary, PricingRules};
    ///
    /// let empty = OrderSummary::calculate(Money::zero(), 0, &PricingRules::default());
    /// assert!(empty.total.is_zero());
    /// ```
    pub fn calculate(subtotal: Money, line_count: usize, rules: &PricingRules) -> Self {
        let shipping = if line_count > 0 {
            rules.flat_shipping
        } else {
            Money::zero()
        };
        let tax = subtotal.calculate_tax(rules.tax_rate);

        OrderSummary {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}
