//! # Checkout Flow
//!
//! The three-step checkout wizard over a shared cart.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  begin(cart)   cart empty? ──► CartEmpty (page redirects to /cart)      │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Shipping ──submit_shipping──► Payment ──submit_payment──► Review      │
//! │     ▲                            │  ▲                        │          │
//! │     └────────── back() ──────────┘  └──────── back() ────────┘          │
//! │                                                              │          │
//! │                                              place_order() ──┘          │
//! │                                  OrderConfirmation, cart cleared        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Forms are validated before the step advances, so a rejected submit leaves
//! the flow where it was. Nothing is charged and nothing is persisted.

use chrono::{DateTime, Utc};
use jewelar_core::pricing::{OrderSummary, PricingRules};
use jewelar_core::types::{CheckoutStep, PaymentDetails, ShippingDetails, User};
use jewelar_core::validation::{validate_payment, validate_shipping};
use jewelar_core::CoreError;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cart::{CartLine, CartStore};
use crate::error::StoreResult;

/// What the confirmation page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: String,
    /// Short human-readable number, e.g. `JA-240815-143012-7F3A`.
    pub order_number: String,
    pub lines: Vec<CartLine>,
    pub summary: OrderSummary,
    pub shipping: ShippingDetails,
    pub card_last_four: String,
    pub placed_at: DateTime<Utc>,
}

/// One checkout attempt.
pub struct CheckoutFlow {
    cart: Arc<CartStore>,
    rules: PricingRules,
    step: CheckoutStep,
    shipping: ShippingDetails,
    payment: Option<PaymentDetails>,
    order: Option<OrderConfirmation>,
}

impl CheckoutFlow {
    /// Starts checkout. The shipping form is prefilled from `user` when
    /// someone is logged in.
    pub fn begin(
        cart: Arc<CartStore>,
        rules: PricingRules,
        user: Option<&User>,
    ) -> StoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::CartEmpty.into());
        }

        let shipping = user
            .map(ShippingDetails::prefilled_from)
            .unwrap_or_default();
        debug!(prefilled = user.is_some(), "Checkout started");

        Ok(CheckoutFlow {
            cart,
            rules,
            step: CheckoutStep::Shipping,
            shipping,
            payment: None,
            order: None,
        })
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Current contents of the shipping form.
    pub fn shipping(&self) -> &ShippingDetails {
        &self.shipping
    }

    /// Card digits are not kept past the flow.
    pub fn card_last_four(&self) -> Option<String> {
        self.payment.as_ref().map(PaymentDetails::last_four)
    }

    /// Totals computed from the live cart.
    pub fn summary(&self) -> OrderSummary {
        self.cart.summary(&self.rules)
    }

    pub fn submit_shipping(&mut self, details: ShippingDetails) -> StoreResult<CheckoutStep> {
        self.expect_step(CheckoutStep::Shipping)?;
        validate_shipping(&details)?;

        self.shipping = details;
        self.step = CheckoutStep::Payment;
        debug!(country = %self.shipping.country, "Shipping details accepted");
        Ok(self.step)
    }

    pub fn submit_payment(&mut self, details: PaymentDetails) -> StoreResult<CheckoutStep> {
        self.expect_step(CheckoutStep::Payment)?;
        validate_payment(&details)?;

        debug!(card = %details.last_four(), "Payment details accepted");
        self.payment = Some(details);
        self.step = CheckoutStep::Review;
        Ok(self.step)
    }

    /// Goes to the previous step. Already-entered forms are kept.
    pub fn back(&mut self) -> CheckoutStep {
        self.step = match self.step {
            CheckoutStep::Review => CheckoutStep::Payment,
            CheckoutStep::Payment | CheckoutStep::Shipping => CheckoutStep::Shipping,
        };
        self.step
    }

    /// Places the order and clears the cart.
    ///
    /// Placing twice returns the same confirmation.
    pub fn place_order(&mut self) -> StoreResult<OrderConfirmation> {
        if let Some(order) = &self.order {
            return Ok(order.clone());
        }

        self.expect_step(CheckoutStep::Review)?;
        let card_last_four = self
            .card_last_four()
            .ok_or_else(|| CoreError::InvalidCheckoutStep {
                current: self.step.to_string(),
                expected: CheckoutStep::Payment.to_string(),
            })?;

        let (lines, summary) = self
            .cart
            .with_cart(|cart| (cart.lines.clone(), cart.summary(&self.rules)));
        if lines.is_empty() {
            return Err(CoreError::CartEmpty.into());
        }

        let order_id = Uuid::new_v4();
        let placed_at = Utc::now();
        let order = OrderConfirmation {
            order_id: order_id.to_string(),
            order_number: order_number(&order_id, placed_at),
            lines,
            summary,
            shipping: self.shipping.clone(),
            card_last_four,
            placed_at,
        };

        self.cart.clear_cart();
        // The full card number and CVV go no further.
        self.payment = None;

        info!(
            order_id = %order.order_id,
            total = %order.summary.total,
            items = order.lines.len(),
            "Order placed"
        );
        self.order = Some(order.clone());
        Ok(order)
    }

    pub fn is_complete(&self) -> bool {
        self.order.is_some()
    }

    fn expect_step(&self, expected: CheckoutStep) -> StoreResult<()> {
        if self.order.is_some() || self.step != expected {
            let current = if self.order.is_some() {
                "complete".to_string()
            } else {
                self.step.to_string()
            };
            return Err(CoreError::InvalidCheckoutStep {
                current,
                expected: expected.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn order_number(order_id: &Uuid, placed_at: DateTime<Utc>) -> String {
    let suffix: String = order_id.simple().to_string().chars().take(4).collect();
    format!(
        "JA-{}-{}",
        placed_at.format("%y%m%d-%H%M%S"),
        suffix.to_uppercase()
    )
}
