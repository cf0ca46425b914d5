//! # Checkout Commands
//!
//! ## Checkout Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart page "Proceed to Checkout"                                        │
//! │       │ begin_checkout()        empty cart ──► CART_ERROR (→ /cart)     │
//! │       ▼                                                                 │
//! │  Shipping form  ── submit_shipping() ──►  Payment form                  │
//! │                                              │ submit_payment()         │
//! │                                              ▼                          │
//! │  Confirmation ◄── place_order() ────────  Review                        │
//! │  (cart cleared)                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use jewelar_core::{CheckoutStep, OrderSummary, PaymentDetails, ShippingDetails};
use jewelar_store::{AuthStore, CartStore, CheckoutFlow, OrderConfirmation, StorefrontConfig};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::CheckoutState;

/// What the checkout page renders at each step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub step: CheckoutStep,
    pub shipping: ShippingDetails,
    pub summary: OrderSummary,
    pub card_last_four: Option<String>,
}

impl From<&CheckoutFlow> for CheckoutResponse {
    fn from(flow: &CheckoutFlow) -> Self {
        CheckoutResponse {
            step: flow.step(),
            shipping: flow.shipping().clone(),
            summary: flow.summary(),
            card_last_four: flow.card_last_four(),
        }
    }
}

/// Starts checkout, prefilling shipping from the logged-in user.
pub fn begin_checkout(
    checkout: &CheckoutState,
    cart: &Arc<CartStore>,
    auth: &AuthStore,
    config: &StorefrontConfig,
) -> ApiResult<CheckoutResponse> {
    debug!("begin_checkout command");

    let user = auth.current_user();
    let flow = CheckoutFlow::begin(Arc::clone(cart), config.pricing_rules(), user.as_ref())?;
    let response = CheckoutResponse::from(&flow);
    checkout.replace(flow);

    Ok(response)
}

pub fn submit_shipping(
    checkout: &CheckoutState,
    details: ShippingDetails,
) -> ApiResult<CheckoutResponse> {
    debug!("submit_shipping command");
    checkout.with_flow(|flow| {
        flow.submit_shipping(details)?;
        Ok(CheckoutResponse::from(&*flow))
    })
}

pub fn submit_payment(
    checkout: &CheckoutState,
    details: PaymentDetails,
) -> ApiResult<CheckoutResponse> {
    debug!(card = ?details, "submit_payment command");
    checkout.with_flow(|flow| {
        flow.submit_payment(details)?;
        Ok(CheckoutResponse::from(&*flow))
    })
}

pub fn checkout_back(checkout: &CheckoutState) -> ApiResult<CheckoutResponse> {
    debug!("checkout_back command");
    checkout.with_flow(|flow| {
        flow.back();
        Ok(CheckoutResponse::from(&*flow))
    })
}

/// Places the order. The flow is finished afterwards.
pub fn place_order(checkout: &CheckoutState) -> ApiResult<OrderConfirmation> {
    debug!("place_order command");
    let order = checkout.with_flow(|flow| Ok(flow.place_order()?))?;
    checkout.cancel();

    info!(order_number = %order.order_number, "Order confirmation shown");
    Ok(order)
}

pub fn cancel_checkout(checkout: &CheckoutState) -> bool {
    debug!("cancel_checkout command");
    checkout.cancel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use jewelar_store::demo_products;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            country: "India".to_string(),
            phone: "+91 98450 00000".to_string(),
        }
    }

    fn payment() -> PaymentDetails {
        PaymentDetails {
            card_name: "Asha Rao".to_string(),
            card_number: "5555 5555 5555 4444".to_string(),
            expiry_date: "11/29".to_string(),
            cvv: "321".to_string(),
        }
    }

    fn setup() -> (CheckoutState, Arc<CartStore>, AuthStore, StorefrontConfig) {
        let config = StorefrontConfig::default();
        let auth = AuthStore::from_config(&config.auth.users).unwrap();
        (CheckoutState::new(), Arc::new(CartStore::new()), auth, config)
    }

    #[test]
    fn test_checkout_end_to_end() {
        let (checkout, cart, auth, config) = setup();
        cart.add_to_cart(&demo_products()[7], 2).unwrap();
        auth.login("demo@jewelar.com", "tryon-demo").unwrap();

        let response = begin_checkout(&checkout, &cart, &auth, &config).unwrap();
        assert_eq!(response.step, CheckoutStep::Shipping);
        assert_eq!(response.shipping.full_name, "Demo Shopper");
        assert_eq!(response.summary.subtotal.paise(), 10000);

        assert_eq!(
            submit_shipping(&checkout, shipping()).unwrap().step,
            CheckoutStep::Payment
        );
        let review = submit_payment(&checkout, payment()).unwrap();
        assert_eq!(review.step, CheckoutStep::Review);
        assert_eq!(review.card_last_four.as_deref(), Some("4444"));

        let order = place_order(&checkout).unwrap();
        assert_eq!(order.summary.total.paise(), 10000 + 2000 + 1800);
        assert!(cart.is_empty());
        assert!(!checkout.is_active());
    }

    #[test]
    fn test_empty_cart_is_refused() {
        let (checkout, cart, auth, config) = setup();
        let err = begin_checkout(&checkout, &cart, &auth, &config).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
        assert!(!checkout.is_active());
    }

    #[test]
    fn test_commands_need_started_checkout() {
        let (checkout, ..) = setup();
        let err = submit_shipping(&checkout, shipping()).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_out_of_order_step_is_business_error() {
        let (checkout, cart, auth, config) = setup();
        cart.add_to_cart(&demo_products()[0], 1).unwrap();
        begin_checkout(&checkout, &cart, &auth, &config).unwrap();

        let err = place_order(&checkout).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(checkout.is_active());

        let mut bad = shipping();
        bad.email = "nope".to_string();
        let err = submit_shipping(&checkout, bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        submit_shipping(&checkout, shipping()).unwrap();
        assert_eq!(checkout_back(&checkout).unwrap().step, CheckoutStep::Shipping);
    }
}
