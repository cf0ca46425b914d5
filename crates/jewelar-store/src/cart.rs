//! # Cart Store
//!
//! The shopping bag shown in the header badge, on the cart page, and on the
//! checkout review step.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Page Action              Store Call              Event                 │
//! │  ───────────              ──────────              ─────                 │
//! │  "Add to Cart"  ────────► add_to_cart()  ───────► ItemAdded             │
//! │  Quantity +/-   ────────► update_quantity() ────► QuantityUpdated       │
//! │  Quantity 0     ────────► update_quantity() ────► ItemRemoved           │
//! │  Remove         ────────► remove_from_cart() ───► ItemRemoved           │
//! │  Order placed   ────────► clear_cart()  ────────► Cleared               │
//! │                                                                         │
//! │  Reads (totals, lines) take the lock briefly and never emit.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use jewelar_core::pricing::{OrderSummary, PricingRules};
use jewelar_core::validation::{validate_cart_size, validate_quantity};
use jewelar_core::{CoreError, CoreResult, Money, Product, MAX_CART_LINES, MAX_ITEM_QUANTITY};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::debug;

const EVENT_CAPACITY: usize = 64;

/// A product in the cart.
///
/// Name, price and image are copied when the line is created so the cart
/// keeps displaying what the shopper added. Stock is refreshed on every add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    /// Price in paise at time of adding.
    #[serde(rename = "price")]
    pub unit_price_paise: i64,
    pub quantity: i64,
    /// First gallery image of the product.
    pub image_url: Option<String>,
    /// Stock on hand when the product was last added.
    pub stock_quantity: i64,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_paise: product.price_paise,
            quantity,
            image_url: product.primary_image().map(str::to_string),
            stock_quantity: product.stock_quantity,
            added_at: Utc::now(),
        }
    }

    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    pub fn can_hold(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

/// The cart contents.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding again increases quantity)
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_LINES` lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds `quantity` of `product`, merging with an existing line.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<i64> {
        validate_quantity(quantity)?;

        let existing = self.quantity_of(&product.id);
        let new_qty = existing + quantity;
        if new_qty > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_ITEM_QUANTITY,
            });
        }
        if !product.can_sell(new_qty) {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock_quantity,
                requested: new_qty,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => {
                line.quantity = new_qty;
                line.stock_quantity = product.stock_quantity;
            }
            None => {
                validate_cart_size(self.lines.len())
                    .map_err(|_| CoreError::CartTooLarge { max: MAX_CART_LINES })?;
                self.lines.push(CartLine::from_product(product, quantity));
            }
        }

        Ok(new_qty)
    }

    /// Sets a line's quantity. Zero removes the line.
    ///
    /// The quantity is checked against the stock recorded on the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::NotInCart(product_id.to_string()))?;

        if !line.can_hold(quantity) {
            return Err(CoreError::InsufficientStock {
                product: line.name.clone(),
                available: line.stock_quantity,
                requested: quantity,
            });
        }

        line.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total pieces (the header badge number).
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ unit price × quantity.
    pub fn total_price(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn summary(&self, rules: &PricingRules) -> OrderSummary {
        OrderSummary::calculate(self.total_price(), self.line_count(), rules)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart totals for the header and cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: i64,
    pub total_price: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.item_count(),
            total_price: cart.total_price(),
        }
    }
}

/// Cart change notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartEvent {
    #[serde(rename_all = "camelCase")]
    ItemAdded { product_id: String, quantity: i64 },
    #[serde(rename_all = "camelCase")]
    QuantityUpdated { product_id: String, quantity: i64 },
    #[serde(rename_all = "camelCase")]
    ItemRemoved { product_id: String },
    Cleared,
}

/// Shared cart.
#[derive(Debug)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
    events: broadcast::Sender<CartEvent>,
}

impl CartStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        CartStore {
            cart: Arc::new(Mutex::new(Cart::new())),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.lock();
        f(&cart)
    }

    /// Write access to the cart. Callers are responsible for emitting.
    fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.lock();
        f(&mut cart)
    }

    /// Adds a product. Returns the line's new quantity.
    pub fn add_to_cart(&self, product: &Product, quantity: i64) -> CoreResult<i64> {
        let new_qty = self.with_cart_mut(|cart| cart.add_item(product, quantity))?;
        debug!(product_id = %product.id, quantity, line_quantity = new_qty, "Added to cart");
        self.emit(CartEvent::ItemAdded {
            product_id: product.id.clone(),
            quantity,
        });
        Ok(new_qty)
    }

    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> CoreResult<()> {
        self.with_cart_mut(|cart| cart.update_quantity(product_id, quantity))?;
        debug!(%product_id, quantity, "Cart quantity updated");
        self.emit(if quantity == 0 {
            CartEvent::ItemRemoved {
                product_id: product_id.to_string(),
            }
        } else {
            CartEvent::QuantityUpdated {
                product_id: product_id.to_string(),
                quantity,
            }
        });
        Ok(())
    }

    pub fn remove_from_cart(&self, product_id: &str) -> CoreResult<()> {
        self.with_cart_mut(|cart| cart.remove_item(product_id))?;
        debug!(%product_id, "Removed from cart");
        self.emit(CartEvent::ItemRemoved {
            product_id: product_id.to_string(),
        });
        Ok(())
    }

    pub fn clear_cart(&self) {
        self.with_cart_mut(Cart::clear);
        debug!("Cart cleared");
        self.emit(CartEvent::Cleared);
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.with_cart(|cart| cart.lines.clone())
    }

    pub fn totals(&self) -> CartTotals {
        self.with_cart(|cart| CartTotals::from(cart))
    }

    pub fn total_price(&self) -> Money {
        self.with_cart(Cart::total_price)
    }

    pub fn item_count(&self) -> i64 {
        self.with_cart(Cart::item_count)
    }

    pub fn is_empty(&self) -> bool {
        self.with_cart(Cart::is_empty)
    }

    pub fn summary(&self, rules: &PricingRules) -> OrderSummary {
        self.with_cart(|cart| cart.summary(rules))
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: CartEvent) {
        let _ = self.events.send(event);
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_products;
    use tokio::sync::broadcast::error::TryRecvError;

    fn product(id: &str) -> Product {
        demo_products()
            .into_iter()
            .find(|p| p.id == id)
            .unwrap()
    }

    #[test]
    fn test_add_merges_by_product() {
        let mut cart = Cart::new();
        let studs = product("1");

        cart.add_item(&studs, 1).unwrap();
        assert_eq!(cart.add_item(&studs, 2).unwrap(), 3);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total_price().paise(), 45000);
        assert_eq!(
            cart.lines[0].image_url.as_deref(),
            Some("https://images.pexels.com/photos/10909386/pexels-photo-10909386.jpeg")
        );
    }

    #[test]
    fn test_add_respects_stock() {
        let mut cart = Cart::new();
        let ruby = product("6"); // 2 in stock

        cart.add_item(&ruby, 2).unwrap();
        assert!(matches!(
            cart.add_item(&ruby, 1),
            Err(CoreError::InsufficientStock { available: 2, requested: 3, .. })
        ));
        assert_eq!(cart.quantity_of("6"), 2);
    }

    #[test]
    fn test_update_respects_stock() {
        let mut cart = Cart::new();
        let ruby = product("6"); // 2 in stock
        cart.add_item(&ruby, 1).unwrap();

        assert!(matches!(
            cart.update_quantity("6", 500),
            Err(CoreError::InsufficientStock { available: 2, requested: 500, .. })
        ));
        assert_eq!(cart.quantity_of("6"), 1);

        cart.update_quantity("6", 2).unwrap();
        assert_eq!(cart.quantity_of("6"), 2);
    }

    #[test]
    fn test_store_update_over_stock_emits_nothing() {
        let store = CartStore::new();
        store.add_to_cart(&product("6"), 1).unwrap();
        let mut events = store.subscribe();

        assert!(store.update_quantity("6", 3).is_err());
        assert_eq!(store.item_count(), 1);
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_add_rejects_non_positive() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_item(&product("1"), 0),
            Err(CoreError::Validation(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        let studs = product("1");
        let stud = product("8");
        cart.add_item(&studs, 1).unwrap();
        cart.add_item(&stud, 1).unwrap();

        cart.update_quantity("1", 4).unwrap();
        assert_eq!(cart.quantity_of("1"), 4);

        cart.update_quantity("8", 0).unwrap();
        assert_eq!(cart.line_count(), 1);

        assert!(matches!(
            cart.update_quantity("1", 1000),
            Err(CoreError::QuantityTooLarge { requested: 1000, max: 999 })
        ));
        assert!(cart.update_quantity("1", -2).is_err());
        assert!(matches!(
            cart.update_quantity("3", 1),
            Err(CoreError::NotInCart(id)) if id == "3"
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_item(&product("2"), 1).unwrap();

        assert!(cart.remove_item("9").is_err());
        cart.remove_item("2").unwrap();
        assert!(cart.is_empty());

        cart.add_item(&product("2"), 1).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_summary_matches_cart_page() {
        let mut cart = Cart::new();
        cart.add_item(&product("1"), 1).unwrap();
        cart.add_item(&product("2"), 1).unwrap();

        let summary = cart.summary(&PricingRules::default());
        assert_eq!(summary.subtotal.paise(), 37000);
        assert_eq!(summary.shipping.paise(), 2000);
        assert_eq!(summary.tax.paise(), 6660);
        assert_eq!(summary.total.paise(), 45660);
    }

    #[test]
    fn test_store_emits_events() {
        let store = CartStore::new();
        let mut events = store.subscribe();

        store.add_to_cart(&product("4"), 2).unwrap();
        store.update_quantity("4", 1).unwrap();
        store.remove_from_cart("4").unwrap();
        store.clear_cart();

        assert_eq!(
            events.try_recv().unwrap(),
            CartEvent::ItemAdded { product_id: "4".to_string(), quantity: 2 }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            CartEvent::QuantityUpdated { product_id: "4".to_string(), quantity: 1 }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            CartEvent::ItemRemoved { product_id: "4".to_string() }
        );
        assert_eq!(events.try_recv().unwrap(), CartEvent::Cleared);
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_failed_mutation_emits_nothing() {
        let store = CartStore::new();
        let mut events = store.subscribe();

        assert!(store.remove_from_cart("1").is_err());
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_store_totals() {
        let store = CartStore::new();
        store.add_to_cart(&product("8"), 3).unwrap();

        let totals = store.totals();
        assert_eq!(totals.line_count, 1);
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.total_price.paise(), 15000);
        assert_eq!(store.item_count(), 3);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_line_serializes_frontend_shape() {
        let line = CartLine::from_product(&product("8"), 1);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["productId"], "8");
        assert_eq!(json["price"], 5000);
        assert_eq!(json["quantity"], 1);
        assert_eq!(json["stockQuantity"], 15);
    }
}
