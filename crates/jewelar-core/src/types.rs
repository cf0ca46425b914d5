//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      User       │   │  CheckoutStep   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id (UUID)      │   │  Shipping       │       │
//! │  │  category       │   │  email          │   │  Payment        │       │
//! │  │  material       │   │  full_name      │   │  Review         │       │
//! │  │  price (paise)  │   │  phone, address │   └─────────────────┘       │
//! │  │  try_on_zone    │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ShippingDetails  │   │ PaymentDetails  │   │    TaxRate      │       │
//! │  │ address form    │   │ card form only, │   │  1800 = 18%     │       │
//! │  │                 │   │ never charged   │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize in camelCase so the web frontend keeps its
//! existing shapes (`imageUrls`, `tryOnEnabled`, `tryOnType`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (1800 bps = 18%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage.
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Product Enumerations
// =============================================================================

/// Jewelry category, as used in catalog filters and URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    Rings,
    Necklaces,
    Earrings,
    Bracelets,
    NoseRings,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Rings,
        ProductCategory::Necklaces,
        ProductCategory::Earrings,
        ProductCategory::Bracelets,
        ProductCategory::NoseRings,
    ];

    /// URL / filter slug.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Rings => "rings",
            ProductCategory::Necklaces => "necklaces",
            ProductCategory::Earrings => "earrings",
            ProductCategory::Bracelets => "bracelets",
            ProductCategory::NoseRings => "nose-rings",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: ProductCategory::ALL.iter().map(|c| c.to_string()).collect(),
            })
    }
}

/// Metal the piece is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ProductMaterial {
    Gold,
    Silver,
    Platinum,
    WhiteGold,
    RoseGold,
}

impl ProductMaterial {
    pub const ALL: [ProductMaterial; 5] = [
        ProductMaterial::Gold,
        ProductMaterial::Silver,
        ProductMaterial::Platinum,
        ProductMaterial::WhiteGold,
        ProductMaterial::RoseGold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductMaterial::Gold => "gold",
            ProductMaterial::Silver => "silver",
            ProductMaterial::Platinum => "platinum",
            ProductMaterial::WhiteGold => "white-gold",
            ProductMaterial::RoseGold => "rose-gold",
        }
    }
}

impl fmt::Display for ProductMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductMaterial {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductMaterial::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "material".to_string(),
                allowed: ProductMaterial::ALL.iter().map(|m| m.to_string()).collect(),
            })
    }
}

/// Body zone a try-on-capable piece is worn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TryOnZone {
    Ears,
    Neck,
    Nose,
}

impl TryOnZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            TryOnZone::Ears => "ears",
            TryOnZone::Neck => "neck",
            TryOnZone::Nose => "nose",
        }
    }
}

impl fmt::Display for TryOnZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement hints for a 3D model. Carried on the product record but never
/// applied: the try-on overlay is not implemented.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PositioningData {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation: f64,
}

// =============================================================================
// Product
// =============================================================================

/// A piece of jewelry in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    pub description: String,

    /// Price in paise.
    #[serde(rename = "price")]
    pub price_paise: i64,

    pub category: ProductCategory,

    pub material: ProductMaterial,

    /// Free-form size ("5mm", "18 inches", "Medium").
    pub size: String,

    pub stock_quantity: i64,

    /// Gallery images, first one is the primary image.
    pub image_urls: Vec<String>,

    #[serde(rename = "model3dUrl")]
    pub model_3d_url: String,

    /// Whether the try-on page is offered for this product.
    pub try_on_enabled: bool,

    /// Where the piece is worn, `None` for non try-on products.
    #[serde(rename = "tryOnType")]
    pub try_on_zone: Option<TryOnZone>,

    pub model_scale: f64,

    pub positioning_data: Option<PositioningData>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    /// First gallery image, used for cart lines and thumbnails.
    pub fn primary_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    /// Whether the product can be opened on the try-on page.
    pub fn supports_try_on(&self) -> bool {
        self.try_on_enabled && self.try_on_zone.is_some()
    }

    /// Checks if `quantity` units can be sold from current stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// User
// =============================================================================

/// The logged-in shopper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub address: String,
}

/// Editable profile fields. Email is the login key and is not editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub phone: String,
    pub address: String,
}

// =============================================================================
// Checkout
// =============================================================================

/// The checkout wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Review,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutStep::Shipping => write!(f, "shipping"),
            CheckoutStep::Payment => write!(f, "payment"),
            CheckoutStep::Review => write!(f, "review"),
        }
    }
}

/// Shipping form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

impl Default for ShippingDetails {
    fn default() -> Self {
        ShippingDetails {
            full_name: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: crate::SUPPORTED_COUNTRIES[0].to_string(),
            phone: String::new(),
        }
    }
}

impl ShippingDetails {
    /// Prefills name, email, address and phone from the logged-in user.
    pub fn prefilled_from(user: &User) -> Self {
        ShippingDetails {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            address: user.address.clone(),
            phone: user.phone.clone(),
            ..ShippingDetails::default()
        }
    }
}

/// Card form. Validated for shape only; nothing is ever charged.
#[derive(Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub card_name: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl PaymentDetails {
    /// Last four digits of the card number, shown on the review step.
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
        let start = digits.len().saturating_sub(4);
        digits[start..].iter().collect()
    }
}

// Card number and CVV stay out of logs.
impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_name", &self.card_name)
            .field("card_number", &format_args!("**** {}", self.last_four()))
            .field("expiry_date", &self.expiry_date)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn nose_stud() -> Product {
        Product {
            id: "8".to_string(),
            name: "Diamond Nose Stud".to_string(),
            description: "Delicate diamond nose stud".to_string(),
            price_paise: 5000,
            category: ProductCategory::NoseRings,
            material: ProductMaterial::Gold,
            size: "2mm".to_string(),
            stock_quantity: 15,
            image_urls: vec!["a.jpeg".to_string(), "b.jpeg".to_string()],
            model_3d_url: "/models/nose-stud.glb".to_string(),
            try_on_enabled: true,
            try_on_zone: Some(TryOnZone::Nose),
            model_scale: 0.8,
            positioning_data: Some(PositioningData::default()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_tax_rate_default_is_gst() {
        let rate = TaxRate::default();
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
        assert_eq!(TaxRate::from_percentage(18.0), rate);
    }

    #[test]
    fn test_category_round_trips_through_slug() {
        for category in ProductCategory::ALL {
            assert_eq!(category.as_str().parse::<ProductCategory>().unwrap(), category);
        }
        assert!("anklets".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_material_rejects_unknown() {
        assert_eq!("white-gold".parse::<ProductMaterial>().unwrap(), ProductMaterial::WhiteGold);
        assert!("brass".parse::<ProductMaterial>().is_err());
    }

    #[test]
    fn test_product_serializes_frontend_field_names() {
        let json = serde_json::to_value(nose_stud()).unwrap();
        assert_eq!(json["price"], 5000);
        assert_eq!(json["category"], "nose-rings");
        assert_eq!(json["tryOnType"], "nose");
        assert_eq!(json["tryOnEnabled"], true);
        assert_eq!(json["model3dUrl"], "/models/nose-stud.glb");
        assert!(json["imageUrls"].is_array());
    }

    #[test]
    fn test_product_helpers() {
        let mut product = nose_stud();
        assert_eq!(product.primary_image(), Some("a.jpeg"));
        assert!(product.supports_try_on());
        assert!(product.can_sell(15));
        assert!(!product.can_sell(16));

        product.try_on_zone = None;
        assert!(!product.supports_try_on());
    }

    #[test]
    fn test_payment_details_masks_card() {
        let payment = PaymentDetails {
            card_name: "A Shopper".to_string(),
            card_number: "4111 1111 1111 1234".to_string(),
            expiry_date: "12/29".to_string(),
            cvv: "123".to_string(),
        };
        assert_eq!(payment.last_four(), "1234");

        let debug = format!("{:?}", payment);
        assert!(debug.contains("**** 1234"));
        assert!(!debug.contains("4111"));
        assert!(!debug.contains("123\""));
    }

    #[test]
    fn test_checkout_step_default() {
        assert_eq!(CheckoutStep::default(), CheckoutStep::Shipping);
        assert_eq!(CheckoutStep::Review.to_string(), "review");
    }
}
