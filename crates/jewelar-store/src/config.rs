//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     JEWELAR_STORE_NAME="JewelAR Mumbai"                                │
//! │     JEWELAR_CAMERA_FACING=environment                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.jewelar.storefront/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     ₹, 18% GST, ₹20 shipping, front camera at 1280x720                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "JewelAR"
//! currency_symbol = "₹"
//! locale = "en-IN"
//!
//! [pricing]
//! tax_bps = 1800
//! flat_shipping_paise = 2000
//! default_max_price_paise = 100000
//!
//! [camera]
//! facing = "user"
//! ideal_width = 1280
//! ideal_height = 720
//!
//! [downloads]
//! directory = "/home/asha/Downloads"
//!
//! [[auth.users]]
//! email = "demo@jewelar.com"
//! password = "tryon-demo"
//! full_name = "Demo Shopper"
//! ```

use jewelar_core::money::Money;
use jewelar_core::pricing::PricingRules;
use jewelar_core::types::TaxRate;
use jewelar_core::{DEFAULT_MAX_PRICE_PAISE, DEFAULT_TAX_RATE_BPS, FLAT_SHIPPING_PAISE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// Grouping the price formatter implements.
pub const SUPPORTED_LOCALE: &str = "en-IN";

const CAMERA_FACINGS: [&str; 2] = ["user", "environment"];

// =============================================================================
// Store Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Digit grouping for prices. Only `en-IN` (12,34,567) is implemented.
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_store_name() -> String {
    "JewelAR".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_locale() -> String {
    SUPPORTED_LOCALE.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
            locale: default_locale(),
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Amounts are in paise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSettings {
    /// GST in basis points.
    #[serde(default = "default_tax_bps")]
    pub tax_bps: u32,

    #[serde(default = "default_flat_shipping")]
    pub flat_shipping_paise: i64,

    /// Upper bound of the products-page price filter.
    #[serde(default = "default_max_price")]
    pub default_max_price_paise: i64,
}

fn default_tax_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

fn default_flat_shipping() -> i64 {
    FLAT_SHIPPING_PAISE
}

fn default_max_price() -> i64 {
    DEFAULT_MAX_PRICE_PAISE
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tax_bps: default_tax_bps(),
            flat_shipping_paise: default_flat_shipping(),
            default_max_price_paise: default_max_price(),
        }
    }
}

// =============================================================================
// Camera Settings
// =============================================================================

/// Constraints the try-on page asks the camera for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// `user` (front) or `environment` (rear).
    #[serde(default = "default_facing")]
    pub facing: String,

    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,

    /// Resolution the built-in synthetic camera grants. Real devices pick
    /// their own.
    #[serde(default = "default_synthetic_width")]
    pub synthetic_width: u32,

    #[serde(default = "default_synthetic_height")]
    pub synthetic_height: u32,
}

fn default_facing() -> String {
    "user".to_string()
}

fn default_ideal_width() -> u32 {
    1280
}

fn default_ideal_height() -> u32 {
    720
}

fn default_synthetic_width() -> u32 {
    640
}

fn default_synthetic_height() -> u32 {
    480
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            facing: default_facing(),
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            synthetic_width: default_synthetic_width(),
            synthetic_height: default_synthetic_height(),
        }
    }
}

// =============================================================================
// Download Settings
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Where saved try-on snapshots go. Falls back to the platform
    /// download folder, then the working directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl DownloadSettings {
    pub fn resolve_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(|| directories::UserDirs::new().and_then(|d| d.download_dir().map(PathBuf::from)))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// =============================================================================
// Auth Settings
// =============================================================================

/// One entry of the demo user directory.
///
/// Give either `password` (hashed at startup) or a precomputed argon2
/// `password_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoUserConfig {
    #[serde(default)]
    pub id: Option<String>,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_users")]
    pub users: Vec<DemoUserConfig>,
}

fn default_users() -> Vec<DemoUserConfig> {
    vec![DemoUserConfig {
        id: Some("demo-user".to_string()),
        email: "demo@jewelar.com".to_string(),
        password: Some("tryon-demo".to_string()),
        password_hash: None,
        full_name: "Demo Shopper".to_string(),
        phone: "+91 98765 43210".to_string(),
        address: "221 Linking Road, Bandra West, Mumbai".to_string(),
    }]
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            users: default_users(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub camera: CameraSettings,

    #[serde(default)]
    pub downloads: DownloadSettings,

    #[serde(default)]
    pub auth: AuthSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(StoreError::InvalidConfig("store name must not be empty".into()));
        }

        if self.store.locale != SUPPORTED_LOCALE {
            return Err(StoreError::InvalidConfig(format!(
                "Unsupported locale '{}'. Only {} grouping is implemented",
                self.store.locale, SUPPORTED_LOCALE
            )));
        }

        if self.pricing.tax_bps > 10_000 {
            return Err(StoreError::InvalidConfig(
                "tax_bps must be between 0 and 10000".into(),
            ));
        }

        if self.pricing.flat_shipping_paise < 0 || self.pricing.default_max_price_paise < 0 {
            return Err(StoreError::InvalidConfig(
                "pricing amounts must not be negative".into(),
            ));
        }

        if !CAMERA_FACINGS.contains(&self.camera.facing.as_str()) {
            return Err(StoreError::InvalidConfig(format!(
                "Unknown camera facing: '{}'. Valid options: user, environment",
                self.camera.facing
            )));
        }

        let camera = &self.camera;
        if camera.ideal_width == 0
            || camera.ideal_height == 0
            || camera.synthetic_width == 0
            || camera.synthetic_height == 0
        {
            return Err(StoreError::InvalidConfig(
                "camera dimensions must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("JEWELAR_STORE_NAME") {
            debug!(name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Ok(symbol) = std::env::var("JEWELAR_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        if let Ok(bps) = std::env::var("JEWELAR_TAX_BPS") {
            match bps.parse::<u32>() {
                Ok(b) => {
                    debug!(tax_bps = b, "Overriding tax rate from environment");
                    self.pricing.tax_bps = b;
                }
                Err(_) => warn!(value = %bps, "Ignoring non-numeric JEWELAR_TAX_BPS"),
            }
        }

        if let Ok(shipping) = std::env::var("JEWELAR_SHIPPING_PAISE") {
            if let Ok(s) = shipping.parse::<i64>() {
                self.pricing.flat_shipping_paise = s;
            }
        }

        if let Ok(facing) = std::env::var("JEWELAR_CAMERA_FACING") {
            debug!(facing = %facing, "Overriding camera facing from environment");
            self.camera.facing = facing.to_lowercase();
        }

        if let Ok(dir) = std::env::var("JEWELAR_DOWNLOAD_DIR") {
            debug!(dir = %dir, "Overriding download directory from environment");
            self.downloads.directory = Some(PathBuf::from(dir));
        }
    }

    /// `<platform config dir>/storefront.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "jewelar", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn pricing_rules(&self) -> PricingRules {
        PricingRules {
            tax_rate: TaxRate::from_bps(self.pricing.tax_bps),
            flat_shipping: Money::from_paise(self.pricing.flat_shipping_paise),
        }
    }

    /// Formats an amount with the configured currency symbol.
    pub fn format_price(&self, amount: Money) -> String {
        amount.format_with(&self.store.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.store.name, "JewelAR");
        assert_eq!(config.camera.facing, "user");
        assert_eq!((config.camera.ideal_width, config.camera.ideal_height), (1280, 720));
        assert_eq!(config.pricing_rules(), PricingRules::default());
        assert_eq!(config.auth.users.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();

        config.camera.facing = "sideways".to_string();
        assert!(config.validate().is_err());

        config.camera.facing = "environment".to_string();
        assert!(config.validate().is_ok());

        config.camera.ideal_height = 0;
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.pricing.tax_bps = 12_000;
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.store.locale = "en-US".to_string();
        assert!(matches!(config.validate(), Err(StoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
            [store]
            name = "JewelAR Pune"

            [pricing]
            tax_bps = 300

            [[auth.users]]
            email = "ravi@example.com"
            password = "gold"
            full_name = "Ravi"
        "#;

        let config: StorefrontConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.name, "JewelAR Pune");
        assert_eq!(config.store.currency_symbol, "₹");
        assert_eq!(config.pricing.tax_bps, 300);
        assert_eq!(config.pricing.flat_shipping_paise, 2000);
        assert_eq!(config.camera.synthetic_width, 640);
        assert_eq!(config.auth.users[0].email, "ravi@example.com");
        assert!(config.auth.users[0].id.is_none());
    }

    #[test]
    fn test_toml_serialization() {
        let config = StorefrontConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[camera]"));

        let parsed: StorefrontConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.pricing.tax_bps, config.pricing.tax_bps);
        assert_eq!(parsed.auth.users[0].email, "demo@jewelar.com");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storefront.toml");

        let mut config = StorefrontConfig::default();
        config.store.name = "JewelAR Jaipur".to_string();
        config.camera.facing = "environment".to_string();
        config.save(Some(path.clone())).unwrap();

        let loaded = StorefrontConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.store.name, "JewelAR Jaipur");
        assert_eq!(loaded.camera.facing, "environment");
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[camera]\nfacing = \"sideways\"\n").unwrap();

        assert!(StorefrontConfig::load(Some(path.clone())).is_err());
        let config = StorefrontConfig::load_or_default(Some(path));
        assert_eq!(config.camera.facing, "user");
    }

    #[test]
    fn test_format_price_uses_symbol() {
        let mut config = StorefrontConfig::default();
        assert_eq!(config.format_price(Money::from_paise(4_500_000)), "₹45,000");

        config.store.currency_symbol = "Rs ".to_string();
        assert_eq!(config.format_price(Money::from_paise(15000)), "Rs 150");
    }

    #[test]
    fn test_download_directory_override() {
        let downloads = DownloadSettings {
            directory: Some(PathBuf::from("/tmp/tryon")),
        };
        assert_eq!(downloads.resolve_directory(), PathBuf::from("/tmp/tryon"));
    }
}
