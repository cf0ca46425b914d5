//! # JewelAR Storefront Library
//!
//! The application layer: wires config, stores and the try-on camera, and
//! exposes the commands the pages call.
//!
//! ## Module Organization
//! ```text
//! jewelar_storefront_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/          ◄─── Storefront, CheckoutState, TryOnState
//! ├── commands/       ◄─── product, cart, auth, checkout, tryon
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use jewelar_store::StorefrontConfig;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::{ApiError, ApiResult};
use crate::state::Storefront;

/// Runs the storefront.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging                                                  │
/// │     • tracing-subscriber with env filter, RUST_LOG overrides            │
/// │                                                                         │
/// │  2. Load Config                                                         │
/// │     • JEWELAR_CONFIG path, else platform config dir                     │
/// │     • JEWELAR_* env overrides, defaults on any error                    │
/// │                                                                         │
/// │  3. Initialize State                                                    │
/// │     • demo users hashed, catalog fetched                                │
/// │                                                                         │
/// │  4. Demo Walkthrough                                                    │
/// │     • try on a piece, save the snapshot, add it to the cart             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ApiResult<()> {
    init_tracing();

    info!("Starting JewelAR storefront");

    let config_path = std::env::var_os("JEWELAR_CONFIG").map(PathBuf::from);
    let config = StorefrontConfig::load_or_default(config_path);

    let storefront = Storefront::new(config)?;
    let count = commands::product::fetch_products(&storefront.catalog).await?;
    info!(products = count, "Catalog ready");

    walkthrough(&storefront).await
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=jewelar_tryon=trace` - Trace the camera session only
/// - Default: INFO, debug for the jewelar crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jewelar=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// One shopper's visit: browse try-on pieces, try the first one on, save
/// the picture and add the piece to the cart.
async fn walkthrough(storefront: &Storefront) -> ApiResult<()> {
    use commands::{cart, product, tryon};

    let pieces = product::get_try_on_products(&storefront.catalog, &storefront.config);
    print_json("Try-on collection", &pieces)?;

    let Some(first) = pieces.first() else {
        warn!("No try-on products in the catalog");
        return Ok(());
    };
    let product_id = first.product.id.clone();

    let page = tryon::open_try_on(&storefront.tryon, &storefront.catalog, &product_id)?;
    print_json("Try-on page", &page)?;

    let status = tryon::start_camera(&storefront.tryon).await?;
    print_json("Camera", &status)?;

    let snapshot = tryon::capture_snapshot(&storefront.tryon)?;
    print_json("Snapshot", &snapshot)?;

    let saved = tryon::download_snapshot(&storefront.tryon, &storefront.config).await?;
    print_json("Saved", &saved)?;

    tryon::close_try_on(&storefront.tryon);

    let cart = cart::add_to_cart(
        &storefront.catalog,
        &storefront.cart,
        &storefront.config,
        &product_id,
        None,
    )?;
    print_json("Cart", &cart)?;

    Ok(())
}

fn print_json<T: Serialize>(title: &str, value: &T) -> ApiResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Failed to render {}: {}", title, e)))?;
    println!("== {} ==\n{}", title, json);
    Ok(())
}
