//! # JewelAR Storefront Entry Point
//!
//! The actual setup is in lib.rs so it can be tested.

#[tokio::main]
async fn main() {
    if let Err(e) = jewelar_storefront_lib::run().await {
        tracing::error!(code = ?e.code, "Storefront exited: {}", e.message);
        std::process::exit(1);
    }
}
