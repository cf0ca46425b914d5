//! Jewelry overlay.
//!
//! Products carry a 3D model URL, a scale and placement hints, but nothing
//! composites them onto the camera feed: there is no landmark detection and
//! no 3D renderer. The capture is the raw camera picture. This module makes
//! that explicit so callers can branch on it instead of assuming an overlay.

use jewelar_core::types::{PositioningData, Product, TryOnZone};
use serde::Serialize;

/// What the try-on view can draw over the camera feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OverlaySupport {
    /// Nothing is drawn. The model data is reported for reference only.
    #[serde(rename_all = "camelCase")]
    NotImplemented {
        zone: TryOnZone,
        model_url: String,
        model_scale: f64,
        positioning: Option<PositioningData>,
    },
}

impl OverlaySupport {
    pub fn for_product(product: &Product, zone: TryOnZone) -> Self {
        OverlaySupport::NotImplemented {
            zone,
            model_url: product.model_3d_url.clone(),
            model_scale: product.model_scale,
            positioning: product.positioning_data,
        }
    }

    /// Whether anything is composited onto captured frames.
    pub fn is_available(&self) -> bool {
        match self {
            OverlaySupport::NotImplemented { .. } => false,
        }
    }
}

/// Caption drawn in the corner of the live preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayLabel {
    pub title: String,
    pub subtitle: String,
}

impl OverlayLabel {
    /// Product name over "<zone> jewelry", e.g. "ears jewelry".
    pub fn new(product: &Product, zone: TryOnZone) -> Self {
        OverlayLabel {
            title: product.name.clone(),
            subtitle: format!("{} jewelry", zone),
        }
    }
}
