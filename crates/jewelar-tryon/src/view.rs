//! # Try-On View
//!
//! The page-level adapter around [`CaptureSession`]. It is what the product
//! page mounts when the shopper presses "Try On".
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  mount(product)                                                         │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  start() ──► new CaptureSession ──► open()                              │
//! │                   │                   ├── Live ──► capture ◄─► reset    │
//! │                   │                   │              └──► download()    │
//! │                   │                   └── Denied ──► retry() = start()  │
//! │                   │                                                     │
//! │  unmount() / Drop ┴──► close()                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Starting again always closes the previous session first, so a view never
//! holds more than one open camera.

use jewelar_core::types::{Product, TryOnZone};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::device::{MediaHost, VideoConstraints};
use crate::error::{TryOnError, TryOnResult};
use crate::frame::Snapshot;
use crate::overlay::{OverlayLabel, OverlaySupport};
use crate::session::{CaptureSession, CaptureState, SessionStatus};
use crate::surface::PreviewSurface;

pub const PNG_CONTENT_TYPE: &str = "image/png";

/// A file the shopper can save.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadArtifact {
    pub filename: String,
    pub content_type: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl fmt::Debug for DownloadArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadArtifact")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// `jewelry-tryon-<slug>.png`, where the slug is the lowercased name with
/// each run of whitespace replaced by a hyphen.
pub fn download_filename(product_name: &str) -> String {
    let slug = product_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("jewelry-tryon-{}.png", slug)
}

/// Try-on page for one product.
pub struct TryOnView {
    product: Product,
    zone: TryOnZone,
    host: Arc<dyn MediaHost>,
    surface: Arc<dyn PreviewSurface>,
    constraints: VideoConstraints,
    current: Mutex<Option<Arc<CaptureSession>>>,
    mounted: AtomicBool,
}

impl TryOnView {
    /// Mounts the view. Fails for products without a try-on zone.
    pub fn mount(
        product: Product,
        host: Arc<dyn MediaHost>,
        surface: Arc<dyn PreviewSurface>,
        constraints: VideoConstraints,
    ) -> TryOnResult<Self> {
        let zone = match product.try_on_zone {
            Some(zone) if product.try_on_enabled => zone,
            _ => return Err(TryOnError::UnsupportedProduct(product.id.clone())),
        };

        debug!(product_id = %product.id, %zone, "Try-on view mounted");

        Ok(TryOnView {
            product,
            zone,
            host,
            surface,
            constraints,
            current: Mutex::new(None),
            mounted: AtomicBool::new(true),
        })
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Opens a fresh session, closing any previous one first.
    pub async fn start(&self) -> TryOnResult<CaptureState> {
        let session = {
            let mut slot = self.lock_slot();
            // unmount() clears the flag before taking the slot lock
            if !self.mounted.load(Ordering::SeqCst) {
                return Err(TryOnError::InvalidState {
                    operation: "start",
                    state: CaptureState::Released,
                });
            }
            if let Some(previous) = slot.take() {
                previous.close();
            }
            let session = Arc::new(CaptureSession::new(Arc::downgrade(&self.surface)));
            *slot = Some(Arc::clone(&session));
            session
        };

        info!(
            product_id = %self.product.id,
            session_id = %session.id(),
            "Starting try-on camera"
        );
        session.open(self.host.as_ref(), self.constraints).await
    }

    /// "Try Again" after a denial: a brand-new session.
    pub async fn retry(&self) -> TryOnResult<CaptureState> {
        debug!(product_id = %self.product.id, "Retrying camera access");
        self.start().await
    }

    pub fn capture(&self) -> TryOnResult<Snapshot> {
        self.session("capture")?.capture()
    }

    pub fn reset(&self) -> TryOnResult<()> {
        self.session("reset")?.reset()
    }

    /// The captured PNG with its download filename.
    pub fn download(&self) -> TryOnResult<DownloadArtifact> {
        let bytes = self.session("download")?.export()?;
        let filename = download_filename(&self.product.name);
        info!(product_id = %self.product.id, %filename, bytes = bytes.len(), "Snapshot ready for download");

        Ok(DownloadArtifact {
            filename,
            content_type: PNG_CONTENT_TYPE,
            bytes,
        })
    }

    pub fn state(&self) -> CaptureState {
        match self.lock_slot().as_ref() {
            Some(session) => session.state(),
            None if self.mounted.load(Ordering::SeqCst) => CaptureState::Initializing,
            None => CaptureState::Released,
        }
    }

    pub fn status(&self) -> Option<SessionStatus> {
        self.lock_slot().as_ref().map(|s| s.status())
    }

    /// Status updates for the current session. A retry starts a new
    /// session, so subscribe again after calling it.
    pub fn subscribe(&self) -> Option<watch::Receiver<SessionStatus>> {
        self.lock_slot().as_ref().map(|s| s.subscribe())
    }

    pub fn overlay_label(&self) -> OverlayLabel {
        OverlayLabel::new(&self.product, self.zone)
    }

    pub fn overlay_support(&self) -> OverlaySupport {
        OverlaySupport::for_product(&self.product, self.zone)
    }

    /// Closes the camera. The view cannot be started again afterwards.
    pub fn unmount(&self) {
        if !self.mounted.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(session) = self.lock_slot().as_ref() {
            session.close();
        }
        debug!(product_id = %self.product.id, "Try-on view unmounted");
    }

    fn session(&self, operation: &'static str) -> TryOnResult<Arc<CaptureSession>> {
        match self.lock_slot().as_ref() {
            Some(session) => Ok(Arc::clone(session)),
            None => Err(TryOnError::InvalidState {
                operation,
                state: self.state_without_session(),
            }),
        }
    }

    fn state_without_session(&self) -> CaptureState {
        if self.mounted.load(Ordering::SeqCst) {
            CaptureState::Initializing
        } else {
            CaptureState::Released
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Arc<CaptureSession>>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for TryOnView {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DenialReason;
    use crate::surface::MemorySurface;
    use crate::synthetic::SyntheticCamera;
    use chrono::Utc;
    use jewelar_core::types::{PositioningData, ProductCategory, ProductMaterial};

    fn pearl_drops() -> Product {
        Product {
            id: "4".to_string(),
            name: "Pearl Drop Earrings".to_string(),
            description: "Elegant freshwater pearl drop earrings with 14k gold detailing.".to_string(),
            price_paise: 12000,
            category: ProductCategory::Earrings,
            material: ProductMaterial::Gold,
            size: "8mm pearls".to_string(),
            stock_quantity: 8,
            image_urls: vec![],
            model_3d_url: "/models/pearl-earrings.glb".to_string(),
            try_on_enabled: true,
            try_on_zone: Some(TryOnZone::Ears),
            model_scale: 1.1,
            positioning_data: Some(PositioningData::default()),
            created_at: Utc::now(),
        }
    }

    fn mount(camera: Arc<SyntheticCamera>) -> (TryOnView, Arc<MemorySurface>) {
        let surface = Arc::new(MemorySurface::new());
        let view = TryOnView::mount(
            pearl_drops(),
            camera,
            surface.clone(),
            VideoConstraints::default(),
        )
        .unwrap();
        (view, surface)
    }

    #[test]
    fn test_download_filename_slug() {
        assert_eq!(
            download_filename("Pearl Drop Earrings"),
            "jewelry-tryon-pearl-drop-earrings.png"
        );
        assert_eq!(
            download_filename("Diamond  Nose\tStud"),
            "jewelry-tryon-diamond-nose-stud.png"
        );
    }

    #[test]
    fn test_mount_rejects_products_without_zone() {
        let mut ring = pearl_drops();
        ring.try_on_enabled = false;
        ring.try_on_zone = None;

        let result = TryOnView::mount(
            ring,
            Arc::new(SyntheticCamera::new(8, 8)),
            Arc::new(MemorySurface::new()),
            VideoConstraints::default(),
        );
        assert!(matches!(result, Err(TryOnError::UnsupportedProduct(id)) if id == "4"));
    }

    #[tokio::test]
    async fn test_capture_and_download() {
        let camera = Arc::new(SyntheticCamera::new(640, 480));
        let (view, _surface) = mount(camera.clone());

        assert_eq!(view.start().await.unwrap(), CaptureState::Live);
        view.capture().unwrap();

        let artifact = view.download().unwrap();
        assert_eq!(artifact.filename, "jewelry-tryon-pearl-drop-earrings.png");
        assert_eq!(artifact.content_type, "image/png");
        let decoded = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 480));
    }

    #[tokio::test]
    async fn test_operations_before_start() {
        let (view, _surface) = mount(Arc::new(SyntheticCamera::new(8, 8)));
        assert_eq!(view.state(), CaptureState::Initializing);
        assert!(matches!(
            view.capture(),
            Err(TryOnError::InvalidState { operation: "capture", state: CaptureState::Initializing })
        ));
    }

    #[tokio::test]
    async fn test_restart_releases_previous_device() {
        let camera = Arc::new(SyntheticCamera::new(8, 8));
        let (view, _surface) = mount(camera.clone());

        view.start().await.unwrap();
        view.start().await.unwrap();

        assert_eq!(camera.granted_count(), 2);
        assert_eq!(camera.stop_calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_after_denial_uses_new_session() {
        let camera = Arc::new(SyntheticCamera::refusing(DenialReason::PermissionDenied));
        let (view, _surface) = mount(camera);

        let err = view.start().await.unwrap_err();
        assert!(matches!(err, TryOnError::PermissionDenied));
        assert_eq!(view.state(), CaptureState::Denied);
        let first = view.status().unwrap();

        assert!(view.retry().await.is_err());
        assert_eq!(view.state(), CaptureState::Denied);
        assert_eq!(view.status().unwrap(), first);
    }

    #[tokio::test]
    async fn test_unmount_releases_and_blocks_restart() {
        let camera = Arc::new(SyntheticCamera::new(8, 8));
        let (view, surface) = mount(camera.clone());
        view.start().await.unwrap();
        view.capture().unwrap();

        view.unmount();
        view.unmount();
        assert_eq!(camera.stop_calls(), 1);
        assert!(!surface.is_attached());
        assert_eq!(view.state(), CaptureState::Released);
        assert!(view.start().await.is_err());
        assert!(matches!(
            view.download(),
            Err(TryOnError::InvalidState { state: CaptureState::Released, .. })
        ));
    }

    #[tokio::test]
    async fn test_drop_releases_camera() {
        let camera = Arc::new(SyntheticCamera::new(8, 8));
        {
            let (view, _surface) = mount(camera.clone());
            view.start().await.unwrap();
        }
        assert_eq!(camera.stop_calls(), 1);
    }

    #[test]
    fn test_overlay_is_label_only() {
        let (view, _surface) = mount(Arc::new(SyntheticCamera::new(8, 8)));

        let label = view.overlay_label();
        assert_eq!(label.title, "Pearl Drop Earrings");
        assert_eq!(label.subtitle, "ears jewelry");

        let support = view.overlay_support();
        assert!(!support.is_available());
        assert!(matches!(
            support,
            OverlaySupport::NotImplemented { zone: TryOnZone::Ears, .. }
        ));
    }
}
