//! # Try-On Commands
//!
//! The virtual try-on page.
//!
//! ## Page Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open_try_on(product)   mount view, show "Initializing camera..."      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  start_camera() ──┬── Live    preview running, "Capture" enabled        │
//! │                   └── CAMERA_DENIED   "Camera Not Available" + retry   │
//! │       │                                                                 │
//! │  capture_snapshot() ──► Captured   still image, "Download" / "Retake"  │
//! │       │                                                                 │
//! │  download_snapshot() ──► jewelry-tryon-<name>.png in downloads dir     │
//! │  reset_snapshot()    ──► back to Live                                  │
//! │                                                                         │
//! │  close_try_on()  camera released (also on navigating to another page)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use jewelar_store::{CatalogStore, StorefrontConfig};
use jewelar_tryon::{
    CaptureState, OverlayLabel, OverlaySupport, SessionStatus, SnapshotInfo, VideoConstraints,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::TryOnState;

/// The try-on page as first rendered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnPage {
    pub product_id: String,
    pub label: OverlayLabel,
    pub overlay: OverlaySupport,
    pub constraints: VideoConstraints,
    pub state: CaptureState,
}

/// A snapshot written to disk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSnapshot {
    pub filename: String,
    pub path: PathBuf,
    pub content_type: &'static str,
    pub bytes: usize,
}

/// Opens the try-on page for a product. Any open page is closed first.
pub fn open_try_on(
    tryon: &TryOnState,
    catalog: &CatalogStore,
    product_id: &str,
) -> ApiResult<TryOnPage> {
    debug!(%product_id, "open_try_on command");

    let product = catalog.require_product(product_id)?;
    let view = tryon.mount(product)?;

    Ok(TryOnPage {
        product_id: view.product().id.clone(),
        label: view.overlay_label(),
        overlay: view.overlay_support(),
        constraints: tryon.constraints(),
        state: view.state(),
    })
}

/// Asks for the camera. Resolves once access is granted or refused.
pub async fn start_camera(tryon: &TryOnState) -> ApiResult<SessionStatus> {
    debug!("start_camera command");
    let view = tryon.current()?;
    view.start().await?;
    current_status(tryon)
}

/// "Try Again" on the camera-unavailable fallback.
pub async fn retry_camera(tryon: &TryOnState) -> ApiResult<SessionStatus> {
    debug!("retry_camera command");
    let view = tryon.current()?;
    view.retry().await?;
    current_status(tryon)
}

/// Freezes the current preview frame.
pub fn capture_snapshot(tryon: &TryOnState) -> ApiResult<SnapshotInfo> {
    debug!("capture_snapshot command");
    let snapshot = tryon.current()?.capture()?;
    Ok(snapshot.info())
}

/// "Retake": drops the snapshot and resumes the preview.
pub fn reset_snapshot(tryon: &TryOnState) -> ApiResult<SessionStatus> {
    debug!("reset_snapshot command");
    tryon.current()?.reset()?;
    current_status(tryon)
}

/// Saves the captured PNG into the configured downloads directory.
pub async fn download_snapshot(
    tryon: &TryOnState,
    config: &StorefrontConfig,
) -> ApiResult<SavedSnapshot> {
    debug!("download_snapshot command");
    let artifact = tryon.current()?.download()?;

    let dir = config.downloads.resolve_directory();
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(&artifact.filename);
    tokio::fs::write(&path, &artifact.bytes).await?;

    info!(path = %path.display(), bytes = artifact.bytes.len(), "Snapshot saved");
    Ok(SavedSnapshot {
        filename: artifact.filename,
        path,
        content_type: artifact.content_type,
        bytes: artifact.bytes.len(),
    })
}

pub fn try_on_status(tryon: &TryOnState) -> ApiResult<SessionStatus> {
    current_status(tryon)
}

/// Leaves the try-on page and releases the camera.
pub fn close_try_on(tryon: &TryOnState) -> bool {
    debug!("close_try_on command");
    tryon.unmount()
}

fn current_status(tryon: &TryOnState) -> ApiResult<SessionStatus> {
    let view = tryon.current()?;
    Ok(view.status().unwrap_or(SessionStatus {
        state: view.state(),
        denial: None,
        preview: None,
        snapshot: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use jewelar_store::config::CameraSettings;
    use jewelar_store::SeedCatalog;
    use jewelar_tryon::{DenialReason, MediaHost, SyntheticCamera};
    use std::sync::Arc;
    use tokio::sync::Notify;

    async fn catalog() -> CatalogStore {
        let catalog = CatalogStore::new(Arc::new(SeedCatalog));
        catalog.fetch_products().await.unwrap();
        catalog
    }

    fn tryon_with(camera: Arc<SyntheticCamera>) -> TryOnState {
        let host: Arc<dyn MediaHost> = camera;
        TryOnState::new(host, &CameraSettings::default()).unwrap()
    }

    /// Width and height from the PNG IHDR chunk.
    fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        (width, height)
    }

    #[tokio::test]
    async fn test_capture_and_download_at_native_resolution() {
        let catalog = catalog().await;
        let camera = Arc::new(SyntheticCamera::new(640, 480));
        let tryon = tryon_with(camera.clone());
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorefrontConfig::default();
        config.downloads.directory = Some(dir.path().to_path_buf());

        let page = open_try_on(&tryon, &catalog, "1").unwrap();
        assert_eq!(page.label.subtitle, "ears jewelry");
        assert!(!page.overlay.is_available());
        assert_eq!(page.constraints.ideal_width, 1280);

        let status = start_camera(&tryon).await.unwrap();
        assert_eq!(status.state, CaptureState::Live);
        assert!(tryon.preview_attached());

        let info = capture_snapshot(&tryon).unwrap();
        assert_eq!((info.width, info.height), (640, 480));

        let saved = download_snapshot(&tryon, &config).await.unwrap();
        assert_eq!(saved.filename, "jewelry-tryon-diamond-stud-earrings.png");
        let bytes = std::fs::read(&saved.path).unwrap();
        assert_eq!(bytes.len(), saved.bytes);
        assert_eq!(png_dimensions(&bytes), (640, 480));

        assert_eq!(reset_snapshot(&tryon).unwrap().state, CaptureState::Live);
        let err = download_snapshot(&tryon, &config).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CameraNotReady);

        assert!(close_try_on(&tryon));
        assert!(!close_try_on(&tryon));
        assert_eq!(camera.stop_calls(), 1);
        assert!(!camera.any_track_live());
    }

    #[tokio::test]
    async fn test_product_without_try_on_is_refused() {
        let catalog = catalog().await;
        let tryon = tryon_with(Arc::new(SyntheticCamera::new(8, 8)));

        // Emerald Cut Engagement Ring
        let err = open_try_on(&tryon, &catalog, "3").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(try_on_status(&tryon).unwrap_err().code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_denied_camera_then_capture_is_rejected() {
        let catalog = catalog().await;
        let tryon = tryon_with(Arc::new(SyntheticCamera::refusing(
            DenialReason::PermissionDenied,
        )));

        open_try_on(&tryon, &catalog, "2").unwrap();
        let err = start_camera(&tryon).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CameraDenied);

        let status = try_on_status(&tryon).unwrap();
        assert_eq!(status.state, CaptureState::Denied);
        assert_eq!(status.denial, Some(DenialReason::PermissionDenied));

        let err = capture_snapshot(&tryon).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_navigating_away_while_camera_pending() {
        let catalog = catalog().await;
        let gate = Arc::new(Notify::new());
        let camera = Arc::new(SyntheticCamera::new(64, 48).gated(gate.clone()));
        let tryon = tryon_with(camera.clone());
        open_try_on(&tryon, &catalog, "8").unwrap();

        let (started, ()) = tokio::join!(start_camera(&tryon), async {
            tokio::task::yield_now().await;
            close_try_on(&tryon);
            gate.notify_one();
        });

        assert_eq!(started.unwrap_err().code, ErrorCode::Cancelled);
        assert_eq!(camera.granted_count(), 1);
        assert_eq!(camera.stop_calls(), 1);
        assert!(!tryon.preview_attached());
    }

    #[tokio::test]
    async fn test_opening_another_product_releases_camera() {
        let catalog = catalog().await;
        let camera = Arc::new(SyntheticCamera::new(64, 48));
        let tryon = tryon_with(camera.clone());

        open_try_on(&tryon, &catalog, "4").unwrap();
        start_camera(&tryon).await.unwrap();
        assert!(camera.any_track_live());

        let page = open_try_on(&tryon, &catalog, "6").unwrap();
        assert_eq!(page.state, CaptureState::Initializing);
        assert!(!camera.any_track_live());
        assert_eq!(camera.stop_calls(), 1);
    }
}
