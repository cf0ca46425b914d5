//! # jewelar-tryon: Virtual Try-On Camera
//!
//! Opens the shopper's camera, shows it live, and turns a single frame into
//! a PNG they can download. Jewelry is not drawn over the picture; see
//! [`overlay`].
//!
//! ## Module Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  view       TryOnView: one product, start/retry/capture/reset/download │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  session    CaptureSession state machine + watch notifications         │
//! │    │                                                                    │
//! │    ├──► device    MediaHost / MediaStream traits, DeviceHandle (RAII)   │
//! │    ├──► surface   PreviewSurface trait, MemorySurface                   │
//! │    └──► frame     VideoFrame → CaptureBuffer (RGBA) → Snapshot (PNG)    │
//! │                                                                         │
//! │  synthetic  SyntheticCamera host with test-pattern frames              │
//! │  overlay    OverlayLabel, OverlaySupport::NotImplemented               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use jewelar_tryon::{CaptureSession, CaptureState, MemorySurface, PreviewSurface, SyntheticCamera, VideoConstraints};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let camera = SyntheticCamera::new(640, 480);
//! let surface: Arc<dyn PreviewSurface> = Arc::new(MemorySurface::new());
//! let session = CaptureSession::new(Arc::downgrade(&surface));
//!
//! session.open(&camera, VideoConstraints::default()).await.unwrap();
//! let snapshot = session.capture().unwrap();
//! assert_eq!((snapshot.width(), snapshot.height()), (640, 480));
//! assert_eq!(session.state(), CaptureState::Captured);
//!
//! session.close();
//! # });
//! ```

pub mod device;
pub mod error;
pub mod frame;
pub mod overlay;
pub mod session;
pub mod surface;
pub mod synthetic;
pub mod view;

pub use device::{DeviceHandle, Facing, MediaHost, MediaStream, TrackSettings, VideoConstraints};
pub use error::{DenialReason, TryOnError, TryOnResult};
pub use frame::{PixelFormat, Snapshot, SnapshotInfo, VideoFrame};
pub use overlay::{OverlayLabel, OverlaySupport};
pub use session::{CaptureSession, CaptureState, SessionStatus};
pub use surface::{MemorySurface, PreviewSurface};
pub use synthetic::SyntheticCamera;
pub use view::{download_filename, DownloadArtifact, TryOnView};
