//! # Capture Session
//!
//! One camera, one preview, at most one snapshot.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Initializing ──open() granted──► Live ◄──reset()── Captured           │
//! │        │                            │  ──capture()──►    │              │
//! │        │ open() refused             │                    │              │
//! │        ▼                            │                    │              │
//! │      Denied                         │                    │              │
//! │        │                            │                    │              │
//! │        └──────────── close() / Drop ┴────────────────────┘              │
//! │                           │                                             │
//! │                           ▼                                             │
//! │                       Released (terminal)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The device handle lives inside the `Live` and `Captured` phases and the
//! snapshot lives inside `Captured`, so "snapshot present iff Captured" and
//! "device open iff Live or Captured" cannot be violated.
//!
//! ## Concurrency
//! Every operation takes `&self`. State sits behind a mutex that is only
//! held for synchronous work; [`CaptureSession::open`] drops it before
//! awaiting the host. A `close()` that lands while `open()` is pending wins:
//! when the host answers, the granted device is released on the spot and
//! `open()` returns [`TryOnError::Cancelled`].

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard, Weak};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::device::{DeviceHandle, MediaHost, TrackSettings, VideoConstraints};
use crate::error::{DenialReason, TryOnError, TryOnResult};
use crate::frame::{CaptureBuffer, Snapshot, SnapshotInfo};
use crate::surface::PreviewSurface;

// =============================================================================
// Public State
// =============================================================================

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    Initializing,
    Live,
    Denied,
    Captured,
    Released,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaptureState::Initializing => "initializing",
            CaptureState::Live => "live",
            CaptureState::Denied => "denied",
            CaptureState::Captured => "captured",
            CaptureState::Released => "released",
        };
        f.write_str(s)
    }
}

/// Pushed to subscribers on every state or snapshot change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub state: CaptureState,
    pub denial: Option<DenialReason>,
    pub preview: Option<TrackSettings>,
    pub snapshot: Option<SnapshotInfo>,
}

impl SessionStatus {
    fn initial() -> Self {
        SessionStatus {
            state: CaptureState::Initializing,
            denial: None,
            preview: None,
            snapshot: None,
        }
    }
}

// =============================================================================
// Internal Phase
// =============================================================================

enum Phase {
    Initializing,
    Live {
        device: DeviceHandle,
    },
    Denied {
        reason: DenialReason,
    },
    Captured {
        device: DeviceHandle,
        snapshot: Snapshot,
    },
    Released,
}

impl Phase {
    fn state(&self) -> CaptureState {
        match self {
            Phase::Initializing => CaptureState::Initializing,
            Phase::Live { .. } => CaptureState::Live,
            Phase::Denied { .. } => CaptureState::Denied,
            Phase::Captured { .. } => CaptureState::Captured,
            Phase::Released => CaptureState::Released,
        }
    }

    fn status(&self) -> SessionStatus {
        match self {
            Phase::Initializing | Phase::Released => SessionStatus {
                state: self.state(),
                ..SessionStatus::initial()
            },
            Phase::Denied { reason } => SessionStatus {
                state: CaptureState::Denied,
                denial: Some(*reason),
                ..SessionStatus::initial()
            },
            Phase::Live { device } => SessionStatus {
                state: CaptureState::Live,
                preview: device.settings(),
                ..SessionStatus::initial()
            },
            Phase::Captured { device, snapshot } => SessionStatus {
                state: CaptureState::Captured,
                preview: device.settings(),
                snapshot: Some(snapshot.info()),
                ..SessionStatus::initial()
            },
        }
    }
}

// =============================================================================
// Capture Session
// =============================================================================

/// Owns one camera device for the lifetime of a try-on.
pub struct CaptureSession {
    id: Uuid,
    surface: Weak<dyn PreviewSurface>,
    phase: Mutex<Phase>,
    status_tx: watch::Sender<SessionStatus>,
}

impl CaptureSession {
    /// Creates a session in `Initializing`, bound to `surface` by weak
    /// reference.
    pub fn new(surface: Weak<dyn PreviewSurface>) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::initial());
        let id = Uuid::new_v4();
        debug!(session_id = %id, "Capture session created");

        CaptureSession {
            id,
            surface,
            phase: Mutex::new(Phase::Initializing),
            status_tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> CaptureState {
        self.lock_phase().state()
    }

    /// Current status snapshot.
    pub fn status(&self) -> SessionStatus {
        self.status_tx.borrow().clone()
    }

    /// Receives a new [`SessionStatus`] on every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    /// The stored snapshot, present only in `Captured`.
    pub fn last_frame(&self) -> Option<Snapshot> {
        match &*self.lock_phase() {
            Phase::Captured { snapshot, .. } => Some(snapshot.clone()),
            _ => None,
        }
    }

    /// Why access was refused, present only in `Denied`.
    pub fn denial_reason(&self) -> Option<DenialReason> {
        match &*self.lock_phase() {
            Phase::Denied { reason } => Some(*reason),
            _ => None,
        }
    }

    /// Requests a camera and binds it to the preview surface.
    ///
    /// Valid only from `Initializing`. On success the session is `Live`.
    /// On refusal it is `Denied` and the matching error is returned; a new
    /// session is needed to try again.
    pub async fn open(
        &self,
        host: &dyn MediaHost,
        constraints: VideoConstraints,
    ) -> TryOnResult<CaptureState> {
        {
            let phase = self.lock_phase();
            if !matches!(*phase, Phase::Initializing) {
                return Err(TryOnError::InvalidState {
                    operation: "open",
                    state: phase.state(),
                });
            }
        }

        if !host.supports_video_capture() {
            return self.deny(DenialReason::UnsupportedEnvironment);
        }

        info!(
            session_id = %self.id,
            facing = %constraints.facing,
            ideal_width = constraints.ideal_width,
            ideal_height = constraints.ideal_height,
            "Requesting camera access"
        );

        let outcome = host.request_video(&constraints).await;

        match outcome {
            Ok(stream) => {
                // Owned from here on: every early return below releases it.
                let mut device = DeviceHandle::new(stream);
                let mut phase = self.lock_phase();

                if !matches!(*phase, Phase::Initializing) {
                    device.release();
                    warn!(
                        session_id = %self.id,
                        state = %phase.state(),
                        "Session closed while camera request was pending, device released"
                    );
                    return Err(TryOnError::Cancelled);
                }

                let (surface, source) = match (self.surface.upgrade(), device.downgrade()) {
                    (Some(surface), Some(source)) => (surface, source),
                    _ => {
                        device.release();
                        *phase = Phase::Released;
                        self.publish(&phase);
                        warn!(session_id = %self.id, "Preview surface gone before camera was granted");
                        return Err(TryOnError::Cancelled);
                    }
                };
                surface.attach(source);

                if let Some(settings) = device.settings() {
                    info!(
                        session_id = %self.id,
                        width = settings.width,
                        height = settings.height,
                        device = %settings.device_label,
                        "Camera live"
                    );
                }

                *phase = Phase::Live { device };
                self.publish(&phase);
                Ok(CaptureState::Live)
            }
            Err(reason) => self.deny(reason),
        }
    }

    /// Captures the preview's current frame at its native resolution.
    ///
    /// Valid only in `Live`. Failures leave the session untouched.
    pub fn capture(&self) -> TryOnResult<Snapshot> {
        let mut phase = self.lock_phase();
        if !matches!(*phase, Phase::Live { .. }) {
            return Err(TryOnError::InvalidState {
                operation: "capture",
                state: phase.state(),
            });
        }

        let frame = self
            .surface
            .upgrade()
            .and_then(|surface| surface.current_frame())
            .filter(|frame| !frame.is_empty())
            .ok_or(TryOnError::NoFrameAvailable)?;

        let buffer = CaptureBuffer::from_frame(&frame)?;
        let snapshot = Snapshot::encode(&buffer)?;

        *phase = match std::mem::replace(&mut *phase, Phase::Released) {
            Phase::Live { device } => Phase::Captured {
                device,
                snapshot: snapshot.clone(),
            },
            other => other,
        };
        self.publish(&phase);

        info!(
            session_id = %self.id,
            width = snapshot.width(),
            height = snapshot.height(),
            bytes = snapshot.png_bytes().len(),
            "Snapshot captured"
        );
        Ok(snapshot)
    }

    /// Discards the snapshot and returns to the live preview.
    pub fn reset(&self) -> TryOnResult<()> {
        let mut phase = self.lock_phase();
        if !matches!(*phase, Phase::Captured { .. }) {
            return Err(TryOnError::InvalidState {
                operation: "reset",
                state: phase.state(),
            });
        }

        *phase = match std::mem::replace(&mut *phase, Phase::Released) {
            Phase::Captured { device, .. } => Phase::Live { device },
            other => other,
        };
        self.publish(&phase);

        debug!(session_id = %self.id, "Snapshot discarded, back to live preview");
        Ok(())
    }

    /// PNG bytes of the stored snapshot.
    pub fn export(&self) -> TryOnResult<Vec<u8>> {
        match &*self.lock_phase() {
            Phase::Captured { snapshot, .. } => Ok(snapshot.png_bytes().to_vec()),
            Phase::Live { .. } => Err(TryOnError::NoFrameAvailable),
            other => Err(TryOnError::InvalidState {
                operation: "export",
                state: other.state(),
            }),
        }
    }

    /// Releases the camera and unbinds the preview. Idempotent; also runs
    /// on drop.
    pub fn close(&self) {
        let mut phase = self.lock_phase();
        if matches!(*phase, Phase::Released) {
            return;
        }

        let previous = std::mem::replace(&mut *phase, Phase::Released);
        let from = previous.state();
        match previous {
            Phase::Live { mut device } | Phase::Captured { mut device, .. } => {
                if let Some(surface) = self.surface.upgrade() {
                    surface.detach(device.stream_id());
                }
                device.release();
            }
            Phase::Initializing | Phase::Denied { .. } | Phase::Released => {}
        }
        self.publish(&phase);

        info!(session_id = %self.id, from = %from, "Capture session released");
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Moves to `Denied`, unless a close already won the race.
    fn deny(&self, reason: DenialReason) -> TryOnResult<CaptureState> {
        let mut phase = self.lock_phase();
        if !matches!(*phase, Phase::Initializing) {
            return Err(TryOnError::Cancelled);
        }
        *phase = Phase::Denied { reason };
        self.publish(&phase);

        warn!(session_id = %self.id, ?reason, "Camera access denied");
        Err(reason.into())
    }

    fn publish(&self, phase: &Phase) {
        self.status_tx.send_replace(phase.status());
    }

    fn lock_phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
