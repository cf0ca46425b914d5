//! # Camera Device Access
//!
//! The seam between a try-on session and whatever actually owns the camera
//! (a browser bridge, a native capture backend, or the synthetic camera used
//! in tests and the demo app).
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MediaHost::request_video(constraints)                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Arc<dyn MediaStream> ──► DeviceHandle (strong, exactly one per session)│
//! │        │                                                                │
//! │        └── Weak ──► PreviewSurface (never keeps the camera alive)       │
//! │                                                                         │
//! │  DeviceHandle::release() / Drop  ──► stop every track, exactly once     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Constraints are hints. A host may grant any resolution, so callers must
//! read [`MediaStream::settings`] instead of trusting what they asked for.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::error::DenialReason;
use crate::frame::VideoFrame;

// =============================================================================
// Constraints
// =============================================================================

/// Which camera the shopper should see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Front camera (selfie). Used for jewelry try-on.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facing::User => write!(f, "user"),
            Facing::Environment => write!(f, "environment"),
        }
    }
}

impl FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Facing::User),
            "environment" => Ok(Facing::Environment),
            other => Err(format!("unknown camera facing '{}'", other)),
        }
    }
}

/// Preferred camera and resolution. All fields are hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConstraints {
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl VideoConstraints {
    pub fn new(facing: Facing, ideal_width: u32, ideal_height: u32) -> Self {
        VideoConstraints {
            facing,
            ideal_width,
            ideal_height,
        }
    }
}

impl Default for VideoConstraints {
    fn default() -> Self {
        VideoConstraints::new(Facing::User, 1280, 720)
    }
}

// =============================================================================
// Streams
// =============================================================================

/// What the host actually granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSettings {
    pub width: u32,
    pub height: u32,
    pub facing: Option<Facing>,
    pub device_label: String,
}

/// One hardware track of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub id: String,
    pub label: String,
    pub live: bool,
}

/// A live video stream granted by a [`MediaHost`].
pub trait MediaStream: Send + Sync {
    /// Stable identifier for logging.
    fn id(&self) -> &str;

    /// Hardware tracks backing this stream.
    fn tracks(&self) -> Vec<TrackInfo>;

    /// Granted settings of the video track.
    fn settings(&self) -> TrackSettings;

    /// Most recent decoded frame, `None` until the camera has produced one.
    fn read_frame(&self) -> Option<VideoFrame>;

    /// Stops a single track. Stopping an already stopped track is a no-op.
    fn stop_track(&self, track_id: &str);

    /// Stops every track of the stream.
    fn stop(&self) {
        for track in self.tracks() {
            self.stop_track(&track.id);
        }
    }
}

/// Grants camera streams.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// False when the environment has no capture API at all.
    fn supports_video_capture(&self) -> bool;

    /// Asks for a video stream. Resolves once the user answers the
    /// permission prompt. The returned stream is owned by the caller.
    async fn request_video(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Arc<dyn MediaStream>, DenialReason>;
}

// =============================================================================
// Device Handle
// =============================================================================

/// Exclusive owner of a granted stream.
///
/// Releasing stops every track. Release happens at most once: explicitly
/// through [`DeviceHandle::release`] or implicitly on drop.
pub struct DeviceHandle {
    stream: Option<Arc<dyn MediaStream>>,
    stream_id: String,
}

impl DeviceHandle {
    pub fn new(stream: Arc<dyn MediaStream>) -> Self {
        let stream_id = stream.id().to_string();
        DeviceHandle {
            stream: Some(stream),
            stream_id,
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn is_released(&self) -> bool {
        self.stream.is_none()
    }

    /// Granted settings, `None` once released.
    pub fn settings(&self) -> Option<TrackSettings> {
        self.stream.as_ref().map(|s| s.settings())
    }

    /// Weak reference for binding a preview surface.
    pub fn downgrade(&self) -> Option<Weak<dyn MediaStream>> {
        self.stream.as_ref().map(Arc::downgrade)
    }

    /// Stops all tracks. Returns false if the handle was already released.
    pub fn release(&mut self) -> bool {
        match self.stream.take() {
            Some(stream) => {
                let tracks = stream.tracks();
                for track in &tracks {
                    stream.stop_track(&track.id);
                }
                debug!(
                    stream_id = %self.stream_id,
                    tracks = tracks.len(),
                    "Camera tracks stopped"
                );
                true
            }
            None => false,
        }
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("stream_id", &self.stream_id)
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticCamera;

    #[test]
    fn test_default_constraints_ask_for_front_720p() {
        let constraints = VideoConstraints::default();
        assert_eq!(constraints.facing, Facing::User);
        assert_eq!((constraints.ideal_width, constraints.ideal_height), (1280, 720));
    }

    #[test]
    fn test_facing_parse() {
        assert_eq!("User".parse::<Facing>().unwrap(), Facing::User);
        assert_eq!("environment".parse::<Facing>().unwrap(), Facing::Environment);
        assert!("sideways".parse::<Facing>().is_err());
    }

    #[tokio::test]
    async fn test_release_stops_tracks_once() {
        let camera = SyntheticCamera::new(640, 480);
        let stream = camera
            .request_video(&VideoConstraints::default())
            .await
            .unwrap();

        let mut handle = DeviceHandle::new(stream);
        assert!(!handle.is_released());
        assert!(handle.release());
        assert!(!handle.release());
        drop(handle);

        assert_eq!(camera.stop_calls(), 1);
        assert!(!camera.any_track_live());
    }

    #[tokio::test]
    async fn test_drop_releases() {
        let camera = SyntheticCamera::new(640, 480);
        let stream = camera
            .request_video(&VideoConstraints::default())
            .await
            .unwrap();

        let handle = DeviceHandle::new(stream);
        assert!(handle.settings().is_some());
        drop(handle);

        assert_eq!(camera.stop_calls(), 1);
        assert!(!camera.any_track_live());
    }
}
