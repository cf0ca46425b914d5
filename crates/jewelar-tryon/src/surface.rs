//! Preview surface binding.
//!
//! The surface is the on-screen element the live camera feed is painted into.
//! A session binds a granted stream to it and reads frames back from it at
//! capture time. Both directions are weak: the surface never keeps the camera
//! alive and the session never keeps the surface alive.

use std::sync::{Mutex, Weak};

use crate::device::MediaStream;
use crate::frame::VideoFrame;

/// Something a live stream can be shown on.
pub trait PreviewSurface: Send + Sync {
    /// Starts showing `source`. Replaces any previous source.
    fn attach(&self, source: Weak<dyn MediaStream>);

    /// Stops showing the stream `stream_id`. Leaves any other source in
    /// place.
    fn detach(&self, stream_id: &str);

    /// The frame currently displayed, at the stream's native size.
    fn current_frame(&self) -> Option<VideoFrame>;
}

/// Headless surface that forwards the attached stream's latest frame.
#[derive(Default)]
pub struct MemorySurface {
    source: Mutex<Option<Weak<dyn MediaStream>>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        MemorySurface::default()
    }

    /// True while a stream is attached and still alive.
    pub fn is_attached(&self) -> bool {
        self.with_source(|source| source.is_some())
    }

    fn with_source<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Option<&dyn MediaStream>) -> R,
    {
        let guard = self.source.lock().unwrap_or_else(|e| e.into_inner());
        let stream = guard.as_ref().and_then(Weak::upgrade);
        f(stream.as_deref())
    }
}

impl PreviewSurface for MemorySurface {
    fn attach(&self, source: Weak<dyn MediaStream>) {
        *self.source.lock().unwrap_or_else(|e| e.into_inner()) = Some(source);
    }

    fn detach(&self, stream_id: &str) {
        let mut guard = self.source.lock().unwrap_or_else(|e| e.into_inner());
        let showing = guard
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|stream| stream.id() == stream_id);
        if showing != Some(false) {
            *guard = None;
        }
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        self.with_source(|source| source.and_then(|s| s.read_frame()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::device::{MediaHost, VideoConstraints};
    use crate::synthetic::SyntheticCamera;

    #[tokio::test]
    async fn test_detach_ignores_other_streams() {
        let camera = SyntheticCamera::new(4, 4);
        let first = camera.request_video(&VideoConstraints::default()).await.unwrap();
        let second = camera.request_video(&VideoConstraints::default()).await.unwrap();
        let surface = MemorySurface::new();

        surface.attach(Arc::downgrade(&second));
        surface.detach(first.id());
        assert!(surface.is_attached());
        assert!(surface.current_frame().is_some());

        surface.detach(second.id());
        assert!(!surface.is_attached());
    }
}
