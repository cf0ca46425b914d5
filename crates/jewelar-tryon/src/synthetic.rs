//! # Synthetic Camera
//!
//! A [`MediaHost`] that needs no hardware. It grants streams at a fixed
//! native resolution (whatever was asked for) and paints a moving gradient
//! test pattern. It can also be told to refuse access, to report no capture
//! support, to take a few frames to warm up, or to hold every request until
//! a [`Notify`] gate is opened.
//!
//! Used by the storefront demo walkthrough and by the session tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::Notify;
use tracing::debug;
use uuid::Uuid;

use crate::device::{Facing, MediaHost, MediaStream, TrackInfo, TrackSettings, VideoConstraints};
use crate::error::DenialReason;
use crate::frame::{PixelFormat, VideoFrame};

/// Fake camera host.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    format: PixelFormat,
    warmup_frames: u32,
    refusal: Option<DenialReason>,
    gate: Option<Arc<Notify>>,
    /// Streams that may still be live. Stopped or dropped ones are pruned
    /// on the next grant.
    granted: Mutex<Vec<Weak<SyntheticStream>>>,
    granted_count: AtomicUsize,
    stop_calls: Arc<AtomicUsize>,
}

impl SyntheticCamera {
    /// A camera that grants `width` x `height` RGBA streams.
    pub fn new(width: u32, height: u32) -> Self {
        SyntheticCamera {
            width,
            height,
            format: PixelFormat::Rgba8,
            warmup_frames: 0,
            refusal: None,
            gate: None,
            granted: Mutex::new(Vec::new()),
            granted_count: AtomicUsize::new(0),
            stop_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A host that refuses every request with `reason`.
    pub fn refusing(reason: DenialReason) -> Self {
        SyntheticCamera {
            refusal: Some(reason),
            ..SyntheticCamera::new(640, 480)
        }
    }

    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// The first `frames` reads of each stream return no frame.
    pub fn with_warmup(mut self, frames: u32) -> Self {
        self.warmup_frames = frames;
        self
    }

    /// Every request waits for `gate.notify_one()` before resolving.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Total `stop_track` calls across all granted streams.
    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    /// Number of streams granted so far.
    pub fn granted_count(&self) -> usize {
        self.granted_count.load(Ordering::SeqCst)
    }

    /// True if any granted stream still has a live track.
    pub fn any_track_live(&self) -> bool {
        self.granted
            .lock()
            .map(|g| g.iter().filter_map(Weak::upgrade).any(|s| s.is_live()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl MediaHost for SyntheticCamera {
    fn supports_video_capture(&self) -> bool {
        self.refusal != Some(DenialReason::UnsupportedEnvironment)
    }

    async fn request_video(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Arc<dyn MediaStream>, DenialReason> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if let Some(reason) = self.refusal {
            debug!(?reason, "Synthetic camera refusing request");
            return Err(reason);
        }

        let stream = Arc::new(SyntheticStream::new(
            self.width,
            self.height,
            self.format,
            constraints.facing,
            self.warmup_frames,
            Arc::clone(&self.stop_calls),
        ));
        debug!(
            stream_id = %stream.id,
            ideal_width = constraints.ideal_width,
            ideal_height = constraints.ideal_height,
            width = self.width,
            height = self.height,
            "Synthetic camera granted stream"
        );

        self.granted_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut granted) = self.granted.lock() {
            granted.retain(|s| s.upgrade().is_some_and(|s| s.is_live()));
            granted.push(Arc::downgrade(&stream));
        }
        Ok(stream)
    }
}

/// Stream produced by [`SyntheticCamera`]. Has a single video track.
pub struct SyntheticStream {
    id: String,
    track_id: String,
    width: u32,
    height: u32,
    format: PixelFormat,
    facing: Facing,
    warmup_frames: u32,
    reads: AtomicU32,
    live: AtomicBool,
    stop_calls: Arc<AtomicUsize>,
}

impl SyntheticStream {
    fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        facing: Facing,
        warmup_frames: u32,
        stop_calls: Arc<AtomicUsize>,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        SyntheticStream {
            track_id: format!("{}-video", id),
            id,
            width,
            height,
            format,
            facing,
            warmup_frames,
            reads: AtomicU32::new(0),
            live: AtomicBool::new(true),
            stop_calls,
        }
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn paint(&self, tick: u32) -> Vec<u8> {
        let (w, h) = (self.width.max(1), self.height.max(1));
        let mut data =
            Vec::with_capacity(self.width as usize * self.height as usize * self.format.bytes_per_pixel());

        for y in 0..self.height {
            for x in 0..self.width {
                let r = (x * 255 / w) as u8;
                let g = (y * 255 / h) as u8;
                let b = (tick % 256) as u8;
                match self.format {
                    PixelFormat::Rgba8 => data.extend_from_slice(&[r, g, b, 255]),
                    PixelFormat::Bgra8 => data.extend_from_slice(&[b, g, r, 255]),
                    PixelFormat::Rgb8 => data.extend_from_slice(&[r, g, b]),
                }
            }
        }
        data
    }
}

impl MediaStream for SyntheticStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        vec![TrackInfo {
            id: self.track_id.clone(),
            label: "Synthetic Camera".to_string(),
            live: self.is_live(),
        }]
    }

    fn settings(&self) -> TrackSettings {
        TrackSettings {
            width: self.width,
            height: self.height,
            facing: Some(self.facing),
            device_label: "Synthetic Camera".to_string(),
        }
    }

    fn read_frame(&self) -> Option<VideoFrame> {
        if !self.is_live() {
            return None;
        }
        let tick = self.reads.fetch_add(1, Ordering::SeqCst);
        if tick < self.warmup_frames {
            return None;
        }
        Some(VideoFrame::new(
            self.width,
            self.height,
            self.format,
            self.paint(tick),
        ))
    }

    fn stop_track(&self, track_id: &str) {
        if track_id == self.track_id {
            self.stop_calls.fetch_add(1, Ordering::SeqCst);
            self.live.store(false, Ordering::SeqCst);
        }
    }
}
