//! # Frames and Snapshots
//!
//! ```text
//! VideoFrame (device pixels, any supported format)
//!     │  CaptureBuffer::allocate(frame.width, frame.height)
//!     ▼
//! CaptureBuffer (RGBA8, exactly the frame's native size)
//!     │  encode_png()
//!     ▼
//! Snapshot (PNG bytes + dimensions + timestamp)
//! ```
//!
//! The capture buffer is always sized from the frame, never from the
//! resolution that was requested when the camera was opened.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::error::{TryOnError, TryOnResult};

// =============================================================================
// Video Frames
// =============================================================================

/// Pixel layouts a camera may deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Rgba8,
    Bgra8,
    Rgb8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// A decoded frame as read from the preview.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        VideoFrame {
            width,
            height,
            format,
            data,
        }
    }

    /// Byte length implied by the header.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    /// A zero-sized frame means the preview has metadata but no picture yet.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Debug for VideoFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .finish()
    }
}

// =============================================================================
// Capture Buffer
// =============================================================================

/// Off-screen RGBA bitmap a frame is drawn into before encoding.
pub struct CaptureBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CaptureBuffer {
    /// Allocates a transparent buffer of exactly `width` x `height`.
    pub fn allocate(width: u32, height: u32) -> Self {
        CaptureBuffer {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Allocates a buffer matching `frame` and draws it.
    pub fn from_frame(frame: &VideoFrame) -> TryOnResult<Self> {
        let mut buffer = CaptureBuffer::allocate(frame.width, frame.height);
        buffer.draw(frame)?;
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Draws `frame` at the origin, converting to RGBA.
    pub fn draw(&mut self, frame: &VideoFrame) -> TryOnResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(TryOnError::MalformedFrame(format!(
                "frame is {}x{} but buffer is {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        if frame.data.len() != frame.expected_len() {
            return Err(TryOnError::MalformedFrame(format!(
                "expected {} bytes of {:?}, got {}",
                frame.expected_len(),
                frame.format,
                frame.data.len()
            )));
        }

        match frame.format {
            PixelFormat::Rgba8 => self.pixels.copy_from_slice(&frame.data),
            PixelFormat::Bgra8 => {
                for (dst, src) in self.pixels.chunks_exact_mut(4).zip(frame.data.chunks_exact(4)) {
                    dst.copy_from_slice(&[src[2], src[1], src[0], src[3]]);
                }
            }
            PixelFormat::Rgb8 => {
                for (dst, src) in self.pixels.chunks_exact_mut(4).zip(frame.data.chunks_exact(3)) {
                    dst.copy_from_slice(&[src[0], src[1], src[2], u8::MAX]);
                }
            }
        }

        Ok(())
    }

    /// Encodes the buffer as PNG.
    pub fn encode_png(&self) -> TryOnResult<Vec<u8>> {
        use image::codecs::png::PngEncoder;
        use image::ImageEncoder;

        let mut png_data = Vec::new();
        let encoder = PngEncoder::new(&mut png_data);
        encoder
            .write_image(
                &self.pixels,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| TryOnError::Encoding(e.to_string()))?;

        Ok(png_data)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// An encoded still captured from the live preview.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    png: Arc<[u8]>,
    width: u32,
    height: u32,
    captured_at: DateTime<Utc>,
}

impl Snapshot {
    /// Encodes the contents of `buffer`.
    pub fn encode(buffer: &CaptureBuffer) -> TryOnResult<Self> {
        let png = buffer.encode_png()?;
        Ok(Snapshot {
            png: Arc::from(png),
            width: buffer.width(),
            height: buffer.height(),
            captured_at: Utc::now(),
        })
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            width: self.width,
            height: self.height,
            bytes: self.png.len(),
            captured_at: self.captured_at,
        }
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.png.len())
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

/// Snapshot metadata without the image bytes, for status updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    pub captured_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_matches_frame_dimensions() {
        let frame = VideoFrame::new(3, 2, PixelFormat::Rgba8, vec![7; 3 * 2 * 4]);
        let buffer = CaptureBuffer::from_frame(&frame).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (3, 2));
        assert_eq!(buffer.pixels().len(), 24);
    }

    #[test]
    fn test_bgra_is_swizzled() {
        let frame = VideoFrame::new(1, 1, PixelFormat::Bgra8, vec![10, 20, 30, 40]);
        let buffer = CaptureBuffer::from_frame(&frame).unwrap();
        assert_eq!(buffer.pixels(), &[30, 20, 10, 40]);
    }

    #[test]
    fn test_rgb_gets_opaque_alpha() {
        let frame = VideoFrame::new(2, 1, PixelFormat::Rgb8, vec![1, 2, 3, 4, 5, 6]);
        let buffer = CaptureBuffer::from_frame(&frame).unwrap();
        assert_eq!(buffer.pixels(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_short_frame_is_rejected() {
        let frame = VideoFrame::new(4, 4, PixelFormat::Rgba8, vec![0; 10]);
        assert!(matches!(
            CaptureBuffer::from_frame(&frame),
            Err(TryOnError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_snapshot_decodes_to_buffer_size() {
        let frame = VideoFrame::new(5, 3, PixelFormat::Rgb8, vec![128; 5 * 3 * 3]);
        let buffer = CaptureBuffer::from_frame(&frame).unwrap();
        let snapshot = Snapshot::encode(&buffer).unwrap();

        assert!(snapshot.png_bytes().starts_with(&[0x89, b'P', b'N', b'G']));
        let decoded = image::load_from_memory(snapshot.png_bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 3));
        assert_eq!(snapshot.info().bytes, snapshot.png_bytes().len());
    }
}
