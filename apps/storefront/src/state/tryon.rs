//! # Try-On State
//!
//! The camera host and the try-on page currently on screen.
//!
//! ```text
//! open_try_on(p2) ──► previous view.unmount() ──► camera released
//!                 └─► TryOnView::mount(p2)    ──► slot
//! close_try_on()  ──► slot.take().unmount()
//! ```
//!
//! Views are handed out as `Arc` so a command can await `start()` without
//! holding the slot lock; unmounting from another command still cancels it.

use std::sync::{Arc, Mutex, MutexGuard};

use jewelar_core::Product;
use jewelar_store::config::CameraSettings;
use jewelar_tryon::{Facing, MediaHost, MemorySurface, PreviewSurface, TryOnView, VideoConstraints};
use tracing::debug;

use crate::error::{ApiError, ApiResult};

pub struct TryOnState {
    host: Arc<dyn MediaHost>,
    surface: Arc<MemorySurface>,
    constraints: VideoConstraints,
    view: Mutex<Option<Arc<TryOnView>>>,
}

impl TryOnState {
    pub fn new(host: Arc<dyn MediaHost>, settings: &CameraSettings) -> ApiResult<Self> {
        let facing: Facing = settings.facing.parse().map_err(ApiError::validation)?;
        let constraints = VideoConstraints::new(facing, settings.ideal_width, settings.ideal_height);

        Ok(TryOnState {
            host,
            surface: Arc::new(MemorySurface::new()),
            constraints,
            view: Mutex::new(None),
        })
    }

    pub fn constraints(&self) -> VideoConstraints {
        self.constraints
    }

    /// Whether the preview surface is showing a live stream.
    pub fn preview_attached(&self) -> bool {
        self.surface.is_attached()
    }

    /// Navigates to the try-on page for `product`, leaving any open one.
    pub fn mount(&self, product: Product) -> ApiResult<Arc<TryOnView>> {
        let surface: Arc<dyn PreviewSurface> = self.surface.clone();
        let view = Arc::new(TryOnView::mount(
            product,
            Arc::clone(&self.host),
            surface,
            self.constraints,
        )?);

        if let Some(previous) = self.lock().replace(Arc::clone(&view)) {
            debug!(product_id = %previous.product().id, "Leaving previous try-on page");
            previous.unmount();
        }
        Ok(view)
    }

    /// The open try-on page.
    pub fn current(&self) -> ApiResult<Arc<TryOnView>> {
        self.lock()
            .clone()
            .ok_or_else(|| ApiError::business("No try-on page is open"))
    }

    /// Leaves the try-on page. Returns false if none was open.
    pub fn unmount(&self) -> bool {
        match self.lock().take() {
            Some(view) => {
                view.unmount();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<TryOnView>>> {
        self.view.lock().unwrap_or_else(|e| e.into_inner())
    }
}
