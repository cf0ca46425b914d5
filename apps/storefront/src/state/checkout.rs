//! # Checkout State
//!
//! At most one checkout in progress. Starting again replaces it.

use std::sync::{Mutex, MutexGuard};

use jewelar_store::CheckoutFlow;

use crate::error::{ApiError, ApiResult};

pub struct CheckoutState {
    flow: Mutex<Option<CheckoutFlow>>,
}

impl CheckoutState {
    pub fn new() -> Self {
        CheckoutState {
            flow: Mutex::new(None),
        }
    }

    pub fn replace(&self, flow: CheckoutFlow) {
        *self.lock() = Some(flow);
    }

    /// Runs `f` on the active flow. Fails if checkout was never started.
    pub fn with_flow<F, R>(&self, f: F) -> ApiResult<R>
    where
        F: FnOnce(&mut CheckoutFlow) -> ApiResult<R>,
    {
        let mut guard = self.lock();
        let flow = guard
            .as_mut()
            .ok_or_else(|| ApiError::business("Checkout has not been started"))?;
        f(flow)
    }

    pub fn cancel(&self) -> bool {
        self.lock().take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<CheckoutFlow>> {
        self.flow.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for CheckoutState {
    fn default() -> Self {
        Self::new()
    }
}
