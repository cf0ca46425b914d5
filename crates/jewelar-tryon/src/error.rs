//! # Try-On Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Try-On Error Categories                           │
//! │                                                                         │
//! │  ┌──────────────────────┐  ┌──────────────────┐  ┌──────────────────┐  │
//! │  │  Device access       │  │  Contract        │  │  Capture         │  │
//! │  │  (open only)         │  │  (programming)   │  │  (recoverable)   │  │
//! │  │                      │  │                  │  │                  │  │
//! │  │  UnsupportedEnv      │  │  InvalidState    │  │  NoFrameAvailable│  │
//! │  │  PermissionDenied    │  │  UnsupportedProd │  │  MalformedFrame  │  │
//! │  │  NoDeviceFound       │  │                  │  │  Encoding        │  │
//! │  │  Cancelled           │  │                  │  │                  │  │
//! │  └──────────────────────┘  └──────────────────┘  └──────────────────┘  │
//! │                                                                         │
//! │  Device access failures leave the session in Denied; the only way      │
//! │  forward is a brand-new session (the view's Retry button).             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::session::CaptureState;

/// Result type alias for try-on operations.
pub type TryOnResult<T> = Result<T, TryOnError>;

/// Why the host refused a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The environment has no media capture API at all.
    UnsupportedEnvironment,
    /// The user (or a policy) refused the permission prompt.
    PermissionDenied,
    /// Capture is supported and allowed but no camera is attached.
    NoDeviceFound,
}

impl DenialReason {
    /// Message shown on the "Camera Not Available" fallback.
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::UnsupportedEnvironment => {
                "Camera access is not supported in this browser"
            }
            DenialReason::PermissionDenied => {
                "Camera access was denied. Please grant camera access to use the virtual try-on feature."
            }
            DenialReason::NoDeviceFound => "No camera was found on this device",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Errors raised by [`CaptureSession`](crate::session::CaptureSession) and
/// [`TryOnView`](crate::view::TryOnView).
#[derive(Debug, Error)]
pub enum TryOnError {
    // =========================================================================
    // Device Access
    // =========================================================================
    #[error("{}", DenialReason::UnsupportedEnvironment.message())]
    UnsupportedEnvironment,

    #[error("{}", DenialReason::PermissionDenied.message())]
    PermissionDenied,

    #[error("{}", DenialReason::NoDeviceFound.message())]
    NoDeviceFound,

    /// The session was closed (or its preview surface dropped) while camera
    /// access was still pending. Any granted device has been released.
    #[error("Try-on session was closed before camera access resolved")]
    Cancelled,

    // =========================================================================
    // Contract Violations
    // =========================================================================
    /// Operation called in a state that does not allow it.
    #[error("Cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: CaptureState,
    },

    /// The product has no try-on zone, so the try-on view cannot mount.
    #[error("Product {0} does not support virtual try-on")]
    UnsupportedProduct(String),

    // =========================================================================
    // Capture
    // =========================================================================
    /// The preview has not rendered a frame yet (or there is no snapshot to
    /// export). Retry the same call later.
    #[error("No camera frame is available yet")]
    NoFrameAvailable,

    /// The device delivered a frame whose buffer does not match its header.
    #[error("Camera frame is malformed: {0}")]
    MalformedFrame(String),

    /// PNG encoding failed.
    #[error("Failed to encode snapshot: {0}")]
    Encoding(String),
}

impl TryOnError {
    /// True for the failures that put a session into Denied.
    pub fn is_denial(&self) -> bool {
        self.denial_reason().is_some()
    }

    /// The matching denial reason, if this is a device-access failure.
    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            TryOnError::UnsupportedEnvironment => Some(DenialReason::UnsupportedEnvironment),
            TryOnError::PermissionDenied => Some(DenialReason::PermissionDenied),
            TryOnError::NoDeviceFound => Some(DenialReason::NoDeviceFound),
            _ => None,
        }
    }
}

impl From<DenialReason> for TryOnError {
    fn from(reason: DenialReason) -> Self {
        match reason {
            DenialReason::UnsupportedEnvironment => TryOnError::UnsupportedEnvironment,
            DenialReason::PermissionDenied => TryOnError::PermissionDenied,
            DenialReason::NoDeviceFound => TryOnError::NoDeviceFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_round_trip() {
        for reason in [
            DenialReason::UnsupportedEnvironment,
            DenialReason::PermissionDenied,
            DenialReason::NoDeviceFound,
        ] {
            let err = TryOnError::from(reason);
            assert!(err.is_denial());
            assert_eq!(err.denial_reason(), Some(reason));
            assert_eq!(err.to_string(), reason.message());
        }
    }

    #[test]
    fn test_reasons_are_distinguishable() {
        let messages = [
            DenialReason::UnsupportedEnvironment.message(),
            DenialReason::PermissionDenied.message(),
            DenialReason::NoDeviceFound.message(),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }

    #[test]
    fn test_invalid_state_message() {
        let err = TryOnError::InvalidState {
            operation: "capture",
            state: CaptureState::Denied,
        };
        assert_eq!(err.to_string(), "Cannot capture while the session is denied");
        assert!(!err.is_denial());
    }
}
