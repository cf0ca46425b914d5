//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──┐                                                    │
//! │  CoreError ────────┼──► StoreError ──┐                                  │
//! │                    │                 ├──► ApiError { code, message }    │
//! │  TryOnError ───────┴─────────────────┘        │                         │
//! │                                               ▼                         │
//! │  Internal failures (I/O, encoding, config) are logged with the detail  │
//! │  and reach the page as a generic message.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use jewelar_core::{CoreError, ValidationError};
use jewelar_store::StoreError;
use jewelar_tryon::TryOnError;
use serde::Serialize;

/// What the page receives when a command fails.
///
/// ```json
/// {
///   "code": "CAMERA_DENIED",
///   "message": "Camera access was denied. Please grant camera access to use the virtual try-on feature."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,

    ValidationError,

    /// Action not allowed in the current state (checkout step, session state)
    BusinessLogic,

    Internal,

    CartError,

    InsufficientStock,

    /// Login failed
    InvalidCredentials,

    /// Action needs a logged-in user
    Unauthenticated,

    /// Product list could not be loaded
    CatalogUnavailable,

    /// Camera refused; the page shows the "Camera Not Available" fallback
    CameraDenied,

    /// Camera is fine but nothing to capture yet; retry later
    CameraNotReady,

    /// Try-on was torn down while it was starting
    Cancelled,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn business(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BusinessLogic, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::InsufficientStock {
                product,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Only {} of {} in stock, {} requested",
                    available, product, requested
                ),
            ),
            CoreError::NotInCart(id) => ApiError::new(
                ErrorCode::CartError,
                format!("Product {} is not in your cart", id),
            ),
            CoreError::CartTooLarge { max } => ApiError::new(
                ErrorCode::CartError,
                format!("Cart cannot have more than {} items", max),
            ),
            CoreError::QuantityTooLarge { requested, max } => ApiError::new(
                ErrorCode::ValidationError,
                format!("Quantity {} exceeds maximum allowed ({})", requested, max),
            ),
            CoreError::CartEmpty => ApiError::new(ErrorCode::CartError, "Your cart is empty"),
            e @ CoreError::InvalidCheckoutStep { .. } => ApiError::business(e.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(e) => e.into(),
            e @ StoreError::InvalidCredentials => {
                ApiError::new(ErrorCode::InvalidCredentials, e.to_string())
            }
            e @ StoreError::NotAuthenticated(_) => {
                ApiError::new(ErrorCode::Unauthenticated, e.to_string())
            }
            StoreError::CatalogUnavailable(detail) => {
                tracing::error!("Catalog unavailable: {}", detail);
                ApiError::new(ErrorCode::CatalogUnavailable, "Failed to fetch products")
            }
            e @ (StoreError::PasswordHash(_)
            | StoreError::InvalidConfig(_)
            | StoreError::Io(_)
            | StoreError::ConfigParse(_)
            | StoreError::ConfigSerialize(_)) => {
                tracing::error!("Store failure: {}", e);
                ApiError::internal("Something went wrong. Please try again.")
            }
        }
    }
}

impl From<TryOnError> for ApiError {
    fn from(err: TryOnError) -> Self {
        match err {
            e @ (TryOnError::UnsupportedEnvironment
            | TryOnError::PermissionDenied
            | TryOnError::NoDeviceFound) => ApiError::new(ErrorCode::CameraDenied, e.to_string()),
            e @ TryOnError::Cancelled => ApiError::new(ErrorCode::Cancelled, e.to_string()),
            e @ TryOnError::InvalidState { .. } => ApiError::business(e.to_string()),
            e @ TryOnError::UnsupportedProduct(_) => ApiError::validation(e.to_string()),
            e @ TryOnError::NoFrameAvailable => {
                ApiError::new(ErrorCode::CameraNotReady, e.to_string())
            }
            e @ (TryOnError::MalformedFrame(_) | TryOnError::Encoding(_)) => {
                tracing::error!("Snapshot failed: {}", e);
                ApiError::internal("Failed to capture image")
            }
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {}", err);
        ApiError::internal("Failed to save file")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;
