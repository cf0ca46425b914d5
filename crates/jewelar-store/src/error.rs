//! # Store Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StoreError                                                             │
//! │  ├── Core(CoreError)            cart / checkout rule violations         │
//! │  ├── InvalidCredentials         login failed (deliberately vague)       │
//! │  ├── NotAuthenticated           profile edits need a session            │
//! │  ├── CatalogUnavailable         the product source failed               │
//! │  └── Config errors              I/O, TOML, validation                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use jewelar_core::{CoreError, ValidationError};
use thiserror::Error;

/// Errors from the storefront stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Domain rule violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Email or password did not match. Does not say which.
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,

    /// The action needs a logged-in user.
    #[error("You must be logged in to {0}")]
    NotAuthenticated(String),

    /// The product source failed. The detail is logged, not shown.
    #[error("Failed to fetch products")]
    CatalogUnavailable(String),

    /// Password hashing failed.
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    // =========================================================================
    // Configuration
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_lifts_through_core() {
        let err: StoreError = ValidationError::Required {
            field: "email".to_string(),
        }
        .into();
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
        assert_eq!(err.to_string(), "Validation error: email is required");
    }

    #[test]
    fn test_credentials_message_is_generic() {
        assert_eq!(
            StoreError::InvalidCredentials.to_string(),
            "Invalid email or password. Please try again."
        );
    }
}
