//! # Validation Module
//!
//! Input validation for storefront forms.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Frontend                                                      │
//! │  ├── `required`, `maxLength` attributes                                │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Stores (Rust)                                                │
//! │  └── THIS MODULE: quantities, login form, shipping and card forms      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use jewelar_core::validation::{validate_email, validate_quantity};
//!
//! assert!(validate_email("asha@example.com").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{PaymentDetails, ShippingDetails};
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY, SUPPORTED_COUNTRIES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Fails with `Required` if `value` is blank.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty, at most 254 characters
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid());
    }

    match domain.find('.') {
        Some(dot) if dot > 0 && !domain.ends_with('.') => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a search query. Returns the trimmed query.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates cart size (number of distinct lines) before adding another.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Checkout Forms
// =============================================================================

/// Validates the shipping form. Every field is required.
pub fn validate_shipping(details: &ShippingDetails) -> ValidationResult<()> {
    validate_required("full name", &details.full_name)?;
    validate_email(&details.email)?;
    validate_required("address", &details.address)?;
    validate_required("city", &details.city)?;
    validate_required("state", &details.state)?;
    validate_required("postal code", &details.postal_code)?;
    validate_required("phone", &details.phone)?;

    if !SUPPORTED_COUNTRIES.contains(&details.country.as_str()) {
        return Err(ValidationError::NotAllowed {
            field: "country".to_string(),
            allowed: SUPPORTED_COUNTRIES.iter().map(|c| c.to_string()).collect(),
        });
    }

    Ok(())
}

/// Validates the card form.
///
/// ## Rules
/// - Name on card required
/// - Card number: at most 19 characters, 13-19 digits, spaces allowed
/// - Expiry: `MM/YY`, month 01-12
/// - CVV: 3 or 4 digits
pub fn validate_payment(details: &PaymentDetails) -> ValidationResult<()> {
    validate_required("name on card", &details.card_name)?;
    validate_card_number(&details.card_number)?;
    validate_expiry(&details.expiry_date)?;
    validate_cvv(&details.cvv)?;
    Ok(())
}

fn validate_card_number(number: &str) -> ValidationResult<()> {
    validate_required("card number", number)?;

    if number.len() > 19 {
        return Err(ValidationError::TooLong {
            field: "card number".to_string(),
            max: 19,
        });
    }

    if !number.chars().all(|c| c.is_ascii_digit() || c == ' ') {
        return Err(ValidationError::InvalidFormat {
            field: "card number".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    let digits = number.chars().filter(char::is_ascii_digit).count();
    if !(13..=19).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "card number".to_string(),
            reason: "must have 13 to 19 digits".to_string(),
        });
    }

    Ok(())
}

fn validate_expiry(expiry: &str) -> ValidationResult<()> {
    validate_required("expiry date", expiry)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "expiry date".to_string(),
        reason: "must be MM/YY".to_string(),
    };

    let (month, year) = expiry.split_once('/').ok_or_else(invalid)?;
    let two_digits = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return Err(invalid());
    }

    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "expiry month".to_string(),
            min: 1,
            max: 12,
        });
    }

    Ok(())
}

fn validate_cvv(cvv: &str) -> ValidationResult<()> {
    validate_required("cvv", cvv)?;

    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "cvv".to_string(),
            reason: "must be 3 or 4 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            country: "India".to_string(),
            phone: "+91 98450 00000".to_string(),
        }
    }

    fn payment() -> PaymentDetails {
        PaymentDetails {
            card_name: "Asha Rao".to_string(),
            card_number: "4111 1111 1111 1111".to_string(),
            expiry_date: "08/28".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("asha@example.com").is_ok());
        assert!(validate_email("  asha@example.co.in ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("asha").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("asha@example").is_err());
        assert!(validate_email("asha@.com").is_err());
        assert!(validate_email("as ha@example.com").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(MAX_CART_LINES - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_LINES).is_err());
    }

    #[test]
    fn test_validate_shipping() {
        assert!(validate_shipping(&shipping()).is_ok());

        let mut missing_city = shipping();
        missing_city.city = "  ".to_string();
        assert!(matches!(
            validate_shipping(&missing_city),
            Err(ValidationError::Required { field }) if field == "city"
        ));

        let mut elsewhere = shipping();
        elsewhere.country = "Atlantis".to_string();
        assert!(matches!(
            validate_shipping(&elsewhere),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_validate_payment() {
        assert!(validate_payment(&payment()).is_ok());

        let mut short = payment();
        short.card_number = "4111 1111".to_string();
        assert!(validate_payment(&short).is_err());

        let mut letters = payment();
        letters.card_number = "4111-1111-1111-1111".to_string();
        assert!(validate_payment(&letters).is_err());

        let mut month = payment();
        month.expiry_date = "13/28".to_string();
        assert!(matches!(
            validate_payment(&month),
            Err(ValidationError::OutOfRange { .. })
        ));

        let mut format = payment();
        format.expiry_date = "8/28".to_string();
        assert!(validate_payment(&format).is_err());

        let mut cvv = payment();
        cvv.cvv = "12a".to_string();
        assert!(validate_payment(&cvv).is_err());
    }

    #[test]
    fn test_search_query_trimmed_and_capped() {
        assert_eq!(validate_search_query("  pearl ").unwrap(), "pearl");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }
}
