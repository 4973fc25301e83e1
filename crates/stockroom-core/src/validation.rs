//! # Validation
//!
//! Field rules for the signup, item and product forms.
//!
//! ## Where Input Gets Checked
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input controls (CLI flags, quantity fields)                  │
//! │  └── parse_quantity_input: keep previous value on bad input            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: field rules before a request is built           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Authority on stock, identity and over-commit                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_BILL_QUANTITY;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum length of a signup password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Minimum length of a signup display name.
pub const MIN_NAME_LEN: usize = 2;

/// Number of digits in a one-time password.
pub const OTP_LEN: usize = 6;

// =============================================================================
// Quantity Input
// =============================================================================

/// Parses the text of a bill quantity input.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Must be an integer
/// - Must be positive (> 0)
/// - Must not exceed MAX_BILL_QUANTITY
///
/// Callers keep the previous quantity when this returns an error, so a
/// half-typed value never reaches the cart.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::parse_quantity_input;
///
/// assert_eq!(parse_quantity_input("3").unwrap(), 3);
/// assert!(parse_quantity_input("").is_err());
/// assert!(parse_quantity_input("0").is_err());
/// assert!(parse_quantity_input("2.5").is_err());
/// assert!(parse_quantity_input("9223372036854775807").is_err());
/// ```
pub fn parse_quantity_input(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    let qty: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_BILL_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_BILL_QUANTITY,
        });
    }

    Ok(qty)
}

/// Validates a stock level entered on the item form.
///
/// Zero is allowed (item tracked but sold out).
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item or product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Only the shape is checked: one `@`, something on each side, a dot in
/// the domain. The backend decides whether the address is real.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.contains(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a signup password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates the display name given at signup.
pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a one-time password: exactly six ASCII digits.
pub fn validate_otp(otp: &str) -> ValidationResult<()> {
    let otp = otp.trim();

    if otp.is_empty() {
        return Err(ValidationError::Required {
            field: "otp".to_string(),
        });
    }

    if otp.len() != OTP_LEN || !otp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "otp".to_string(),
            reason: format!("must be {OTP_LEN} digits"),
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

    #[test]
    fn test_parse_quantity_input() {
        assert_eq!(parse_quantity_input("1").unwrap(), 1);
        assert_eq!(parse_quantity_input(" 12 ").unwrap(), 12);

        assert!(matches!(
            parse_quantity_input(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_quantity_input("abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_quantity_input("-2"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(parse_quantity_input("0").is_err());
        assert!(parse_quantity_input("1.5").is_err());
    }

    #[test]
    fn test_parse_quantity_input_upper_bound() {
        assert_eq!(
            parse_quantity_input(&MAX_BILL_QUANTITY.to_string()).unwrap(),
            MAX_BILL_QUANTITY
        );
        assert!(matches!(
            parse_quantity_input(&(MAX_BILL_QUANTITY + 1).to_string()),
            Err(ValidationError::OutOfRange { max: MAX_BILL_QUANTITY, .. })
        ));
        assert!(matches!(
            parse_quantity_input("9223372036854775807"),
            Err(ValidationError::OutOfRange { .. })
        ));
        // Too large for i64 at all.
        assert!(matches!(
            parse_quantity_input("99999999999999999999"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_stock_and_price() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Blue Pen").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("owner@shop.in").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("owner").is_err());
        assert!(validate_email("@shop.in").is_err());
        assert!(validate_email("owner@shop").is_err());
        assert!(validate_email("own er@shop.in").is_err());
        assert!(validate_email("a@b@shop.in").is_err());
    }

    #[test]
    fn test_validate_password_and_name() {
        assert!(validate_password("hunter22").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("").is_err());

        assert!(validate_display_name("Al").is_ok());
        assert!(validate_display_name("A").is_err());
    }

    #[test]
    fn test_validate_otp() {
        assert!(validate_otp("123456").is_ok());
        assert!(validate_otp("12345").is_err());
        assert!(validate_otp("12345a").is_err());
        assert!(validate_otp("").is_err());
    }
}
