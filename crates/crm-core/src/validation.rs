//! # Validation Module
//!
//! Input validation utilities for the CRM backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport (external collaborator)                             │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── Required-field presence                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation (fast fail)            │
//! │  ├── Phone format, price positivity, stock range                        │
//! │  └── Pure functions, no store access                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite) - source of truth                           │
//! │  ├── UNIQUE constraint on customers.email                               │
//! │  ├── Foreign key constraints on orders                                  │
//! │  └── CHECK constraints on price/stock                                   │
//! │                                                                         │
//! │  Defense in depth: the pre-checks here are advisory; the store          │
//! │  enforces uniqueness and referential integrity under concurrency.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use crm_core::validation::{validate_phone, validate_price_cents};
//!
//! validate_phone("+12345678901").unwrap();
//! validate_price_cents(99999).unwrap();
//! ```

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ValidationError, ValidationResult};

/// Accepted phone formats: international (`+` and 10-15 digits) or local
/// dashed (`ddd-ddd-dddd`).
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+\d{10,15}|\d{3}-\d{3}-\d{4})$").expect("valid phone regex"));

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty (after trimming)
///
/// ## Example
/// ```rust
/// use crm_core::validation::validate_customer_name;
///
/// assert!(validate_customer_name("Alice Carter").is_ok());
/// assert!(validate_customer_name("   ").is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::invalid_value("name", "must not be empty"));
    }

    Ok(())
}

/// Validates a phone number format.
///
/// ## Rules
/// - `+` followed by 10-15 digits, e.g. `+12345678901`
/// - or local dashed form, e.g. `123-456-7890`
///
/// The field itself is optional; callers only validate present values.
///
/// ## Example
/// ```rust
/// use crm_core::validation::validate_phone;
///
/// assert!(validate_phone("+12345678901").is_ok());
/// assert!(validate_phone("123-456-7890").is_ok());
/// assert!(validate_phone("12345").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if !PHONE_REGEX.is_match(phone) {
        return Err(ValidationError::invalid_format(
            "phone",
            "use +1234567890 or 123-456-7890",
        ));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product price in cents.
///
/// ## Rules
/// - Must be strictly positive (> 0); free products are not a thing here
///
/// ## Example
/// ```rust
/// use crm_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(4999).is_ok());
/// assert!(validate_price_cents(0).is_err());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::invalid_value(
            "price",
            "must be positive",
        ));
    }

    Ok(())
}

/// Validates an optional stock level and resolves its default.
///
/// ## Rules
/// - If supplied, must be >= 0
/// - Absent stock defaults to 0
///
/// ## Returns
/// The resolved stock value.
pub fn validate_stock(stock: Option<i64>) -> ValidationResult<i64> {
    match stock {
        Some(value) if value < 0 => Err(ValidationError::invalid_value(
            "stock",
            "cannot be negative",
        )),
        Some(value) => Ok(value),
        None => Ok(0),
    }
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates an order's product id list.
///
/// ## Rules
/// - Must contain at least one id
/// - Must not contain duplicates (the resolved product set must have the
///   same cardinality as the requested list)
///
/// Referential existence of each id is checked against the store by the
/// mutation service; a missing id is a `NotFound` there, not here.
pub fn validate_product_ids(product_ids: &[String]) -> ValidationResult<()> {
    if product_ids.is_empty() {
        return Err(ValidationError::invalid_value(
            "product_ids",
            "at least one product must be selected",
        ));
    }

    let unique: HashSet<&str> = product_ids.iter().map(String::as_str).collect();
    if unique.len() != product_ids.len() {
        return Err(ValidationError::invalid_value(
            "product_ids",
            "duplicate product ids",
        ));
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
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Alice Carter").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
    }

    #[test]
    fn test_validate_phone_accepts_both_formats() {
        assert!(validate_phone("+12345678901").is_ok());
        assert!(validate_phone("123-456-7890").is_ok());
        // 15 digits is the upper bound of the international form
        assert!(validate_phone("+123456789012345").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_malformed() {
        assert!(matches!(
            validate_phone("12345"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_phone("abc-def-ghij"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        // too short for the international form
        assert!(validate_phone("+123456789").is_err());
        // too long
        assert!(validate_phone("+1234567890123456").is_err());
        // dashed form with wrong grouping
        assert!(validate_phone("12-3456-7890").is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(1).is_ok());
        assert!(validate_price_cents(99999).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_stock_defaults_to_zero() {
        assert_eq!(validate_stock(None).unwrap(), 0);
        assert_eq!(validate_stock(Some(5)).unwrap(), 5);
        assert_eq!(validate_stock(Some(0)).unwrap(), 0);
        assert!(validate_stock(Some(-1)).is_err());
    }

    #[test]
    fn test_validate_product_ids() {
        let ids = vec!["p1".to_string(), "p2".to_string()];
        assert!(validate_product_ids(&ids).is_ok());

        assert!(matches!(
            validate_product_ids(&[]),
            Err(ValidationError::InvalidValue { .. })
        ));

        let dup = vec!["p1".to_string(), "p1".to_string()];
        assert!(validate_product_ids(&dup).is_err());
    }
}
