//! # Validation Module
//!
//! Input validation for the catalog and partner forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Screen form (client side)                                 │
//! │  └── Basic format checks, immediate user feedback                   │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: API handler (Rust)                                        │
//! │  └── THIS MODULE: business rule validation                          │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  └── NOT NULL / CHECK / foreign key constraints                     │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product or partner name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a product category label.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a partner phone number.
///
/// ## Rules
/// - May be empty (walk-in customers have no phone on file)
/// - At most 30 characters; digits, spaces, `+` and `-` only
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.len() > 30 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 30,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, '+' and '-'".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount in cents (price, cost, discount, payment).
pub fn validate_amount(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a stock threshold or level entered on the product form.
pub fn validate_stock_level(field: &str, level: i64) -> ValidationResult<()> {
    // Checkout may drive stock negative later; the form itself only
    // accepts non-negative entries.
    if level < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a cart line quantity.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 || quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
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
    fn test_validate_name() {
        assert!(validate_name("جزمة جلد طبيعي").is_ok());
        assert!(validate_name("  ").is_err());
        assert!(validate_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("أحذية").is_ok());
        assert!(validate_category("").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("").is_ok());
        assert!(validate_phone("+20 100-555-0199").is_ok());
        assert!(validate_phone("not a phone").is_err());
        assert!(validate_phone(&"1".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("price", 0).is_ok());
        assert!(validate_amount("price", 45000).is_ok());
        assert!(validate_amount("price", -1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }
}
