//! # Validation Module
//!
//! Input validation for catalog entries, orders and batch moves.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE                                                   │
//! │  ├── Format checks (empty, length, charset)                             │
//! │  └── Numeric bounds (quantity, price)                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Codec / lifecycle rules                                       │
//! │  └── Does the code exist? Is the stage move legal?                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── UNIQUE (sku), UNIQUE (sku, suffix)                                 │
//! │  ├── CHECK (quantity > 0)                                               │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_SKU_LEN: usize = 20;
const MAX_SUFFIX_LEN: usize = 12;
const MAX_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a master SKU.
///
/// ## Rules
/// - Must not be empty
/// - At most 20 characters
/// - ASCII letters and digits only, so the codec can scan it
///
/// ## Example
/// ```rust
/// use aurum_core::validation::validate_sku;
///
/// assert!(validate_sku("DA050").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("DA-050").is_err());
/// assert!(validate_sku("da050").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    if sku.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    // Codes are uppercased before lookup, so a stored master must already be.
    if !sku.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only uppercase ASCII letters and digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a variant suffix (finish + stone).
///
/// Empty is allowed: it is the plain lustre piece.
pub fn validate_variant_suffix(suffix: &str) -> ValidationResult<()> {
    if suffix.len() > MAX_SUFFIX_LEN {
        return Err(ValidationError::TooLong {
            field: "variant_suffix".to_string(),
            max: MAX_SUFFIX_LEN,
        });
    }

    if !suffix.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "variant_suffix".to_string(),
            reason: "must contain only uppercase ASCII letters".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (product or customer).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line or batch quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (9999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (samples, gifts).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the number of lines on an order.
pub fn validate_order_lines(lines: usize) -> ValidationResult<()> {
    if lines == 0 {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if lines > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use aurum_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("DA050").is_ok());
        assert!(validate_sku("MR220").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("DA 050").is_err());
        assert!(validate_sku("ΔΑ050").is_err());
        assert!(validate_sku(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_sku_rejects_lowercase_master() {
        assert!(matches!(
            validate_sku("da050"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_sku("Da050").is_err());
        assert!(validate_sku(" DA050").is_err());
    }

    #[test]
    fn test_validate_variant_suffix() {
        assert!(validate_variant_suffix("").is_ok());
        assert!(validate_variant_suffix("XKRX").is_ok());
        assert!(validate_variant_suffix("xkr").is_err());
        assert!(validate_variant_suffix("X1").is_err());
        assert!(validate_variant_suffix(&"X".repeat(13)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Olive branch ring").is_ok());
        assert!(validate_name("customer_name", " ").is_err());
        assert!(validate_name("name", &"Δ".repeat(200)).is_ok());
        assert!(validate_name("name", &"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(9999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(10_000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(4500).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_order_lines() {
        assert!(validate_order_lines(1).is_ok());
        assert!(validate_order_lines(0).is_err());
        assert!(validate_order_lines(MAX_ORDER_LINES + 1).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("123").is_err());
    }
}
