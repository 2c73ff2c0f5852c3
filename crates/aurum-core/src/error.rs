//! # Error Types
//!
//! Domain-specific error types for aurum-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  aurum-core errors (this file)                                         │
//! │  ├── CoreError        - Codec, range, lifecycle and fulfillment errors │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  aurum-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures (wraps CoreError)  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller UI               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable at the caller. The only condition this crate
//! refuses to recover from is a quantity mismatch after a split, which is an
//! assertion in [`crate::batch`].

use thiserror::Error;

use crate::batch::ProductionStage;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No catalog master SKU is a prefix of the scanned/typed code.
    ///
    /// ## When This Occurs
    /// - Typo at the keyboard
    /// - Barcode printed for a product since removed from the catalog
    /// - Code scanned from another vendor's label
    #[error("Unrecognized code: {0}")]
    UnrecognizedCode(String),

    /// The suffix left characters that are neither a finish nor a stone code.
    ///
    /// `decode` only logs this and keeps the residue on the result;
    /// `decode_strict` returns it.
    #[error("Code {code} has unrecognized suffix residue '{residue}'")]
    AmbiguousResidue { code: String, residue: String },

    /// The two sides of a range carry different alphabetic prefixes.
    ///
    /// ## Example
    /// ```text
    /// DA050-XR063
    /// ^^    ^^
    /// DA != XR → MismatchedRangePrefix
    /// ```
    #[error("Range sides have different prefixes: '{start}' vs '{end}'")]
    MismatchedRangePrefix { start: String, end: String },

    /// Range end is numerically before its start.
    #[error("Range end {end} is before start {start}")]
    InvalidRangeOrder { start: u64, end: u64 },

    /// Range would expand to more SKUs than the configured ceiling.
    #[error("Range expands to {count} SKUs, more than the limit of {max}")]
    RangeTooLarge { count: u64, max: usize },

    /// A range side could not be parsed.
    #[error("Invalid range token '{token}': {reason}")]
    InvalidRangeToken { token: String, reason: String },

    /// Move quantity is zero or exceeds the batch quantity.
    #[error("Cannot move {requested} from batch {batch_id} holding {available}")]
    InvalidSplitQuantity {
        batch_id: String,
        available: i64,
        requested: i64,
    },

    /// Target stage is not reachable from the batch's current stage.
    ///
    /// ## When This Occurs
    /// - Moving backwards (Polishing → Casting)
    /// - Moving to the current stage
    /// - Moving into Setting when the product has no stones
    /// - Moving an imported batch into a manufacturing stage
    #[error("Batch {batch_id} cannot move from {from} to {to}")]
    StageTransitionNotAllowed {
        batch_id: String,
        from: ProductionStage,
        to: ProductionStage,
    },

    /// Batch is at the terminal stage; no further transitions exist.
    #[error("Batch {0} is already ready")]
    TerminalStage(String),

    /// An order line references a SKU or variant that no longer exists.
    #[error("Order line {line} ({sku}{variant}) cannot be resolved: {reason}")]
    LineItemUnresolvable {
        line: usize,
        sku: String,
        variant: String,
        reason: String,
    },

    /// Price cipher keyword is not ten distinct letters.
    #[error("Invalid price keyword: {0}")]
    InvalidPriceKeyword(String),

    /// Price cannot be codified (negative) or decoded (foreign letters).
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid SKU characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate variant suffix).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidSplitQuantity {
            batch_id: "b-1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(err.to_string(), "Cannot move 5 from batch b-1 holding 3");

        let err = CoreError::StageTransitionNotAllowed {
            batch_id: "b-2".to_string(),
            from: ProductionStage::Casting,
            to: ProductionStage::Setting,
        };
        assert_eq!(err.to_string(), "Batch b-2 cannot move from casting to setting");
    }

    #[test]
    fn test_range_error_messages() {
        let err = CoreError::MismatchedRangePrefix {
            start: "DA".to_string(),
            end: "XR".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Range sides have different prefixes: 'DA' vs 'XR'"
        );

        let err = CoreError::RangeTooLarge { count: 900, max: 500 };
        assert_eq!(
            err.to_string(),
            "Range expands to 900 SKUs, more than the limit of 500"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
