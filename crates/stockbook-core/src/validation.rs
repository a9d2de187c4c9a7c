//! # Validation Module
//!
//! Input validation rules for Stockbook.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Interface (external)                                         │
//! │  └── Basic format checks, immediate user feedback                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (InventoryService calls it first)                │
//! │  └── Ledger rules: non-zero quantities, sign per doc type,             │
//! │      non-negative prices, non-empty item lists                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL, UNIQUE sku, CHECK quantity != 0, foreign keys           │
//! │                                                                         │
//! │  Defense in depth: the database constraints back the same rules.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{DocType, NewDocument};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_sku;
///
/// assert!(validate_sku("ZOOM-42-RED").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (product name, brand, size, color).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a document line quantity under the sign rules of its type.
///
/// ## Rules
/// ```text
/// INBOUND / OUTBOUND : quantity > 0   (sign comes from the type)
/// ADJUST             : quantity != 0  (signed delta, either direction)
/// all types          : |quantity| <= MAX_LINE_QUANTITY
/// ```
pub fn validate_quantity(doc_type: DocType, qty: i64) -> ValidationResult<()> {
    match doc_type {
        DocType::Inbound | DocType::Outbound => {
            if qty <= 0 {
                return Err(ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                });
            }
        }
        DocType::Adjust => {
            if qty == 0 {
                return Err(ValidationError::MustBeNonZero {
                    field: "quantity".to_string(),
                });
            }
        }
    }

    if qty.abs() > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: -MAX_LINE_QUANTITY,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free or unpriced movements)
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

/// Validates a safety-stock threshold.
pub fn validate_safety_stock(value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: "safety_stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Document Validators
// =============================================================================

/// Validates a whole document request before anything is persisted.
///
/// ## Rules
/// - The item list must be non-empty
/// - Every line quantity follows [`validate_quantity`]
/// - Every captured unit price is non-negative
pub fn validate_document(doc: &NewDocument) -> ValidationResult<()> {
    if doc.items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for item in &doc.items {
        validate_quantity(doc.doc_type, item.quantity)?;
        if let Some(price) = item.unit_price_cents {
            validate_price_cents(price)?;
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
