//! # Error Types
//!
//! Domain error taxonomy for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbook-core errors (this file)                                     │
//! │  ├── ValidationError  - Malformed input, raised before persistence     │
//! │  └── DomainError      - Everything a service caller can observe        │
//! │                                                                         │
//! │  stockbook-db errors (separate crate)                                  │
//! │  └── DbError          - Storage faults, translated to DomainError      │
//! │                         at the repository boundary                     │
//! │                                                                         │
//! │  Flow: sqlx::Error → DbError → DomainError → interface message         │
//! │                                                                         │
//! │  Nothing above the repositories ever sees storage vocabulary.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, variant id, shortfall)
//! 3. Errors are enum variants, never String
//! 4. Translate explicitly at each layer hop; never re-wrap blindly

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the service before any persistence attempt; a failed validation
/// never touches a repository.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value must not be zero (ADJUST lines may be negative,
    /// but a zero line is meaningless in a ledger).
    #[error("{field} must not be zero")]
    MustBeNonZero { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., unknown doc_type, malformed SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A collection that must have members is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },
}

// =============================================================================
// Domain Error
// =============================================================================

/// The typed failure surface of the inventory core.
///
/// Every service and repository operation returns one of these; the
/// interface layer's only job is to present the kind to the user.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed input (empty item list, zero quantity, bad doc_type).
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// OUTBOUND pre-check failure. Carries the variant and the numbers
    /// needed to compute the shortfall; the whole document was aborted.
    #[error("insufficient stock for variant {variant_id}: available {available}, requested {requested}")]
    OutOfStock {
        variant_id: String,
        requested: i64,
        available: i64,
    },

    /// Uniqueness violation (e.g., SKU), surfaced from persistence and
    /// translated at the repository boundary.
    #[error("duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A domain rule was violated that no more specific variant covers.
    #[error("business rule violated: {0}")]
    BusinessRule(String),

    /// Any lower-level storage fault, with its cause flattened into a
    /// message so storage-specific types never leak upward.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl DomainError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DomainError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a Persistence error from any displayable cause.
    pub fn persistence(cause: impl std::fmt::Display) -> Self {
        DomainError::Persistence(cause.to_string())
    }

    /// For [`DomainError::OutOfStock`], the number of units missing.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::error::DomainError;
    ///
    /// let err = DomainError::OutOfStock {
    ///     variant_id: "v1".to_string(),
    ///     requested: 6,
    ///     available: 5,
    /// };
    /// assert_eq!(err.shortfall(), Some(1));
    /// ```
    pub fn shortfall(&self) -> Option<i64> {
        match self {
            DomainError::OutOfStock {
                requested,
                available,
                ..
            } => Some(requested - available),
            _ => None,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with DomainError.
pub type DomainResult<T> = Result<T, DomainError>;

// =============================================================================
// Unit Tests
// =============================================================================
