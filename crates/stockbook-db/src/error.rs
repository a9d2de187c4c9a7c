//! # Database Error Types
//!
//! Error types for database operations and their translation into the
//! domain taxonomy.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DomainError (stockbook-core) ← What the service and callers see       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Interface layer displays the error kind                               │
//! │                                                                         │
//! │  The second hop flattens storage vocabulary into messages; no sqlx     │
//! │  type ever crosses the repository boundary.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockbook_core::DomainError;
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context before the
/// repository boundary translates them to [`DomainError`].
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate SKU
    /// - Any UNIQUE index violation
    #[error("duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent variant_id or doc_id
    /// - Deleting a variant still referenced by document items (RESTRICT)
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (e.g., a zero quantity or an unknown
    /// doc_type slipping past validation).
    #[error("check constraint violation: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE: "UNIQUE constraint failed: <table>.<column>"
                // FK:     "FOREIGN KEY constraint failed"
                // CHECK:  "CHECK constraint failed: <expr>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// The repository-boundary translation required by the domain contracts:
/// uniqueness becomes `Duplicate`, missing rows become `NotFound`, and every
/// other storage fault is flattened into `Persistence` so nothing above this
/// crate ever matches on SQLite vocabulary.
impl From<DbError> for DomainError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => DomainError::NotFound { entity, id },
            DbError::UniqueViolation { field, value } => DomainError::Duplicate { field, value },
            other => DomainError::Persistence(other.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_translates_to_duplicate() {
        let db_err = DbError::UniqueViolation {
            field: "variants.sku".to_string(),
            value: "ZOOM-42".to_string(),
        };
        let domain: DomainError = db_err.into();
        assert!(matches!(domain, DomainError::Duplicate { .. }));
    }

    #[test]
    fn test_storage_faults_flatten_to_persistence() {
        let db_err = DbError::QueryFailed("disk I/O error".to_string());
        let domain: DomainError = db_err.into();
        match domain {
            DomainError::Persistence(msg) => assert!(msg.contains("disk I/O error")),
            other => panic!("expected Persistence, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found_survives_translation() {
        let domain: DomainError = DbError::not_found("Variant", "v1").into();
        assert!(matches!(domain, DomainError::NotFound { .. }));
    }
}
