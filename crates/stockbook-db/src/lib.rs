//! # stockbook-db: Database Layer for Stockbook
//!
//! This crate provides database access for the Stockbook inventory manager.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Data Flow                              │
//! │                                                                         │
//! │  InventoryService (stockbook-core)                                     │
//! │       │ repository contracts (traits)                                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    stockbook-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  product.rs   │    │  (embedded)  │  │   │
//! │  │   │               │    │  variant.rs   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  document.rs  │    │ 001_init.sql │  │   │
//! │  │   │ composition   │    │               │    │              │  │   │
//! │  │   │ root          │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite single-file database (WAL mode, foreign keys on)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, configuration, and the composition root
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and boundary translation
//! - [`repository`] - Contract implementations (product, variant, document)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockbook_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/stockbook.db")).await?;
//! let service = db.inventory_service();
//!
//! let posted = service.create_document(new_doc).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::document::SqliteDocumentRepository;
pub use repository::product::SqliteProductRepository;
pub use repository::variant::SqliteVariantRepository;
