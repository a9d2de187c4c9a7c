//! # Repository Module
//!
//! SQLite implementations of the stockbook-core repository contracts.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Contract ↔ Implementation                            │
//! │                                                                         │
//! │  InventoryService (stockbook-core)                                     │
//! │       │                                                                 │
//! │       │  dyn VariantRepository::apply_stock_delta(id, -3)              │
//! │       ▼                                                                 │
//! │  SqliteVariantRepository (THIS MODULE)                                 │
//! │       │                                                                 │
//! │       │  UPDATE variants SET stock_qty = stock_qty - 3 ...             │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Every method translates its storage faults to DomainError before     │
//! │  returning; the core never sees an sqlx type.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::SqliteProductRepository`] - Product CRUD and substring search
//! - [`variant::SqliteVariantRepository`] - Variant CRUD and snapshot writes
//! - [`document::SqliteDocumentRepository`] - Transactional document + item
//!   writes and the ledger read path

pub mod document;
pub mod product;
pub mod variant;
