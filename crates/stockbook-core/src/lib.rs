//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate is the **heart** of Stockbook, a small warehouse manager built
//! around one rule: stock is a value *derived* from a document ledger, never a
//! freely mutable counter.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stockbook Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Interface layer (GUI/CLI, external)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockbook-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   stock   │  │  service  │  │ repository│  │   │
//! │  │   │  Product  │  │  Ledger   │  │ Inventory │  │ contracts │  │   │
//! │  │   │  Variant  │  │  engine   │  │  Service  │  │  (traits) │  │   │
//! │  │   │  Document │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO SQL • CONTRACTS ONLY               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ implemented by                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockbook-db (SQLite layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Product, Variant, Document, DocumentItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Input validation rules
//! - [`repository`] - Abstract persistence contracts
//! - [`stock`] - The stock calculation engine (ledger → quantity)
//! - [`service`] - InventoryService, the single write path for stock
//!
//! ## Design Principles
//!
//! 1. **Ledger first**: every stock mutation is a Document + items; there is
//!    no direct increment API anywhere in this crate.
//! 2. **No I/O**: persistence is reached only through the trait contracts in
//!    [`repository`]; implementations are injected at the composition root.
//! 3. **Integer money**: all monetary values are cents (i64), never floats.
//! 4. **Explicit errors**: all failures are typed enum variants, translated
//!    at each layer boundary, never strings or panics.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod repository;
pub mod service;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockbook_core::Variant` instead of
// `use stockbook_core::types::Variant`

pub use error::{DomainError, DomainResult, ValidationError};
pub use money::Money;
pub use repository::{DocumentFilter, DocumentRepository, ProductRepository, VariantRepository};
pub use service::InventoryService;
pub use stock::StockLedger;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Safety-stock threshold applied to a new Variant when none is supplied.
///
/// ## Business Reason
/// Small warehouses want a low-water mark out of the box; five units is the
/// conventional reorder point for slow-moving apparel SKUs.
pub const DEFAULT_SAFETY_STOCK: i64 = 5;

/// Maximum absolute quantity of a single document line.
///
/// ## Business Reason
/// Prevents fat-finger entries (e.g., scanning 100000 instead of 100) from
/// poisoning the ledger. Warehouse-sized rather than POS-sized.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;
