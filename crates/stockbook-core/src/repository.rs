//! # Repository Contracts
//!
//! Abstract persistence operations, one contract per entity cluster.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The contracts abstract storage behind a clean async API.               │
//! │                                                                         │
//! │  InventoryService                                                      │
//! │       │                                                                 │
//! │       │  variants.apply_stock_delta(id, -3)                            │
//! │       ▼                                                                 │
//! │  dyn VariantRepository  ◄── trait object, injected at startup          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteVariantRepository (stockbook-db) - or an in-memory test double  │
//! │                                                                         │
//! │  The contracts declare WHAT must hold (atomicity, uniqueness,          │
//! │  cascade/restrict semantics) and say nothing about HOW: no SQL,        │
//! │  no transaction handles, no storage error types.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Contract
//! Every operation returns [`DomainResult`]. Implementations translate
//! storage faults into [`crate::error::DomainError::Persistence`] and
//! uniqueness violations into [`crate::error::DomainError::Duplicate`]
//! before returning; native storage errors never cross this boundary.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::DomainResult;
use crate::types::{
    DocType, Document, DocumentDetail, DocumentItem, LedgerEntry, Product, Variant,
};

// =============================================================================
// Product Contract
// =============================================================================

/// Persistence operations for Products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetches one product, `None` when the id is unknown.
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Product>>;

    /// Lists all products, newest first.
    async fn list(&self) -> DomainResult<Vec<Product>>;

    /// Case-insensitive substring search over name, brand, category and
    /// description. An empty keyword behaves like [`Self::list`].
    async fn search(&self, keyword: &str) -> DomainResult<Vec<Product>>;

    /// Inserts a product with all fields already assigned.
    async fn create(&self, product: &Product) -> DomainResult<()>;

    /// Updates a product in place; `NotFound` when the id is unknown.
    async fn update(&self, product: &Product) -> DomainResult<()>;

    /// Deletes a product. Must cascade to its variants.
    async fn delete(&self, id: &str) -> DomainResult<()>;
}

// =============================================================================
// Variant Contract
// =============================================================================

/// Persistence operations for Variants, including the two snapshot writes
/// the stock engine is allowed to make.
#[async_trait]
pub trait VariantRepository: Send + Sync {
    /// Fetches one variant, `None` when the id is unknown.
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Variant>>;

    /// Fetches a variant by its business key.
    async fn get_by_sku(&self, sku: &str) -> DomainResult<Option<Variant>>;

    /// Lists the variants of one product.
    async fn list_by_product(&self, product_id: &str) -> DomainResult<Vec<Variant>>;

    /// Lists every variant in the catalog (low-stock scans).
    async fn list_all(&self) -> DomainResult<Vec<Variant>>;

    /// Inserts a variant. A taken SKU fails with `Duplicate`.
    async fn create(&self, variant: &Variant) -> DomainResult<()>;

    /// Updates a variant's catalog fields and thresholds. Implementations
    /// must also persist `stock_qty` as given - callers go through the
    /// stock engine for that, never through ad-hoc updates.
    async fn update(&self, variant: &Variant) -> DomainResult<()>;

    /// Deletes a variant. Must be refused while any document item
    /// references it.
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Applies a relative change to the cached stock snapshot and returns
    /// the new value. The read-modify-write must be indivisible so the
    /// snapshot cannot tear; `NotFound` when the id is unknown.
    async fn apply_stock_delta(&self, id: &str, delta: i64) -> DomainResult<i64>;

    /// Overwrites the cached stock snapshot with an absolute value. The one
    /// sanctioned direct write; only the stock engine calls it.
    async fn set_stock(&self, id: &str, qty: i64) -> DomainResult<()>;
}

// =============================================================================
// Document Contract
// =============================================================================

/// Filter for document list queries.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Restrict to one document type.
    pub doc_type: Option<DocType>,
    /// Inclusive lower bound on `doc_date`.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `doc_date`.
    pub to: Option<NaiveDate>,
}

impl DocumentFilter {
    /// Filter matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching one document type.
    pub fn of_type(doc_type: DocType) -> Self {
        DocumentFilter {
            doc_type: Some(doc_type),
            ..Self::default()
        }
    }
}

/// Persistence operations for Documents and their ledger rows.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Fetches one document with all of its items, `None` when unknown.
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<DocumentDetail>>;

    /// Lists document headers matching the filter, newest business date
    /// first. Items are not loaded; use [`Self::get_by_id`] for detail.
    async fn list(&self, filter: &DocumentFilter) -> DomainResult<Vec<Document>>;

    /// Persists a header and all of its items as ONE atomic unit: either
    /// every row is visible afterwards or none is. This is the contract
    /// the whole ledger design rests on.
    async fn create(&self, document: &Document, items: &[DocumentItem]) -> DomainResult<()>;

    /// Deletes a document; its items go with it (ownership cascade).
    /// `NotFound` when the id is unknown.
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Returns every ledger row touching the given variant, with the owning
    /// document's type, in posting order. The stock engine's read path.
    async fn ledger_for_variant(&self, variant_id: &str) -> DomainResult<Vec<LedgerEntry>>;
}
