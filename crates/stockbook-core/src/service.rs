//! # Inventory Service
//!
//! Orchestrates every stock mutation and all catalog management.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 create_document Control Flow                            │
//! │                                                                         │
//! │  caller                                                                 │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  1. validate item list          ──► ValidationError (nothing touched)  │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  2. resolve variants            ──► NotFound (nothing touched)         │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  3. OUTBOUND pre-check          ──► OutOfStock (nothing touched)       │
//! │    │   (per-variant aggregate)                                          │
//! │    ▼                                                                    │
//! │  4. persist header + items atomically (repository contract)            │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  5. apply per-variant deltas (fast path)                               │
//! │        └── on failure: recompute from ledger; on failure again:        │
//! │            log at ERROR - the cache drifts but is re-derivable,        │
//! │            while the posted document must not be lost                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no other write path: no direct stock increment API
//! exists anywhere in the crate.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::repository::{DocumentFilter, DocumentRepository, ProductRepository, VariantRepository};
use crate::stock::{document_impact, StockLedger};
use crate::types::{
    DocType, Document, DocumentDetail, DocumentItem, NewDocument, NewProduct, NewVariant, Product,
    Variant,
};
use crate::{validation, DEFAULT_SAFETY_STOCK};

// =============================================================================
// Inventory Service
// =============================================================================

/// The application service every interface layer talks to.
///
/// Constructed at the composition root from the three repository contracts;
/// see `stockbook-db`'s `Database::inventory_service()` for the SQLite
/// wiring.
#[derive(Clone)]
pub struct InventoryService {
    products: Arc<dyn ProductRepository>,
    variants: Arc<dyn VariantRepository>,
    documents: Arc<dyn DocumentRepository>,
    ledger: StockLedger,
}

impl InventoryService {
    /// Wires a service from injected repository implementations.
    pub fn new(
        products: Arc<dyn ProductRepository>,
        variants: Arc<dyn VariantRepository>,
        documents: Arc<dyn DocumentRepository>,
    ) -> Self {
        let ledger = StockLedger::new(variants.clone(), documents.clone());
        InventoryService {
            products,
            variants,
            documents,
            ledger,
        }
    }

    /// The stock calculation engine behind this service.
    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    // =========================================================================
    // Documents (the only stock write path)
    // =========================================================================

    /// Posts a new inventory document.
    ///
    /// All-or-nothing: any validation or stock-check failure leaves the
    /// ledger untouched. See the module diagram for the full flow.
    pub async fn create_document(&self, new_doc: NewDocument) -> DomainResult<DocumentDetail> {
        validation::validate_document(&new_doc)?;

        // Resolve every referenced variant up front; a dangling reference
        // aborts before anything is written.
        let mut seen: HashSet<&str> = HashSet::new();
        for item in &new_doc.items {
            if seen.insert(item.variant_id.as_str()) {
                self.require_variant(&item.variant_id).await?;
            }
        }

        let impact = document_impact(
            new_doc.doc_type,
            new_doc.items.iter().map(|i| (i.variant_id.as_str(), i.quantity)),
        );

        // OUTBOUND guard: aggregate requested quantity per variant, checked
        // in item order so the first insufficient variant is reported.
        if new_doc.doc_type == DocType::Outbound {
            let mut checked: HashSet<&str> = HashSet::new();
            for item in &new_doc.items {
                if !checked.insert(item.variant_id.as_str()) {
                    continue;
                }
                let requested = -impact[item.variant_id.as_str()];
                let available = self.require_variant(&item.variant_id).await?.stock_qty;
                if requested > available {
                    return Err(DomainError::OutOfStock {
                        variant_id: item.variant_id.clone(),
                        requested,
                        available,
                    });
                }
            }
        }

        // ADJUST may drive a snapshot negative to correct drift, but the
        // bypass must never happen silently.
        if new_doc.doc_type == DocType::Adjust {
            for (variant_id, delta) in &impact {
                let current = self.require_variant(variant_id).await?.stock_qty;
                if current + delta < 0 {
                    warn!(
                        variant_id = variant_id.as_str(),
                        current,
                        delta,
                        "adjustment drives stock below zero (drift correction)"
                    );
                }
            }
        }

        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4().to_string(),
            doc_type: new_doc.doc_type,
            doc_date: new_doc.doc_date,
            note: new_doc.note.clone(),
            created_at: now,
        };
        let items: Vec<DocumentItem> = new_doc
            .items
            .iter()
            .map(|i| DocumentItem {
                id: Uuid::new_v4().to_string(),
                doc_id: document.id.clone(),
                variant_id: i.variant_id.clone(),
                quantity: i.quantity,
                unit_price_cents: i.unit_price_cents,
            })
            .collect();

        // One atomic unit per the repository contract: header + all items.
        self.documents.create(&document, &items).await?;

        // Fast-path snapshot updates. The document is already durable, so a
        // failing delta degrades to re-derivation instead of rollback.
        for (variant_id, delta) in &impact {
            if let Err(err) = self.ledger.apply_delta(variant_id, *delta).await {
                warn!(
                    variant_id = variant_id.as_str(),
                    delta,
                    %err,
                    "stock delta failed after document write; re-deriving from ledger"
                );
                if let Err(err) = self.ledger.recompute_and_store(variant_id).await {
                    error!(
                        variant_id = variant_id.as_str(),
                        %err,
                        "stock snapshot is stale; re-derivation also failed"
                    );
                }
            }
        }

        info!(
            document_id = %document.id,
            doc_type = %document.doc_type,
            lines = items.len(),
            "document posted"
        );
        Ok(DocumentDetail { document, items })
    }

    /// Deletes a posted document and reverses its stock contribution.
    ///
    /// The snapshot of every touched variant is fully re-derived from the
    /// remaining ledger - never decremented blindly, since a reverse delta
    /// cannot be trusted if the rows were ever edited externally.
    pub async fn delete_document(&self, document_id: &str) -> DomainResult<()> {
        let detail = self
            .documents
            .get_by_id(document_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Document", document_id))?;

        self.documents.delete(document_id).await?;

        let affected: HashSet<&str> = detail.items.iter().map(|i| i.variant_id.as_str()).collect();
        let mut first_failure: Option<DomainError> = None;
        for variant_id in affected {
            if let Err(err) = self.ledger.recompute_and_store(variant_id).await {
                error!(variant_id, %err, "stock recompute failed after document deletion");
                first_failure.get_or_insert(err);
            }
        }

        info!(document_id, doc_type = %detail.document.doc_type, "document deleted");
        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Lists document headers matching the filter.
    pub async fn list_documents(&self, filter: &DocumentFilter) -> DomainResult<Vec<Document>> {
        self.documents.list(filter).await
    }

    /// Fetches one document with all of its items.
    pub async fn document_detail(&self, document_id: &str) -> DomainResult<DocumentDetail> {
        self.documents
            .get_by_id(document_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Document", document_id))
    }

    // =========================================================================
    // Stock Queries & Snapshot Management
    // =========================================================================

    /// Authoritative stock for a variant, derived from the full ledger.
    pub async fn current_stock(&self, variant_id: &str) -> DomainResult<i64> {
        self.require_variant(variant_id).await?;
        self.ledger.compute_stock(variant_id).await
    }

    /// True when the variant's stock is strictly below its safety threshold.
    pub async fn check_safety_stock(&self, variant_id: &str) -> DomainResult<bool> {
        let variant = self.require_variant(variant_id).await?;
        Ok(variant.is_low_stock())
    }

    /// Every variant currently under its safety threshold.
    pub async fn low_stock_variants(&self) -> DomainResult<Vec<Variant>> {
        let all = self.variants.list_all().await?;
        Ok(all.into_iter().filter(Variant::is_low_stock).collect())
    }

    /// Explicit, separately-authorized snapshot overwrite for initial data
    /// load or drift correction. Never called by the document paths.
    pub async fn reinitialize_stock(&self, variant_id: &str, quantity: i64) -> DomainResult<()> {
        if quantity < 0 {
            return Err(crate::error::ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }
        self.ledger.reinitialize(variant_id, quantity).await
    }

    // =========================================================================
    // Catalog: Products
    // =========================================================================

    /// Creates a new product style.
    pub async fn create_product(&self, input: NewProduct) -> DomainResult<Product> {
        validation::validate_name("name", &input.name)?;
        validation::validate_name("brand", &input.brand)?;
        validation::validate_price_cents(input.base_price_cents)?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            brand: input.brand,
            category: input.category,
            base_price_cents: input.base_price_cents,
            description: input.description,
            created_at: Utc::now(),
        };
        self.products.create(&product).await?;

        debug!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Updates a product's catalog fields.
    pub async fn update_product(&self, product: &Product) -> DomainResult<()> {
        validation::validate_name("name", &product.name)?;
        validation::validate_name("brand", &product.brand)?;
        validation::validate_price_cents(product.base_price_cents)?;
        self.products.update(product).await
    }

    /// Deletes a product; its variants go with it (repository cascade).
    pub async fn delete_product(&self, product_id: &str) -> DomainResult<()> {
        self.products.delete(product_id).await?;
        info!(product_id, "product deleted (variants cascaded)");
        Ok(())
    }

    /// Lists all products, newest first.
    pub async fn list_products(&self) -> DomainResult<Vec<Product>> {
        self.products.list().await
    }

    /// Substring search over the catalog.
    pub async fn search_products(&self, keyword: &str) -> DomainResult<Vec<Product>> {
        self.products.search(keyword).await
    }

    // =========================================================================
    // Catalog: Variants
    // =========================================================================

    /// Creates a stock-keeping unit under a product.
    ///
    /// Generates a SKU when none is supplied; a taken SKU fails with
    /// `Duplicate` and leaves the existing variant intact. Stock always
    /// starts at zero - quantities enter through documents.
    pub async fn create_variant(&self, input: NewVariant) -> DomainResult<Variant> {
        validation::validate_name("size", &input.size)?;
        validation::validate_name("color", &input.color)?;

        self.products
            .get_by_id(&input.product_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product", &input.product_id))?;

        let sku = match input.sku {
            Some(sku) => {
                validation::validate_sku(&sku)?;
                sku
            }
            None => generate_sku(&input.size, &input.color),
        };

        let safety_stock = input.safety_stock.unwrap_or(DEFAULT_SAFETY_STOCK);
        validation::validate_safety_stock(safety_stock)?;

        let variant = Variant {
            id: Uuid::new_v4().to_string(),
            product_id: input.product_id,
            size: input.size,
            color: input.color,
            sku: Some(sku),
            stock_qty: 0,
            safety_stock,
        };
        self.variants.create(&variant).await?;

        debug!(variant_id = %variant.id, sku = ?variant.sku, "variant created");
        Ok(variant)
    }

    /// Updates a variant's catalog fields and safety threshold.
    ///
    /// `stock_qty` is persisted as-is per the repository contract, so
    /// callers must not use this to move stock; documents do that.
    pub async fn update_variant(&self, variant: &Variant) -> DomainResult<()> {
        validation::validate_name("size", &variant.size)?;
        validation::validate_name("color", &variant.color)?;
        if let Some(sku) = &variant.sku {
            validation::validate_sku(sku)?;
        }
        validation::validate_safety_stock(variant.safety_stock)?;
        self.variants.update(variant).await
    }

    /// Deletes a variant, refused while any ledger row references it.
    pub async fn delete_variant(&self, variant_id: &str) -> DomainResult<()> {
        self.require_variant(variant_id).await?;

        let ledger_rows = self.documents.ledger_for_variant(variant_id).await?;
        if !ledger_rows.is_empty() {
            return Err(DomainError::BusinessRule(format!(
                "variant {} is referenced by {} document line(s) and cannot be deleted",
                variant_id,
                ledger_rows.len()
            )));
        }

        self.variants.delete(variant_id).await
    }

    /// Lists the variants of one product.
    pub async fn variants_for_product(&self, product_id: &str) -> DomainResult<Vec<Variant>> {
        self.variants.list_by_product(product_id).await
    }

    /// Fetches one variant, `None` when the id is unknown.
    pub async fn variant_by_id(&self, variant_id: &str) -> DomainResult<Option<Variant>> {
        self.variants.get_by_id(variant_id).await
    }

    /// Looks a variant up by its business key.
    pub async fn variant_by_sku(&self, sku: &str) -> DomainResult<Option<Variant>> {
        self.variants.get_by_sku(sku).await
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    async fn require_variant(&self, variant_id: &str) -> DomainResult<Variant> {
        self.variants
            .get_by_id(variant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Variant", variant_id))
    }
}

// =============================================================================
// SKU Generation
// =============================================================================

/// Builds a SKU from the variant's specification axes plus a random suffix.
///
/// ## Format
/// `{SIZE}-{COLOR}-{8 hex chars}`, with the axes uppercased and squeezed to
/// alphanumerics.
///
/// ## Example
/// `US 9.5` / `wine red` → `US95-WINERED-3F0A9C12`
pub fn generate_sku(size: &str, color: &str) -> String {
    let squeeze = |s: &str| -> String {
        s.chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_uppercase()
    };

    let suffix: String = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("{}-{}-{}", squeeze(size), squeeze(color), suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================
