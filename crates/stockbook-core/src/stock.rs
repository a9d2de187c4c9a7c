//! # Stock Calculation Engine
//!
//! Derives variant stock from the document ledger.
//!
//! ## The Two Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Stock Derivation Paths                              │
//! │                                                                         │
//! │  AUTHORITATIVE (full rescan)                                            │
//! │    compute_stock(variant)                                               │
//! │      = Σ signed_delta(doc_type, quantity) over every ledger row        │
//! │                                                                         │
//! │  INCREMENTAL (fast path, right after posting/deleting a document)      │
//! │    apply_delta(variant, ±n)                                             │
//! │      UPDATE ... stock_qty = stock_qty + n   (relative, never absolute) │
//! │                                                                         │
//! │  CORRECTNESS PROPERTY                                                   │
//! │    After any successful sequence of operations:                        │
//! │      compute_stock(v) == cached stock_qty(v)                           │
//! │    The incremental path must never diverge from the rescan.            │
//! │                                                                         │
//! │  REPAIR                                                                 │
//! │    recompute_and_store(variant) re-derives the snapshot from the       │
//! │    ledger. Used after document deletion and as the recovery path       │
//! │    when an incremental update fails mid-flight.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Relative Updates?
//! An absolute write (`stock_qty = 7`) bakes a stale read into the cache if
//! anything changed between read and write. A relative update
//! (`stock_qty = stock_qty + delta`) composes with any interleaving, which
//! is what keeps the fast path equal to the rescan.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{DomainError, DomainResult};
use crate::repository::{DocumentRepository, VariantRepository};
use crate::types::DocType;

// =============================================================================
// Document Impact
// =============================================================================

/// Aggregates the per-variant signed stock contribution of one document.
///
/// Two lines touching the same variant fold into one delta, so posting and
/// rollback code always sees each variant exactly once.
///
/// ## Example
/// ```rust
/// use stockbook_core::stock::document_impact;
/// use stockbook_core::types::DocType;
///
/// let impact = document_impact(
///     DocType::Outbound,
///     [("v1", 3), ("v2", 1), ("v1", 2)],
/// );
/// assert_eq!(impact["v1"], -5);
/// assert_eq!(impact["v2"], -1);
/// ```
pub fn document_impact<'a, I>(doc_type: DocType, items: I) -> BTreeMap<String, i64>
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    let mut impact: BTreeMap<String, i64> = BTreeMap::new();
    for (variant_id, quantity) in items {
        *impact.entry(variant_id.to_string()).or_insert(0) += doc_type.signed_delta(quantity);
    }
    impact
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// The stock calculation engine.
///
/// Holds the two contracts it derives from; the service constructs one and
/// routes every snapshot write through it.
#[derive(Clone)]
pub struct StockLedger {
    variants: Arc<dyn VariantRepository>,
    documents: Arc<dyn DocumentRepository>,
}

impl StockLedger {
    /// Creates an engine over the given contracts.
    pub fn new(variants: Arc<dyn VariantRepository>, documents: Arc<dyn DocumentRepository>) -> Self {
        StockLedger { variants, documents }
    }

    /// Recomputes the authoritative quantity for a variant from its full
    /// ledger. A variant with zero ledger rows computes to 0.
    ///
    /// Pure read: safe to call at any time, holds no transaction, and never
    /// writes the snapshot (see [`Self::recompute_and_store`] for that).
    pub async fn compute_stock(&self, variant_id: &str) -> DomainResult<i64> {
        let entries = self.documents.ledger_for_variant(variant_id).await?;
        let total = entries.iter().map(|e| e.signed_delta()).sum();

        debug!(variant_id, rows = entries.len(), total, "stock recomputed from ledger");
        Ok(total)
    }

    /// Incremental fast path: applies a signed delta to the cached snapshot
    /// and returns the new value.
    ///
    /// Callers must pass the exact signed contribution of the document rows
    /// they just posted or removed; anything else breaks the equivalence
    /// with [`Self::compute_stock`].
    pub async fn apply_delta(&self, variant_id: &str, signed_delta: i64) -> DomainResult<i64> {
        let new_qty = self.variants.apply_stock_delta(variant_id, signed_delta).await?;

        debug!(variant_id, signed_delta, new_qty, "stock delta applied");
        Ok(new_qty)
    }

    /// The one sanctioned direct overwrite of the cached snapshot, for
    /// initial data load or drift correction.
    ///
    /// Logged at WARN with a distinct marker so audit output can tell a
    /// snapshot overwrite from transactional deltas.
    pub async fn reinitialize(&self, variant_id: &str, new_value: i64) -> DomainResult<()> {
        let variant = self
            .variants
            .get_by_id(variant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Variant", variant_id))?;

        self.variants.set_stock(variant_id, new_value).await?;

        warn!(
            variant_id,
            previous = variant.stock_qty,
            new_value,
            "SNAPSHOT OVERWRITE: stock reinitialized outside the ledger"
        );
        Ok(())
    }

    /// Repair path: re-derives the snapshot from the ledger and stores it.
    /// Returns the derived value.
    ///
    /// Used after document deletion (a reverse delta cannot be trusted if
    /// the rows were ever touched externally) and as the fallback when
    /// [`Self::apply_delta`] fails after a document write succeeded.
    pub async fn recompute_and_store(&self, variant_id: &str) -> DomainResult<i64> {
        let derived = self.compute_stock(variant_id).await?;
        self.variants.set_stock(variant_id, derived).await?;

        debug!(variant_id, derived, "stock snapshot re-derived from ledger");
        Ok(derived)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_applies_sign_convention() {
        let impact = document_impact(DocType::Inbound, [("v1", 10)]);
        assert_eq!(impact["v1"], 10);

        let impact = document_impact(DocType::Outbound, [("v1", 10)]);
        assert_eq!(impact["v1"], -10);

        let impact = document_impact(DocType::Adjust, [("v1", -3)]);
        assert_eq!(impact["v1"], -3);
    }

    #[test]
    fn test_impact_aggregates_repeated_variants() {
        let impact = document_impact(DocType::Outbound, [("v1", 3), ("v1", 2), ("v2", 1)]);
        assert_eq!(impact.len(), 2);
        assert_eq!(impact["v1"], -5);
        assert_eq!(impact["v2"], -1);
    }

    #[test]
    fn test_impact_of_empty_document_is_empty() {
        let impact = document_impact(DocType::Inbound, std::iter::empty());
        assert!(impact.is_empty());
    }

    #[test]
    fn test_adjust_lines_can_cancel_out() {
        let impact = document_impact(DocType::Adjust, [("v1", 4), ("v1", -4)]);
        assert_eq!(impact["v1"], 0);
    }
}
