//! # Domain Types
//!
//! Core domain entities for Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │    Product      │ 1    n │    Variant      │  ◄── the unit of stock │
//! │  │  ─────────────  │───────►│  ─────────────  │                        │
//! │  │  id (UUID)      │        │  id (UUID)      │                        │
//! │  │  name, brand    │        │  size, color    │                        │
//! │  │  base_price     │        │  sku (unique)   │                        │
//! │  └─────────────────┘        │  stock_qty ★    │  ★ cached snapshot,    │
//! │                             └────────▲────────┘    derived from ledger │
//! │                                      │                                  │
//! │  ┌─────────────────┐        ┌────────┴────────┐                        │
//! │  │    Document     │ 1    n │  DocumentItem   │  ◄── the ledger rows   │
//! │  │  ─────────────  │───────►│  ─────────────  │                        │
//! │  │  doc_type       │        │  variant_id     │                        │
//! │  │  doc_date, note │        │  quantity       │                        │
//! │  └─────────────────┘        │  unit_price     │                        │
//! │                             └─────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for relations
//! - Business key where one exists: the Variant's SKU (human-readable)
//!
//! ## The Snapshot Rule
//! `Variant::stock_qty` is a materialized view over the document ledger, not
//! independent state. It must always equal the signed sum of all posted
//! document items for the variant, except immediately after an explicit
//! reinitialization (see [`crate::stock::StockLedger::reinitialize`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Document Type
// =============================================================================

/// The type of an inventory document. Closed set; no other values exist.
///
/// ## Sign Convention
/// ```text
/// INBOUND  quantity 10  →  +10     (goods received)
/// OUTBOUND quantity 10  →  -10     (goods shipped)
/// ADJUST   quantity  3  →   +3     (count correction up)
/// ADJUST   quantity -3  →   -3     (count correction down)
/// ```
/// The sign is derived from the type at calculation time and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum DocType {
    /// Goods received into the warehouse.
    Inbound,
    /// Goods shipped out of the warehouse.
    Outbound,
    /// Stocktake correction; line quantity is a signed delta.
    Adjust,
}

impl DocType {
    /// The canonical wire/storage string for this type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocType::Inbound => "INBOUND",
            DocType::Outbound => "OUTBOUND",
            DocType::Adjust => "ADJUST",
        }
    }

    /// Sign multiplier applied to line quantities of this type.
    #[inline]
    pub const fn sign(&self) -> i64 {
        match self {
            DocType::Inbound => 1,
            DocType::Outbound => -1,
            DocType::Adjust => 1,
        }
    }

    /// The signed stock contribution of a line quantity under this type.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::types::DocType;
    ///
    /// assert_eq!(DocType::Inbound.signed_delta(10), 10);
    /// assert_eq!(DocType::Outbound.signed_delta(10), -10);
    /// assert_eq!(DocType::Adjust.signed_delta(-3), -3);
    /// ```
    #[inline]
    pub const fn signed_delta(&self, quantity: i64) -> i64 {
        self.sign() * quantity
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing accepts only the three canonical strings; anything else is a
/// validation failure naming the `doc_type` field.
impl FromStr for DocType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INBOUND" => Ok(DocType::Inbound),
            "OUTBOUND" => Ok(DocType::Outbound),
            "ADJUST" => Ok(DocType::Adjust),
            other => Err(ValidationError::InvalidFormat {
                field: "doc_type".to_string(),
                reason: format!("'{}' is not one of INBOUND, OUTBOUND, ADJUST", other),
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog style (e.g., "Air Zoom"). Products are not stocked themselves;
/// stock attaches to their Variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name of the style.
    pub name: String,

    /// Brand name.
    pub brand: String,

    /// Optional category (e.g., "running").
    pub category: Option<String>,

    /// Base price in cents.
    pub base_price_cents: i64,

    /// Optional free-form description.
    pub description: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the base price as a Money value.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }
}

// =============================================================================
// Variant
// =============================================================================

/// A concrete stock-keeping unit: one size/color combination of a Product.
///
/// All stock quantities attach here, never to the Product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Variant {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning product. Read-only relation; the variant is the stock unit.
    pub product_id: String,

    /// Size label (e.g., "US 9.5").
    pub size: String,

    /// Color label.
    pub color: String,

    /// Stock keeping unit, globally unique when present.
    /// The service generates one when the caller leaves it empty.
    pub sku: Option<String>,

    /// Cached stock snapshot. **Not the source of truth** - derived from the
    /// document ledger; see the crate-level snapshot rule.
    pub stock_qty: i64,

    /// Threshold below which the variant counts as under-stocked.
    pub safety_stock: i64,
}

impl Variant {
    /// Display label combining the specification axes.
    pub fn display_name(&self) -> String {
        format!("{} / {}", self.size, self.color)
    }

    /// True when the cached stock is strictly below the safety threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_qty < self.safety_stock
    }
}

// =============================================================================
// Document
// =============================================================================

/// An inventory event header. Immutable once created: a document is either
/// absent or posted, and deletion is the only transition back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Document {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Kind of inventory event.
    pub doc_type: DocType,

    /// Business date of the event, supplied by the caller (backdating is
    /// allowed; `created_at` records the actual posting time).
    pub doc_date: NaiveDate,

    /// Optional free-form note.
    pub note: Option<String>,

    /// When the document was posted.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Document Item
// =============================================================================

/// One ledger row: a quantity (and optional price) tied to a Variant.
///
/// Items are owned by their Document and cannot outlive it; the referenced
/// Variant cannot be deleted while any item points at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DocumentItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning document.
    pub doc_id: String,

    /// The stocked variant this row moves.
    pub variant_id: String,

    /// Quantity as entered: positive for INBOUND/OUTBOUND, signed non-zero
    /// for ADJUST. The stock sign comes from the document type.
    pub quantity: i64,

    /// Optional unit price in cents, captured at posting time.
    pub unit_price_cents: Option<i64>,
}

impl DocumentItem {
    /// Returns the unit price as Money, when captured.
    #[inline]
    pub fn unit_price(&self) -> Option<Money> {
        self.unit_price_cents.map(Money::from_cents)
    }

    /// Line subtotal (quantity × unit price), when a price was captured.
    pub fn subtotal(&self) -> Option<Money> {
        self.unit_price().map(|p| p.multiply_quantity(self.quantity))
    }
}

// =============================================================================
// Document Detail
// =============================================================================

/// A document header together with its ledger rows, as returned by detail
/// queries and document creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDetail {
    pub document: Document,
    pub items: Vec<DocumentItem>,
}

impl DocumentDetail {
    /// Total amount over the priced lines. Unpriced lines contribute zero.
    pub fn total_amount(&self) -> Money {
        self.items.iter().filter_map(|i| i.subtotal()).sum()
    }
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// The projection of one ledger row used by the stock calculation engine:
/// just the owning document's type and the entered quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub doc_type: DocType,
    pub quantity: i64,
}

impl LedgerEntry {
    /// The signed stock contribution of this row.
    #[inline]
    pub fn signed_delta(&self) -> i64 {
        self.doc_type.signed_delta(self.quantity)
    }
}

// =============================================================================
// Write-Side Inputs
// =============================================================================

/// Input for [`crate::service::InventoryService::create_document`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub doc_type: DocType,
    pub doc_date: NaiveDate,
    pub note: Option<String>,
    pub items: Vec<NewDocumentItem>,
}

/// One requested line of a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocumentItem {
    pub variant_id: String,
    pub quantity: i64,
    pub unit_price_cents: Option<i64>,
}

/// Input for creating a Product through the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub category: Option<String>,
    pub base_price_cents: i64,
    pub description: Option<String>,
}

/// Input for creating a Variant through the service.
///
/// `sku: None` asks the service to generate one; `safety_stock: None` falls
/// back to [`crate::DEFAULT_SAFETY_STOCK`]. Stock always starts at zero -
/// initial quantities enter through an INBOUND document or an explicit
/// snapshot reinitialization, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVariant {
    pub product_id: String,
    pub size: String,
    pub color: String,
    pub sku: Option<String>,
    pub safety_stock: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================
