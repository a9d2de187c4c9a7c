//! # Variant Repository
//!
//! SQLite implementation of the Variant contract, including the only two
//! statements in the system that touch the `stock_qty` snapshot column.
//!
//! ## Snapshot Update Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Snapshot Writes                                │
//! │                                                                         │
//! │  ❌ WRONG: absolute update from a value read earlier                   │
//! │     UPDATE variants SET stock_qty = 7 WHERE id = ?                     │
//! │     (bakes a stale read into the cache)                                │
//! │                                                                         │
//! │  ✅ FAST PATH: relative update, one indivisible statement              │
//! │     UPDATE variants SET stock_qty = stock_qty - 3 WHERE id = ?         │
//! │     RETURNING stock_qty                                                │
//! │                                                                         │
//! │  ✅ REPAIR PATH: absolute set, fed ONLY by a fresh ledger recompute    │
//! │     UPDATE variants SET stock_qty = ?2 WHERE id = ?1                   │
//! │     (set_stock - the engine's reinitialize/re-derive write)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use stockbook_core::{DomainError, DomainResult, Variant, VariantRepository};

use crate::error::DbError;

/// Columns selected for every Variant row, in struct field order.
const VARIANT_COLUMNS: &str = "id, product_id, size, color, sku, stock_qty, safety_stock";

/// Repository for variant database operations.
#[derive(Debug, Clone)]
pub struct SqliteVariantRepository {
    pool: SqlitePool,
}

impl SqliteVariantRepository {
    /// Creates a new SqliteVariantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteVariantRepository { pool }
    }

    /// Maps a unique-constraint failure on insert/update to the domain's
    /// `Duplicate` with the actual SKU value instead of the raw column name.
    fn map_write_error(err: sqlx::Error, sku: Option<&str>) -> DomainError {
        match DbError::from(err) {
            DbError::UniqueViolation { .. } => {
                DomainError::duplicate("sku", sku.unwrap_or("unknown"))
            }
            other => other.into(),
        }
    }
}

#[async_trait]
impl VariantRepository for SqliteVariantRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Variant>> {
        let sql = format!("SELECT {VARIANT_COLUMNS} FROM variants WHERE id = ?1");
        let variant = sqlx::query_as::<_, Variant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(variant)
    }

    async fn get_by_sku(&self, sku: &str) -> DomainResult<Option<Variant>> {
        let sql = format!("SELECT {VARIANT_COLUMNS} FROM variants WHERE sku = ?1");
        let variant = sqlx::query_as::<_, Variant>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(variant)
    }

    async fn list_by_product(&self, product_id: &str) -> DomainResult<Vec<Variant>> {
        let sql = format!(
            "SELECT {VARIANT_COLUMNS} FROM variants WHERE product_id = ?1 ORDER BY size, color"
        );
        let variants = sqlx::query_as::<_, Variant>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(variants)
    }

    async fn list_all(&self) -> DomainResult<Vec<Variant>> {
        let sql = format!("SELECT {VARIANT_COLUMNS} FROM variants ORDER BY product_id, size, color");
        let variants = sqlx::query_as::<_, Variant>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(variants)
    }

    async fn create(&self, variant: &Variant) -> DomainResult<()> {
        debug!(id = %variant.id, sku = ?variant.sku, "inserting variant");

        sqlx::query(
            "INSERT INTO variants \
             (id, product_id, size, color, sku, stock_qty, safety_stock) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&variant.id)
        .bind(&variant.product_id)
        .bind(&variant.size)
        .bind(&variant.color)
        .bind(&variant.sku)
        .bind(variant.stock_qty)
        .bind(variant.safety_stock)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, variant.sku.as_deref()))?;

        Ok(())
    }

    async fn update(&self, variant: &Variant) -> DomainResult<()> {
        debug!(id = %variant.id, "updating variant");

        let result = sqlx::query(
            "UPDATE variants SET \
             size = ?2, color = ?3, sku = ?4, stock_qty = ?5, safety_stock = ?6 \
             WHERE id = ?1",
        )
        .bind(&variant.id)
        .bind(&variant.size)
        .bind(&variant.color)
        .bind(&variant.sku)
        .bind(variant.stock_qty)
        .bind(variant.safety_stock)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, variant.sku.as_deref()))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Variant", &variant.id).into());
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        debug!(id, "deleting variant");

        // ON DELETE RESTRICT on document_items refuses this while any
        // ledger row still references the variant.
        let result = sqlx::query("DELETE FROM variants WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Variant", id).into());
        }

        Ok(())
    }

    async fn apply_stock_delta(&self, id: &str, delta: i64) -> DomainResult<i64> {
        let new_qty: Option<i64> = sqlx::query_scalar(
            "UPDATE variants SET stock_qty = stock_qty + ?2 WHERE id = ?1 RETURNING stock_qty",
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        match new_qty {
            Some(qty) => {
                debug!(id, delta, new_qty = qty, "stock snapshot updated");
                Ok(qty)
            }
            None => Err(DbError::not_found("Variant", id).into()),
        }
    }

    async fn set_stock(&self, id: &str, qty: i64) -> DomainResult<()> {
        let result = sqlx::query("UPDATE variants SET stock_qty = ?2 WHERE id = ?1")
            .bind(id)
            .bind(qty)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Variant", id).into());
        }

        debug!(id, qty, "stock snapshot set");
        Ok(())
    }
}
