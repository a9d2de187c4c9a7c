//! # Product Repository
//!
//! SQLite implementation of the Product contract.
//!
//! ## Search
//! Catalog search is a case-insensitive substring match across name, brand,
//! category and description (`LIKE '%kw%'`). Catalogs here are thousands of
//! rows, not millions; a LIKE scan over the four text columns is well under
//! interactive latency and keeps the schema free of virtual tables.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use stockbook_core::{DomainResult, Product, ProductRepository};

use crate::error::DbError;

/// Columns selected for every Product row, in struct field order.
const PRODUCT_COLUMNS: &str =
    "id, name, brand, category, base_price_cents, description, created_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    /// Creates a new SqliteProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteProductRepository { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(product)
    }

    async fn list(&self) -> DomainResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(products)
    }

    async fn search(&self, keyword: &str) -> DomainResult<Vec<Product>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return self.list().await;
        }

        debug!(keyword, "searching products");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name LIKE ?1 OR brand LIKE ?1 OR category LIKE ?1 OR description LIKE ?1 \
             ORDER BY created_at DESC"
        );
        let pattern = format!("%{}%", keyword);
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        debug!(count = products.len(), "search returned products");
        Ok(products)
    }

    async fn create(&self, product: &Product) -> DomainResult<()> {
        debug!(id = %product.id, name = %product.name, "inserting product");

        sqlx::query(
            "INSERT INTO products \
             (id, name, brand, category, base_price_cents, description, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.base_price_cents)
        .bind(&product.description)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(())
    }

    async fn update(&self, product: &Product) -> DomainResult<()> {
        debug!(id = %product.id, "updating product");

        let result = sqlx::query(
            "UPDATE products SET \
             name = ?2, brand = ?3, category = ?4, base_price_cents = ?5, description = ?6 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.base_price_cents)
        .bind(&product.description)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id).into());
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        debug!(id, "deleting product");

        // The schema's ON DELETE CASCADE takes the variants with it.
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id).into());
        }

        Ok(())
    }
}
