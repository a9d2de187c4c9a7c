//! # Document Repository
//!
//! SQLite implementation of the Document contract: the transactional write
//! path for the ledger and its read projections.
//!
//! ## The Atomic Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  create(document, items)                                │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    INSERT INTO documents (header)                                      │
//! │    INSERT INTO document_items (line 1)                                 │
//! │    INSERT INTO document_items (line 2)                                 │
//! │    ...                                                                 │
//! │  COMMIT          ← all rows visible together                           │
//! │                                                                         │
//! │  Any failure rolls the transaction back: the database never observes   │
//! │  a document with a partial set of items.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use stockbook_core::{
    Document, DocumentDetail, DocumentFilter, DocumentItem, DocumentRepository, DomainResult,
    LedgerEntry,
};

use crate::error::DbError;

/// Columns selected for every Document header row, in struct field order.
const DOCUMENT_COLUMNS: &str = "id, doc_type, doc_date, note, created_at";

/// Columns selected for every DocumentItem row, in struct field order.
const ITEM_COLUMNS: &str = "id, doc_id, variant_id, quantity, unit_price_cents";

/// Repository for document and ledger-row database operations.
#[derive(Debug, Clone)]
pub struct SqliteDocumentRepository {
    pool: SqlitePool,
}

impl SqliteDocumentRepository {
    /// Creates a new SqliteDocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteDocumentRepository { pool }
    }
}

#[async_trait]
impl DocumentRepository for SqliteDocumentRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<DocumentDetail>> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1");
        let document = sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        let Some(document) = document else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM document_items WHERE doc_id = ?1 ORDER BY rowid"
        );
        let items = sqlx::query_as::<_, DocumentItem>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(Some(DocumentDetail { document, items }))
    }

    async fn list(&self, filter: &DocumentFilter) -> DomainResult<Vec<Document>> {
        let mut sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents");
        let mut clauses: Vec<&str> = Vec::new();
        if filter.doc_type.is_some() {
            clauses.push("doc_type = ?");
        }
        if filter.from.is_some() {
            clauses.push("doc_date >= ?");
        }
        if filter.to.is_some() {
            clauses.push("doc_date <= ?");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY doc_date DESC, created_at DESC");

        let mut query = sqlx::query_as::<_, Document>(&sql);
        if let Some(doc_type) = filter.doc_type {
            query = query.bind(doc_type);
        }
        if let Some(from) = filter.from {
            query = query.bind(from);
        }
        if let Some(to) = filter.to {
            query = query.bind(to);
        }

        let documents = query.fetch_all(&self.pool).await.map_err(DbError::from)?;
        Ok(documents)
    }

    async fn create(&self, document: &Document, items: &[DocumentItem]) -> DomainResult<()> {
        debug!(id = %document.id, lines = items.len(), "inserting document");

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        sqlx::query(
            "INSERT INTO documents (id, doc_type, doc_date, note, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&document.id)
        .bind(document.doc_type)
        .bind(document.doc_date)
        .bind(&document.note)
        .bind(document.created_at)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        for item in items {
            sqlx::query(
                "INSERT INTO document_items (id, doc_id, variant_id, quantity, unit_price_cents) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(&item.id)
            .bind(&item.doc_id)
            .bind(&item.variant_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }

        // Dropping the transaction without this rolls everything back.
        tx.commit().await.map_err(DbError::from)?;

        debug!(id = %document.id, "document committed");
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        debug!(id, "deleting document");

        // ON DELETE CASCADE takes the items with the header.
        let result = sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Document", id).into());
        }

        Ok(())
    }

    async fn ledger_for_variant(&self, variant_id: &str) -> DomainResult<Vec<LedgerEntry>> {
        let entries = sqlx::query_as::<_, LedgerEntry>(
            "SELECT d.doc_type AS doc_type, i.quantity AS quantity \
             FROM document_items i \
             JOIN documents d ON d.id = i.doc_id \
             WHERE i.variant_id = ?1 \
             ORDER BY d.created_at, i.rowid",
        )
        .bind(variant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(entries)
    }
}
