//! Integration tests for the SQLite layer: the repository implementations,
//! the schema's constraint backstops, and the full service wired through
//! `Database::inventory_service()` - all against an in-memory database.

use chrono::NaiveDate;

use stockbook_core::{
    DocType, DocumentFilter, DocumentRepository, DomainError, InventoryService, NewDocument,
    NewDocumentItem, NewProduct, NewVariant, Product, Variant, VariantRepository,
};
use stockbook_db::{Database, DbConfig};

// =============================================================================
// Harness
// =============================================================================

async fn database() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn seed_product(svc: &InventoryService) -> Product {
    svc.create_product(NewProduct {
        name: "Air Zoom Pegasus".to_string(),
        brand: "Nike".to_string(),
        category: Some("running".to_string()),
        base_price_cents: 12_900,
        description: Some("daily trainer".to_string()),
    })
    .await
    .unwrap()
}

async fn seed_variant(svc: &InventoryService, product_id: &str, sku: &str) -> Variant {
    svc.create_variant(NewVariant {
        product_id: product_id.to_string(),
        size: "US 9.5".to_string(),
        color: "red".to_string(),
        sku: Some(sku.to_string()),
        safety_stock: None,
    })
    .await
    .unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn doc(doc_type: DocType, date: NaiveDate, items: Vec<(String, i64)>) -> NewDocument {
    NewDocument {
        doc_type,
        doc_date: date,
        note: None,
        items: items
            .into_iter()
            .map(|(variant_id, quantity)| NewDocumentItem {
                variant_id,
                quantity,
                unit_price_cents: None,
            })
            .collect(),
    }
}

// =============================================================================
// Ledger flow through the composition root
// =============================================================================

#[tokio::test]
async fn ledger_flow_inbound_adjust_outbound() {
    let db = database().await;
    let svc = db.inventory_service();
    let product = seed_product(&svc).await;
    let variant = seed_variant(&svc, &product.id, "PEG-95-RED").await;

    svc.create_document(doc(DocType::Inbound, day(1), vec![(variant.id.clone(), 10)]))
        .await
        .unwrap();
    svc.create_document(doc(DocType::Adjust, day(2), vec![(variant.id.clone(), -3)]))
        .await
        .unwrap();

    // Sign convention lands at 7, cache and ledger agreeing.
    let cached = svc.variant_by_id(&variant.id).await.unwrap().unwrap();
    assert_eq!(cached.stock_qty, 7);
    assert_eq!(svc.current_stock(&variant.id).await.unwrap(), 7);

    // Outbound guard: 8 > 7 fails and writes nothing.
    let err = svc
        .create_document(doc(DocType::Outbound, day(3), vec![(variant.id.clone(), 8)]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::OutOfStock { requested: 8, available: 7, .. }
    ));
    assert_eq!(
        svc.list_documents(&DocumentFilter::all()).await.unwrap().len(),
        2
    );

    // Exactly the available quantity drains to zero.
    svc.create_document(doc(DocType::Outbound, day(3), vec![(variant.id.clone(), 7)]))
        .await
        .unwrap();
    assert_eq!(svc.current_stock(&variant.id).await.unwrap(), 0);
    assert!(svc.check_safety_stock(&variant.id).await.unwrap());
}

#[tokio::test]
async fn deleting_document_recomputes_both_variants() {
    let db = database().await;
    let svc = db.inventory_service();
    let product = seed_product(&svc).await;
    let a = seed_variant(&svc, &product.id, "CAS-A").await;
    let b = svc
        .create_variant(NewVariant {
            product_id: product.id.clone(),
            size: "US 8".to_string(),
            color: "white".to_string(),
            sku: Some("CAS-B".to_string()),
            safety_stock: Some(2),
        })
        .await
        .unwrap();

    svc.create_document(doc(
        DocType::Inbound,
        day(1),
        vec![(a.id.clone(), 10), (b.id.clone(), 20)],
    ))
    .await
    .unwrap();
    let outbound = svc
        .create_document(doc(
            DocType::Outbound,
            day(2),
            vec![(a.id.clone(), 3), (b.id.clone(), 5)],
        ))
        .await
        .unwrap();

    svc.delete_document(&outbound.document.id).await.unwrap();

    assert_eq!(svc.current_stock(&a.id).await.unwrap(), 10);
    assert_eq!(svc.current_stock(&b.id).await.unwrap(), 20);
    assert_eq!(svc.variant_by_id(&a.id).await.unwrap().unwrap().stock_qty, 10);
    assert_eq!(svc.variant_by_id(&b.id).await.unwrap().unwrap().stock_qty, 20);

    // The items went with the document: the ledger only holds the inbound.
    let entries = db.documents().ledger_for_variant(&a.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].doc_type, DocType::Inbound);
}

// =============================================================================
// Constraint backstops in the schema
// =============================================================================

/// The header+items write is one transaction: a line violating the CHECK
/// constraint rolls the whole document back, header included.
#[tokio::test]
async fn partial_document_rolls_back() {
    let db = database().await;
    let svc = db.inventory_service();
    let product = seed_product(&svc).await;
    let variant = seed_variant(&svc, &product.id, "ATOM-1").await;

    // Bypass service validation and hit the repository directly with a
    // zero-quantity line; the schema's CHECK refuses it mid-transaction.
    let repo = db.documents();
    let document = stockbook_core::Document {
        id: "doc-atomic".to_string(),
        doc_type: DocType::Inbound,
        doc_date: day(1),
        note: None,
        created_at: chrono::Utc::now(),
    };
    let items = vec![
        stockbook_core::DocumentItem {
            id: "item-ok".to_string(),
            doc_id: document.id.clone(),
            variant_id: variant.id.clone(),
            quantity: 5,
            unit_price_cents: None,
        },
        stockbook_core::DocumentItem {
            id: "item-bad".to_string(),
            doc_id: document.id.clone(),
            variant_id: variant.id.clone(),
            quantity: 0,
            unit_price_cents: None,
        },
    ];

    let err = repo.create(&document, &items).await.unwrap_err();
    assert!(matches!(err, DomainError::Persistence(_)));

    // Nothing survived: no header, no first line.
    assert!(repo.get_by_id("doc-atomic").await.unwrap().is_none());
    assert!(repo.ledger_for_variant(&variant.id).await.unwrap().is_empty());
}

/// The UNIQUE index on sku backs the service-level Duplicate error.
#[tokio::test]
async fn duplicate_sku_hits_unique_index() {
    let db = database().await;
    let svc = db.inventory_service();
    let product = seed_product(&svc).await;
    seed_variant(&svc, &product.id, "ZOOM-42").await;

    let err = svc
        .create_variant(NewVariant {
            product_id: product.id.clone(),
            size: "US 10".to_string(),
            color: "blue".to_string(),
            sku: Some("ZOOM-42".to_string()),
            safety_stock: None,
        })
        .await
        .unwrap_err();

    match err {
        DomainError::Duplicate { field, value } => {
            assert_eq!(field, "sku");
            assert_eq!(value, "ZOOM-42");
        }
        other => panic!("expected Duplicate, got {other:?}"),
    }

    // First variant intact.
    let survivor = svc.variant_by_sku("ZOOM-42").await.unwrap().unwrap();
    assert_eq!(survivor.size, "US 9.5");
}

/// ON DELETE RESTRICT refuses to drop a variant with ledger rows, even when
/// the service pre-check is bypassed.
#[tokio::test]
async fn variant_delete_restricted_by_foreign_key() {
    let db = database().await;
    let svc = db.inventory_service();
    let product = seed_product(&svc).await;
    let variant = seed_variant(&svc, &product.id, "FK-1").await;

    svc.create_document(doc(DocType::Inbound, day(1), vec![(variant.id.clone(), 1)]))
        .await
        .unwrap();

    // Service layer refuses with a business-rule error...
    let err = svc.delete_variant(&variant.id).await.unwrap_err();
    assert!(matches!(err, DomainError::BusinessRule(_)));

    // ...and the raw repository is stopped by the schema.
    let err = db.variants().delete(&variant.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Persistence(_)));
}

/// ON DELETE CASCADE drops a product's variants with it.
#[tokio::test]
async fn product_delete_cascades_to_variants() {
    let db = database().await;
    let svc = db.inventory_service();
    let product = seed_product(&svc).await;
    seed_variant(&svc, &product.id, "GONE-1").await;

    svc.delete_product(&product.id).await.unwrap();

    assert!(svc.variants_for_product(&product.id).await.unwrap().is_empty());
    assert!(svc.variant_by_sku("GONE-1").await.unwrap().is_none());
}

// =============================================================================
// Queries
// =============================================================================

#[tokio::test]
async fn document_list_filters_by_type_and_date() {
    let db = database().await;
    let svc = db.inventory_service();
    let product = seed_product(&svc).await;
    let variant = seed_variant(&svc, &product.id, "LIST-1").await;

    svc.create_document(doc(DocType::Inbound, day(1), vec![(variant.id.clone(), 10)]))
        .await
        .unwrap();
    svc.create_document(doc(DocType::Outbound, day(2), vec![(variant.id.clone(), 3)]))
        .await
        .unwrap();
    svc.create_document(doc(DocType::Inbound, day(5), vec![(variant.id.clone(), 7)]))
        .await
        .unwrap();

    let inbound = svc
        .list_documents(&DocumentFilter::of_type(DocType::Inbound))
        .await
        .unwrap();
    assert_eq!(inbound.len(), 2);

    let ranged = svc
        .list_documents(&DocumentFilter {
            doc_type: None,
            from: Some(day(2)),
            to: Some(day(4)),
        })
        .await
        .unwrap();
    assert_eq!(ranged.len(), 1);
    assert_eq!(ranged[0].doc_type, DocType::Outbound);

    // Newest business date first.
    let all = svc.list_documents(&DocumentFilter::all()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].doc_date, day(5));
}

#[tokio::test]
async fn product_search_matches_substrings_across_columns() {
    let db = database().await;
    let svc = db.inventory_service();
    seed_product(&svc).await; // name "Air Zoom Pegasus", brand "Nike"

    svc.create_product(NewProduct {
        name: "Gel-Kayano".to_string(),
        brand: "Asics".to_string(),
        category: Some("stability".to_string()),
        base_price_cents: 15_900,
        description: None,
    })
    .await
    .unwrap();

    assert_eq!(svc.search_products("zoom").await.unwrap().len(), 1);
    assert_eq!(svc.search_products("asics").await.unwrap().len(), 1);
    assert_eq!(svc.search_products("stability").await.unwrap().len(), 1);
    assert_eq!(svc.search_products("trainer").await.unwrap().len(), 1); // description
    assert_eq!(svc.search_products("nothing-here").await.unwrap().len(), 0);
    // Empty keyword behaves like list().
    assert_eq!(svc.search_products("  ").await.unwrap().len(), 2);
}

#[tokio::test]
async fn document_detail_round_trips_prices() {
    let db = database().await;
    let svc = db.inventory_service();
    let product = seed_product(&svc).await;
    let variant = seed_variant(&svc, &product.id, "PRICE-1").await;

    let posted = svc
        .create_document(NewDocument {
            doc_type: DocType::Inbound,
            doc_date: day(1),
            note: Some("opening delivery".to_string()),
            items: vec![
                NewDocumentItem {
                    variant_id: variant.id.clone(),
                    quantity: 2,
                    unit_price_cents: Some(1000),
                },
                NewDocumentItem {
                    variant_id: variant.id.clone(),
                    quantity: 5,
                    unit_price_cents: None,
                },
            ],
        })
        .await
        .unwrap();

    let detail = svc.document_detail(&posted.document.id).await.unwrap();
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.document.note.as_deref(), Some("opening delivery"));
    assert_eq!(detail.total_amount().cents(), 2000);
    assert_eq!(svc.current_stock(&variant.id).await.unwrap(), 7);
}

// =============================================================================
// Snapshot management
// =============================================================================

#[tokio::test]
async fn reinitialize_overwrites_snapshot_only() {
    let db = database().await;
    let svc = db.inventory_service();
    let product = seed_product(&svc).await;
    let variant = seed_variant(&svc, &product.id, "INIT-1").await;

    svc.create_document(doc(DocType::Inbound, day(1), vec![(variant.id.clone(), 3)]))
        .await
        .unwrap();

    // Initial data load / drift correction path.
    svc.reinitialize_stock(&variant.id, 50).await.unwrap();
    assert_eq!(svc.variant_by_id(&variant.id).await.unwrap().unwrap().stock_qty, 50);

    // The ledger itself is untouched; a repair recompute re-derives 3.
    assert_eq!(svc.ledger().recompute_and_store(&variant.id).await.unwrap(), 3);
    assert_eq!(svc.variant_by_id(&variant.id).await.unwrap().unwrap().stock_qty, 3);
}

#[tokio::test]
async fn updates_to_missing_rows_are_not_found() {
    let db = database().await;
    let svc = db.inventory_service();

    let err = svc.delete_product("missing").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = svc.delete_document("missing").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = db.variants().apply_stock_delta("missing", 1).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
