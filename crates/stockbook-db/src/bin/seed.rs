//! # Seed Data Generator
//!
//! Populates a database with a small demo catalog and a few documents,
//! all posted through the real service so the ledger invariants hold.
//!
//! ## Usage
//! ```bash
//! # Seed the default database (./stockbook.db)
//! cargo run -p stockbook-db --bin seed
//!
//! # Specify database path
//! cargo run -p stockbook-db --bin seed -- --db ./data/stockbook.db
//! ```

use std::env;

use chrono::{Duration, Utc};
use tracing::info;

use stockbook_core::{DocType, NewDocument, NewDocumentItem, NewProduct, NewVariant};
use stockbook_db::{Database, DbConfig};

/// Demo catalog: (name, brand, category, base price in cents, sizes, colors).
const STYLES: &[(&str, &str, &str, i64, &[&str], &[&str])] = &[
    (
        "Air Zoom Pegasus",
        "Nike",
        "running",
        12_900,
        &["US 8", "US 9", "US 9.5", "US 10"],
        &["black", "wine red"],
    ),
    (
        "Gel-Kayano 31",
        "Asics",
        "running",
        15_900,
        &["US 8.5", "US 9", "US 10.5"],
        &["white", "blue"],
    ),
    (
        "Chuck 70",
        "Converse",
        "lifestyle",
        8_500,
        &["US 7", "US 8", "US 9"],
        &["parchment"],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = parse_db_path().unwrap_or_else(|| "./stockbook.db".to_string());
    info!(db_path = %db_path, "seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let service = db.inventory_service();

    let mut variant_ids = Vec::new();
    for (name, brand, category, price, sizes, colors) in STYLES {
        let product = service
            .create_product(NewProduct {
                name: name.to_string(),
                brand: brand.to_string(),
                category: Some(category.to_string()),
                base_price_cents: *price,
                description: None,
            })
            .await?;

        for size in *sizes {
            for color in *colors {
                let variant = service
                    .create_variant(NewVariant {
                        product_id: product.id.clone(),
                        size: size.to_string(),
                        color: color.to_string(),
                        sku: None,
                        safety_stock: None,
                    })
                    .await?;
                variant_ids.push((variant.id, *price));
            }
        }
        info!(product = name, "style seeded");
    }

    // One inbound receipt covering the whole catalog...
    let today = Utc::now().date_naive();
    let inbound = NewDocument {
        doc_type: DocType::Inbound,
        doc_date: today - Duration::days(7),
        note: Some("opening delivery".to_string()),
        items: variant_ids
            .iter()
            .map(|(id, price)| NewDocumentItem {
                variant_id: id.clone(),
                quantity: 12,
                unit_price_cents: Some(price * 6 / 10),
            })
            .collect(),
    };
    let receipt = service.create_document(inbound).await?;
    info!(document_id = %receipt.document.id, total = %receipt.total_amount(), "inbound posted");

    // ...and a first shipment against part of it.
    let outbound = NewDocument {
        doc_type: DocType::Outbound,
        doc_date: today,
        note: Some("order #1001".to_string()),
        items: variant_ids
            .iter()
            .take(3)
            .map(|(id, price)| NewDocumentItem {
                variant_id: id.clone(),
                quantity: 2,
                unit_price_cents: Some(*price),
            })
            .collect(),
    };
    let shipment = service.create_document(outbound).await?;
    info!(document_id = %shipment.document.id, total = %shipment.total_amount(), "outbound posted");

    let low = service.low_stock_variants().await?;
    info!(
        variants = variant_ids.len(),
        low_stock = low.len(),
        "seed complete"
    );

    db.close().await;
    Ok(())
}

/// Extracts `--db <path>` from the command line, if present.
fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}
