//! Quickstart Example
//!
//! Connects with `CLOUDANT_*` environment variables, creates a database,
//! round-trips a document, runs a Mango query, then cleans up.
//!
//! Run with:
//!   CLOUDANT_USER_NAME=... CLOUDANT_PASSWORD=... cargo run --example quickstart

use cloudant_rs::{Client, Config, Index, Options, Query};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize)]
struct Product {
    sku: String,
    name: String,
    stock: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cloudant_rs=info")),
        )
        .init();

    let config = Config::from_env()?;
    let client = Client::with_config(config)?;
    client.is_alive().await?;
    println!("✅ Connected to {}\n", client.base_url());

    let db_name = "quickstart-products";
    if client.database_exists(db_name).await? {
        client.delete_database(db_name).await?;
    }
    client.create_database(db_name).await?;
    let db = client.database(db_name);

    let product = Product {
        sku: "WID-001".to_string(),
        name: "Widget".to_string(),
        stock: 12,
    };
    let doc = db.create_document(&product).await?;
    println!("📝 Created {} at rev {}", doc.id, doc.rev);

    let stored: Product = db.get_document(&doc.id, &Options::default()).await?;
    println!("   Read back: {:?}", stored);

    let restocked = Product { stock: 40, ..stored };
    let rev = db.update_document(&doc.id, &doc.rev, &restocked).await?;
    println!("   Updated to rev {}\n", rev);

    db.set_index(&Index::new(["sku"])).await?;
    let found = db
        .find::<Product>(&Query::new().with("sku", "WID-001"))
        .await?;
    println!("🔍 Query by sku matched {} document(s)", found.docs.len());

    db.delete_document(&doc.id, &rev).await?;
    client.delete_database(db_name).await?;
    println!("\n🧹 Cleaned up {}", db_name);

    Ok(())
}
