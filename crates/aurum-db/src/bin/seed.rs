//! # Seed Data Generator
//!
//! Populates a development database with a small jewelry catalog, one
//! sample order sent to production, and a few stage moves.
//!
//! ## Usage
//! ```bash
//! # Seed the database named in aurum.toml (or the platform default)
//! cargo run -p aurum-db --bin seed
//!
//! # Specify database path
//! cargo run -p aurum-db --bin seed -- --db ./data/aurum_dev.db
//!
//! # Use another config file
//! cargo run -p aurum-db --bin seed -- --config ./aurum.toml
//! ```

use aurum_core::{
    decode, Gender, Money, Order, OrderItem, Product, ProductVariant, ProductionPath,
    ProductionStage,
};
use aurum_db::{init_tracing, AurumConfig, Database, DbConfig};
use chrono::Utc;
use std::env;
use std::path::PathBuf;

/// Designs: (sku, name, gender, path, requires_setting, price_cents, variants)
const DESIGNS: &[(&str, &str, Gender, ProductionPath, bool, i64, &[&str])] = &[
    ("DA10", "Olive leaf ring", Gender::Women, ProductionPath::InHouse, true, 6_500, &["X", "XKR", "PKR"]),
    ("DA100", "Olive leaf ring, wide", Gender::Women, ProductionPath::InHouse, false, 8_200, &["X", "H", "XKRX"]),
    ("DA050", "Pebble pendant", Gender::Women, ProductionPath::InHouse, true, 12_000, &["XKR", "PPRL", "KRX"]),
    ("DA051", "Pebble earrings", Gender::Women, ProductionPath::InHouse, true, 9_500, &["XKR", "PPRL"]),
    ("DA052", "Pebble bracelet", Gender::Women, ProductionPath::InHouse, false, 15_000, &["X", "P"]),
    ("MR220", "Signet ring", Gender::Men, ProductionPath::Imported, false, 18_000, &["HEM", "XONX"]),
    ("MR221", "Signet ring, slim", Gender::Men, ProductionPath::Imported, false, 14_500, &["X", "XONX"]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Aurum Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (overrides config)");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {other}"),
        }
        i += 1;
    }

    let mut config = AurumConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.database.path = path;
    }

    println!("Aurum Seed Data Generator");
    println!("=========================");
    println!("Database: {}", config.database.path.display());
    println!();

    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(DbConfig::from(&config)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Catalog
    for design in DESIGNS {
        let product = design_product(design);
        db.catalog().upsert_product(&product).await?;
    }
    println!("✓ Inserted {} designs", DESIGNS.len());

    let catalog = db.catalog().load_catalog().await?;
    for code in ["DA100XKRX", "DA050PPRL", "MR220HEM", "DA10XKR"] {
        let decoded = decode(code, &catalog)?;
        println!("  {code:<12} {}", decoded.display_name());
    }

    // Sample order
    let order = Order::new(
        "Atelier Rhodes",
        vec![
            OrderItem::new("DA050XKR", 10),
            OrderItem::new("DA100", 4).with_variant("H").with_size("56"),
            OrderItem::new("MR220HEM", 3),
        ],
        Utc::now(),
    );
    db.orders().create_order(&order).await?;
    let batches = db.production().send_to_production(&order.id).await?;
    println!();
    println!("✓ Order for {} sent to production: {} batches", order.customer_name, batches.len());

    // Move some of the pendants ahead, and receive the imported rings
    let pendants = &batches[0];
    db.batches().move_stage(&pendants.id, ProductionStage::Casting, 10).await?;
    let split = db.batches().move_stage(&pendants.id, ProductionStage::Setting, 6).await?;
    println!("  {} → {} pieces in {} rows", pendants.code(), split.total_quantity(), split.batches().len());

    let rings = &batches[2];
    db.batches().move_stage(&rings.id, ProductionStage::Labeling, 3).await?;

    // Tag helpers
    let cipher = config.price_cipher()?;
    let expander = config.range_expander();
    println!();
    for design in DESIGNS.iter().take(3) {
        let price = Money::from_cents(design.5);
        println!("  {:<6} {:>10}  tag {}", design.0, price.to_string(), cipher.codify(price)?);
    }
    println!("  DA050-DA052 → {}", expander.expand_list("DA050-DA052")?.join(", "));

    // Workshop board
    let counts = db.batches().stage_counts().await?;
    println!();
    println!("Stage summary:");
    println!("{}", serde_json::to_string_pretty(&counts)?);

    let order = db.orders().get_order(&order.id).await?;
    if let Some(order) = order {
        println!("Order status: {}", order.status);
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn design_product(design: &(&str, &str, Gender, ProductionPath, bool, i64, &[&str])) -> Product {
    let (sku, name, gender, path, setting, price_cents, variants) = *design;
    let now = Utc::now();

    Product {
        sku: sku.to_string(),
        name: name.to_string(),
        gender,
        production_path: path,
        requires_setting: setting,
        price_cents,
        variants: variants
            .iter()
            .map(|suffix| ProductVariant {
                suffix: suffix.to_string(),
                description: None,
            })
            .collect(),
        created_at: now,
        updated_at: now,
    }
}
